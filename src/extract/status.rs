use crate::model::MatchStatus;

/// Derive the match status from the score-holder text and the container's
/// winner markers. Best-effort heuristics over display text; callers fall
/// back to NOT_FOUND when the surrounding structure is absent entirely.
///
/// A "vs" token means the matchup has not started, a colon-delimited pair
/// means it finished, anything else is taken as in-progress. A winner-side
/// flag on the container forces POST regardless of the text.
///
/// Note this returns the raw status; `MatchStatus::smoothed` must be applied
/// before the value reaches a record.
pub fn classify_status(score_text: Option<&str>, winner_flagged: bool) -> MatchStatus {
    if winner_flagged {
        return MatchStatus::Post;
    }
    match score_text {
        Some(text) if text.to_lowercase().contains("vs") => MatchStatus::Pre,
        Some(text) if text.contains(':') => MatchStatus::Post,
        Some(_) => MatchStatus::In,
        None => MatchStatus::Pre,
    }
}
