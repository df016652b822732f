use crate::error::{ExtractError, Result};
use crate::extract::links::SiteLinks;
use crate::extract::score::ScorePair;
use crate::extract::team_block::RawTeamBlock;
use crate::model::TeamRef;

/// Decide which extracted block is "ours" and which is the opponent.
///
/// The tracked identifier is matched case-sensitively against each block's
/// abbreviation; a self-link marker resolves the assignment when neither
/// abbreviation matches (a team page referring to its own subject). The
/// tracked side's profile URL is rebuilt canonically from the identifier
/// rather than copied from the scraped link, so it stays stable across
/// markup changes.
///
/// When the assignment cannot be resolved this returns
/// [`ExtractError::Ambiguous`] instead of guessing by position; a silent
/// guess would misattribute scores to the wrong side.
pub fn disambiguate(
    left: &RawTeamBlock,
    right: &RawTeamBlock,
    tracked: &str,
    scores: Option<&ScorePair>,
    links: &SiteLinks,
) -> Result<(TeamRef, TeamRef)> {
    let left_matches = left.abbreviation == tracked;
    let right_matches = right.abbreviation == tracked;

    let ours_is_left = match (left_matches, right_matches) {
        (true, false) => true,
        (false, true) => false,
        // Neither abbreviation matched; a lone self-link still identifies
        // our side. Two matches (or two self-links) stay ambiguous.
        (false, false) if left.is_self && !right.is_self => true,
        (false, false) if right.is_self && !left.is_self => false,
        _ => {
            return Err(ExtractError::Ambiguous {
                tracked: tracked.to_string(),
                left: left.abbreviation.clone(),
                right: right.abbreviation.clone(),
            })
        }
    };

    let (ours, other) = if ours_is_left {
        (left, right)
    } else {
        (right, left)
    };
    let (our_score, their_score) = match scores {
        Some(pair) if ours_is_left => (Some(pair.left.clone()), Some(pair.right.clone())),
        Some(pair) => (Some(pair.right.clone()), Some(pair.left.clone())),
        None => (None, None),
    };

    let team = TeamRef {
        abbreviation: tracked.to_string(),
        name: if ours.name.is_empty() {
            tracked.to_string()
        } else {
            ours.name.clone()
        },
        link: links.team_page(tracked),
        logo: links.absolute(&ours.logo),
        score: our_score,
    };

    let opponent = if other.is_tbd() {
        TeamRef::tbd(&links.default_crest())
    } else {
        TeamRef {
            abbreviation: other.abbreviation.clone(),
            name: other.name.clone(),
            link: links.absolute(&other.href),
            logo: links.absolute(&other.logo),
            score: their_score,
        }
    };

    Ok((team, opponent))
}
