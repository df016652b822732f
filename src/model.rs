use chrono::{DateTime, Local, TimeZone, Utc};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Coarse match state as surfaced to the sensor platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Pre,
    In,
    Post,
    NotFound,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pre => "PRE",
            MatchStatus::In => "IN",
            MatchStatus::Post => "POST",
            MatchStatus::NotFound => "NOT_FOUND",
        }
    }

    /// Live matches are shown as upcoming: the scrape has no live-score
    /// fidelity, so IN never reaches the final record.
    pub fn smoothed(self) -> MatchStatus {
        match self {
            MatchStatus::In => MatchStatus::Pre,
            other => other,
        }
    }
}

/// One side of a matchup, normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamRef {
    /// Canonical abbreviation/slug; falls back to the display name when no
    /// structured identifier is derivable. Never empty.
    pub abbreviation: String,
    pub name: String,
    /// Absolute profile URL, possibly empty.
    pub link: String,
    /// Absolute logo URL, possibly empty.
    pub logo: String,
    /// Kept verbatim as scraped; only populated when score display is on.
    pub score: Option<String>,
}

impl TeamRef {
    /// Placeholder for a fixture whose second participant is not yet known.
    pub fn tbd(default_crest: &str) -> Self {
        TeamRef {
            abbreviation: "TBD".to_string(),
            name: "TBD".to_string(),
            link: String::new(),
            logo: default_crest.to_string(),
            score: None,
        }
    }

    pub fn is_tbd(&self) -> bool {
        self.abbreviation == "TBD"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TournamentRef {
    pub name: String,
    pub link: String,
}

/// A stream or VOD link attached to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamLink {
    pub platform: String,
    /// Trailing path segment of the scraped href: a channel handle for live
    /// streams, a video id for VODs. Not resolved any further.
    pub id: String,
    pub label: String,
}

/// A fully normalized match, rebuilt from scratch on every poll cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub team: TeamRef,
    pub opponent: TeamRef,
    pub tournament: TournamentRef,
    /// Unix epoch seconds.
    pub start_time: i64,
    pub status: MatchStatus,
    pub streams: Vec<StreamLink>,
}

impl MatchRecord {
    /// Flat attribute projection for the sensor platform.
    pub fn attributes(&self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut attrs = Map::new();
        attrs.insert("team_name".into(), json!(self.team.name));
        attrs.insert("team_abbreviation".into(), json!(self.team.abbreviation));
        attrs.insert("team_link".into(), json!(self.team.link));
        attrs.insert("team_logo".into(), json!(self.team.logo));
        attrs.insert("team_score".into(), json!(self.team.score));
        attrs.insert("opponent_name".into(), json!(self.opponent.name));
        attrs.insert(
            "opponent_abbreviation".into(),
            json!(self.opponent.abbreviation),
        );
        attrs.insert("opponent_link".into(), json!(self.opponent.link));
        attrs.insert("opponent_logo".into(), json!(self.opponent.logo));
        attrs.insert("opponent_score".into(), json!(self.opponent.score));
        attrs.insert("tournament_name".into(), json!(self.tournament.name));
        attrs.insert("tournament_link".into(), json!(self.tournament.link));
        attrs.insert("start_time".into(), json!(self.start_time));
        attrs.insert(
            "kickoff_in".into(),
            json!(humanize_from(self.start_time, now)),
        );
        attrs.insert("kickoff_at".into(), json!(local_clock(self.start_time)));
        attrs.insert("streams".into(), json!(self.streams));
        attrs
    }
}

/// Human-relative "kickoff in" string, e.g. "in 2 hours" or "3 days ago".
pub fn humanize_from(start_time: i64, now: DateTime<Utc>) -> String {
    let delta = start_time - now.timestamp();
    let (magnitude, suffix) = if delta >= 0 {
        (delta, false)
    } else {
        (-delta, true)
    };

    let phrase = if magnitude < 60 {
        "moments".to_string()
    } else if magnitude < 3600 {
        plural(magnitude / 60, "minute")
    } else if magnitude < 86_400 {
        plural(magnitude / 3600, "hour")
    } else {
        plural(magnitude / 86_400, "day")
    };

    if suffix {
        format!("{} ago", phrase)
    } else {
        format!("in {}", phrase)
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {}", unit)
    } else {
        format!("{} {}s", n, unit)
    }
}

/// Wall-clock rendering of the kickoff in the host's local timezone.
fn local_clock(start_time: i64) -> String {
    match Local.timestamp_opt(start_time, 0) {
        chrono::LocalResult::Single(dt) => dt.format("%-I:%M %p").to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_smoothing_never_surfaces_in() {
        assert_eq!(MatchStatus::In.smoothed(), MatchStatus::Pre);
        assert_eq!(MatchStatus::Pre.smoothed(), MatchStatus::Pre);
        assert_eq!(MatchStatus::Post.smoothed(), MatchStatus::Post);
        assert_eq!(MatchStatus::NotFound.smoothed(), MatchStatus::NotFound);
    }

    #[test]
    fn test_humanize_future() {
        let now = Utc.timestamp_opt(1_737_000_000, 0).unwrap();
        assert_eq!(humanize_from(1_737_000_030, now), "in moments");
        assert_eq!(humanize_from(1_737_000_000 + 120, now), "in 2 minutes");
        assert_eq!(humanize_from(1_737_000_000 + 7200, now), "in 2 hours");
        assert_eq!(humanize_from(1_737_000_000 + 86_400, now), "in 1 day");
    }

    #[test]
    fn test_humanize_past() {
        let now = Utc.timestamp_opt(1_737_000_000, 0).unwrap();
        assert_eq!(humanize_from(1_737_000_000 - 3600, now), "1 hour ago");
        assert_eq!(
            humanize_from(1_737_000_000 - 3 * 86_400, now),
            "3 days ago"
        );
    }

    #[test]
    fn test_tbd_placeholder() {
        let tbd = TeamRef::tbd("https://example.net/crest.png");
        assert_eq!(tbd.abbreviation, "TBD");
        assert_eq!(tbd.name, "TBD");
        assert!(tbd.link.is_empty());
        assert_eq!(tbd.logo, "https://example.net/crest.png");
        assert!(tbd.score.is_none());
        assert!(tbd.is_tbd());
    }

    #[test]
    fn test_attributes_projection() {
        let record = MatchRecord {
            team: TeamRef {
                abbreviation: "FaZe_Clan".into(),
                name: "FaZe Clan".into(),
                link: "https://liquipedia.net/counterstrike/FaZe_Clan".into(),
                logo: String::new(),
                score: None,
            },
            opponent: TeamRef::tbd(""),
            tournament: TournamentRef {
                name: "IEM Katowice".into(),
                link: String::new(),
            },
            start_time: 1_737_123_900,
            status: MatchStatus::Pre,
            streams: vec![],
        };
        let now = Utc.timestamp_opt(1_737_120_300, 0).unwrap();
        let attrs = record.attributes(now);
        assert_eq!(attrs["team_abbreviation"], json!("FaZe_Clan"));
        assert_eq!(attrs["opponent_abbreviation"], json!("TBD"));
        assert_eq!(attrs["tournament_name"], json!("IEM Katowice"));
        assert_eq!(attrs["start_time"], json!(1_737_123_900));
        assert_eq!(attrs["kickoff_in"], json!("in 1 hour"));
    }
}
