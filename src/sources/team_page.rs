use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use scraper::{ElementRef, Html};

use crate::config::{MatchPhase, TeamSpec};
use crate::error::{ExtractError, Result};
use crate::extract::{
    collect_text, css, disambiguate, extract_team_block, parse_score, SiteLinks,
};
use crate::fetch::SourceClient;
use crate::model::{MatchRecord, MatchStatus, TeamRef, TournamentRef};
use crate::sources::MatchSource;

/// Source backed by the team's own wiki page: the upcoming-fixture carousel
/// for the upcoming phase, the results table for the completed phase.
pub struct TeamPageSource {
    client: SourceClient,
    links: SiteLinks,
}

impl TeamPageSource {
    pub fn new(client: SourceClient, links: SiteLinks) -> Self {
        TeamPageSource { client, links }
    }
}

#[async_trait]
impl MatchSource for TeamPageSource {
    async fn fetch_match(&self, team: &TeamSpec) -> Result<MatchRecord> {
        let html = self
            .client
            .get_html(&self.links.team_page(&team.name))
            .await?;
        match team.phase {
            MatchPhase::Upcoming => {
                extract_upcoming_fixture(&html, team, &self.links, Utc::now().timestamp())
            }
            MatchPhase::Completed => extract_history_result(&html, team, &self.links),
        }
    }

    fn name(&self) -> &str {
        "liquipedia-team-page"
    }
}

/// Pure extraction for the fixture carousel: the first entry whose embedded
/// timestamp is strictly in the future. The carousel only lists upcoming
/// fixtures, so the status is always PRE and no scores apply.
pub fn extract_upcoming_fixture(
    html: &str,
    team: &TeamSpec,
    links: &SiteLinks,
    now_ts: i64,
) -> Result<MatchRecord> {
    let doc = Html::parse_document(html);

    for entry in doc.select(&css("table.infobox_matches_content")) {
        let Some(start_time) = entry_timestamp(&entry) else {
            continue;
        };
        if start_time <= now_ts {
            continue;
        }

        // Vertical layout: one cell per side instead of the listing's
        // horizontal block pair.
        let left = entry
            .select(&css("td.team-left"))
            .next()
            .map(|td| extract_team_block(td, links))
            .unwrap_or_default();
        let right = entry
            .select(&css("td.team-right"))
            .next()
            .map(|td| extract_team_block(td, links))
            .unwrap_or_default();

        let (team_ref, opponent) = disambiguate(&left, &right, &team.name, None, links)?;

        let tournament = entry
            .select(&css("div.tournament-text a"))
            .next()
            .map(|a| TournamentRef {
                name: collect_text(&a),
                link: links.absolute(a.value().attr("href").unwrap_or_default()),
            })
            .unwrap_or_default();

        return Ok(MatchRecord {
            team: team_ref,
            opponent,
            tournament,
            start_time,
            status: MatchStatus::Pre,
            streams: Vec::new(),
        });
    }

    Err(ExtractError::not_found("upcoming fixture"))
}

/// Pure extraction for the matches-history table: the first row (top to
/// bottom) whose score cell validates, skipping forfeits, walkovers and
/// date-like strings. The table only lists finished matches, so the status
/// is always POST.
pub fn extract_history_result(
    html: &str,
    team: &TeamSpec,
    links: &SiteLinks,
) -> Result<MatchRecord> {
    let doc = Html::parse_document(html);

    for row in doc.select(&css("table.wikitable tr")) {
        let cells: Vec<ElementRef> = row.select(&css("td")).collect();
        if cells.is_empty() {
            continue;
        }

        let Some((score_idx, pair)) = cells
            .iter()
            .enumerate()
            .find_map(|(i, td)| parse_score(&collect_text(td)).map(|p| (i, p)))
        else {
            continue;
        };

        let opponent_block = cells[score_idx + 1..]
            .iter()
            .find(|td| td.select(&css("a")).next().is_some())
            .map(|td| extract_team_block(*td, links))
            .unwrap_or_default();

        let tournament = cells[..score_idx]
            .iter()
            .rev()
            .find_map(|td| td.select(&css("a")).next())
            .map(|a| TournamentRef {
                name: collect_text(&a),
                link: links.absolute(a.value().attr("href").unwrap_or_default()),
            })
            .unwrap_or_default();

        let (our_score, their_score) = if team.show_scores {
            (Some(pair.left), Some(pair.right))
        } else {
            (None, None)
        };

        let team_ref = TeamRef {
            abbreviation: team.name.clone(),
            name: team.name.replace('_', " "),
            link: links.team_page(&team.name),
            logo: String::new(),
            score: our_score,
        };
        let opponent = if opponent_block.is_tbd() {
            TeamRef::tbd(&links.default_crest())
        } else {
            TeamRef {
                abbreviation: opponent_block.abbreviation,
                name: opponent_block.name,
                link: links.absolute(&opponent_block.href),
                logo: links.absolute(&opponent_block.logo),
                score: their_score,
            }
        };

        return Ok(MatchRecord {
            team: team_ref,
            opponent,
            tournament,
            start_time: row_timestamp(&row, &cells),
            status: MatchStatus::Post,
            streams: Vec::new(),
        });
    }

    Err(ExtractError::not_found("completed result row"))
}

fn entry_timestamp(entry: &ElementRef) -> Option<i64> {
    entry
        .select(&css("span.timer-object"))
        .next()
        .and_then(|timer| timer.value().attr("data-timestamp"))
        .and_then(|raw| raw.trim().parse().ok())
}

/// History rows carry either a timer element or a plain `YYYY-MM-DD` date
/// cell; fall back to zero when neither is present.
fn row_timestamp(row: &ElementRef, cells: &[ElementRef]) -> i64 {
    if let Some(ts) = entry_timestamp(row) {
        return ts;
    }
    cells
        .iter()
        .find_map(|td| {
            NaiveDate::parse_from_str(&collect_text(td), "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc().timestamp())
        })
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> SiteLinks {
        SiteLinks::new("https://liquipedia.net", "counterstrike").unwrap()
    }

    fn spec(phase: MatchPhase, show_scores: bool) -> TeamSpec {
        TeamSpec {
            name: "FaZe_Clan".to_string(),
            phase,
            show_scores,
        }
    }

    const TEAM_PAGE: &str = r#"
    <table class="infobox_matches_content">
      <tr>
        <td class="team-left"><strong class="mw-selflink selflink">FaZe Clan</strong></td>
        <td class="versus">1:2</td>
        <td class="team-right"><a href="/counterstrike/Natus_Vincere">NAVI</a></td>
      </tr>
      <tr><td colspan="3"><span class="timer-object" data-timestamp="1000"></span></td></tr>
    </table>
    <table class="infobox_matches_content">
      <tr>
        <td class="team-left"><strong class="mw-selflink selflink">FaZe Clan</strong></td>
        <td class="versus">vs.</td>
        <td class="team-right"><a href="/counterstrike/G2_Esports">G2</a></td>
      </tr>
      <tr>
        <td colspan="3">
          <span class="timer-object" data-timestamp="2000"></span>
          <div class="tournament-text"><a href="/counterstrike/IEM_Katowice_2025">IEM Katowice</a></div>
        </td>
      </tr>
    </table>
    <table class="wikitable">
      <tr><th>Date</th><th>Tournament</th><th>Score</th><th>Opponent</th></tr>
      <tr>
        <td>2025-01-10</td>
        <td><a href="/counterstrike/BLAST_Premier">BLAST Premier</a></td>
        <td>W : FF</td>
        <td><a href="/counterstrike/Cloud9">Cloud9</a></td>
      </tr>
      <tr>
        <td>2025-01-08</td>
        <td><a href="/counterstrike/BLAST_Premier">BLAST Premier</a></td>
        <td>2 : 0</td>
        <td><a href="/counterstrike/Ninjas_in_Pyjamas">NIP</a></td>
      </tr>
    </table>
    "#;

    #[test]
    fn test_carousel_picks_first_future_entry() {
        let record = extract_upcoming_fixture(
            TEAM_PAGE,
            &spec(MatchPhase::Upcoming, true),
            &links(),
            1500,
        )
        .unwrap();

        assert_eq!(record.start_time, 2000);
        assert_eq!(record.status, MatchStatus::Pre);
        // The self-link identifies our side even though the display name
        // carries a space instead of the slug's underscore.
        assert_eq!(record.team.abbreviation, "FaZe_Clan");
        assert_eq!(record.team.name, "FaZe Clan");
        assert_eq!(record.opponent.abbreviation, "G2_Esports");
        assert_eq!(record.tournament.name, "IEM Katowice");
        assert_eq!(record.team.score, None);
        assert_eq!(record.opponent.score, None);
    }

    #[test]
    fn test_carousel_without_future_entry_is_not_found() {
        let err = extract_upcoming_fixture(
            TEAM_PAGE,
            &spec(MatchPhase::Upcoming, true),
            &links(),
            5000,
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }));
    }

    #[test]
    fn test_history_skips_walkover_rows() {
        let record =
            extract_history_result(TEAM_PAGE, &spec(MatchPhase::Completed, true), &links())
                .unwrap();

        assert_eq!(record.status, MatchStatus::Post);
        assert_eq!(record.team.abbreviation, "FaZe_Clan");
        assert_eq!(record.team.score.as_deref(), Some("2"));
        assert_eq!(record.opponent.abbreviation, "Ninjas_in_Pyjamas");
        assert_eq!(record.opponent.score.as_deref(), Some("0"));
        assert_eq!(record.tournament.name, "BLAST Premier");
        // Plain date cell, midnight UTC.
        assert_eq!(record.start_time, 1_736_294_400);
    }

    #[test]
    fn test_history_scores_suppressed_when_disabled() {
        let record =
            extract_history_result(TEAM_PAGE, &spec(MatchPhase::Completed, false), &links())
                .unwrap();
        assert_eq!(record.status, MatchStatus::Post);
        assert_eq!(record.team.score, None);
        assert_eq!(record.opponent.score, None);
    }

    #[test]
    fn test_history_without_valid_rows_is_not_found() {
        let html = r#"<table class="wikitable">
            <tr><td>2025-01-10</td><td>- : -</td><td><a href="/counterstrike/Cloud9">C9</a></td></tr>
        </table>"#;
        let err = extract_history_result(html, &spec(MatchPhase::Completed, true), &links())
            .unwrap_err();
        assert!(matches!(err, ExtractError::NotFound { .. }));
    }
}
