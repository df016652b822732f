use async_trait::async_trait;
use scraper::{CaseSensitivity, ElementRef, Html};

use crate::config::TeamSpec;
use crate::error::{ExtractError, Result};
use crate::extract::{
    classify_status, collect_text, css, disambiguate, extract_team_block, find_match_container,
    parse_score, select_text, SiteLinks,
};
use crate::fetch::SourceClient;
use crate::model::{MatchRecord, MatchStatus, StreamLink, TournamentRef};
use crate::sources::MatchSource;

/// Source backed by the aggregate matches listing page, which groups all
/// upcoming and recently completed matches into phase-keyed toggle areas.
pub struct ListingSource {
    client: SourceClient,
    links: SiteLinks,
}

impl ListingSource {
    pub fn new(client: SourceClient, links: SiteLinks) -> Self {
        ListingSource { client, links }
    }
}

#[async_trait]
impl MatchSource for ListingSource {
    async fn fetch_match(&self, team: &TeamSpec) -> Result<MatchRecord> {
        let html = self.client.get_html(&self.links.matches_page()).await?;
        extract_listing_match(&html, team, &self.links)
    }

    fn name(&self) -> &str {
        "liquipedia-listing"
    }
}

/// Pure extraction: listing page HTML -> normalized record for one team.
pub fn extract_listing_match(
    html: &str,
    team: &TeamSpec,
    links: &SiteLinks,
) -> Result<MatchRecord> {
    let doc = Html::parse_document(html);

    let section_selector = css(&format!(
        r#"div[data-toggle-area-content="{}"]"#,
        team.phase.toggle_area()
    ));
    let section = doc
        .select(&section_selector)
        .next()
        .ok_or(ExtractError::not_found("match phase toggle area"))?;

    let target = format!("/{}/{}", links.game(), team.name);
    let anchor = section
        .select(&css("a"))
        .find(|a| a.value().attr("href") == Some(target.as_str()))
        .ok_or(ExtractError::not_found("tracked team link"))?;

    let container =
        find_match_container(anchor).ok_or(ExtractError::not_found("match container"))?;
    extract_container(container, team, links)
}

/// Run the full pipeline on one discovered match container.
fn extract_container(
    container: ElementRef<'_>,
    team: &TeamSpec,
    links: &SiteLinks,
) -> Result<MatchRecord> {
    let timer = container
        .select(&css("span.timer-object"))
        .next()
        .ok_or(ExtractError::not_found("match timer"))?;
    let ts_raw = timer
        .value()
        .attr("data-timestamp")
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ExtractError::not_found("timer data-timestamp"))?;
    let start_time: i64 = ts_raw
        .parse()
        .map_err(|_| ExtractError::malformed("timer data-timestamp", ts_raw))?;

    let header = container
        .select(&css("div.match-info-header"))
        .next()
        .ok_or(ExtractError::not_found("match info header"))?;

    let scoreholder = header
        .select(&css("div.match-info-header-scoreholder"))
        .next();
    let score_text = scoreholder.map(|el| collect_text(&el));

    let winner_flagged = {
        let v = container.value();
        v.has_class("winner-left", CaseSensitivity::CaseSensitive)
            || v.has_class("winner-right", CaseSensitivity::CaseSensitive)
    };
    let status = classify_status(score_text.as_deref(), winner_flagged);

    let scores = if team.show_scores && matches!(status, MatchStatus::Post | MatchStatus::In) {
        scoreholder
            .map(|sh| select_text(&sh, &css("span.match-info-header-scoreholder-upper")))
            .and_then(|text| parse_score(&text))
    } else {
        None
    };

    let blocks: Vec<ElementRef> = header
        .select(&css("div.match-info-header-opponent"))
        .collect();
    let left_el = blocks
        .iter()
        .copied()
        .find(|el| {
            el.value()
                .has_class("match-info-header-opponent-left", CaseSensitivity::CaseSensitive)
        })
        .or_else(|| blocks.first().copied())
        .ok_or(ExtractError::not_found("team blocks"))?;
    let right_el = blocks.into_iter().find(|el| el.id() != left_el.id());

    let left_block = left_el
        .select(&css("div.block-team"))
        .next()
        .map(|b| extract_team_block(b, links))
        .unwrap_or_default();
    let right_block = right_el
        .and_then(|el| el.select(&css("div.block-team")).next())
        .map(|b| extract_team_block(b, links))
        .unwrap_or_default();

    let (team_ref, opponent) =
        disambiguate(&left_block, &right_block, &team.name, scores.as_ref(), links)?;

    let tournament_section = container.select(&css("div.match-info-tournament")).next();
    let tournament = tournament_section
        .and_then(|sec| sec.select(&css("span.league-icon-small-image a")).next())
        .map(|a| TournamentRef {
            name: a.value().attr("title").unwrap_or_default().trim().to_string(),
            link: links.absolute(a.value().attr("href").unwrap_or_default().trim()),
        })
        .unwrap_or_default();

    let status = status.smoothed();
    let streams = collect_streams(container, tournament_section, status);

    Ok(MatchRecord {
        team: team_ref,
        opponent,
        tournament,
        start_time,
        status,
        streams,
    })
}

/// Gather stream links for upcoming matches, or the VOD link for completed
/// ones (the listing marks those with a "Watch Game" title).
fn collect_streams(
    container: ElementRef<'_>,
    tournament_section: Option<ElementRef<'_>>,
    status: MatchStatus,
) -> Vec<StreamLink> {
    let mut streams: Vec<StreamLink> = Vec::new();
    let mut push = |platform: &str, id: String, label: String| {
        if !streams.iter().any(|s| s.platform == platform && s.id == id) {
            streams.push(StreamLink {
                platform: platform.to_string(),
                id,
                label,
            });
        }
    };

    if status == MatchStatus::Post {
        if let Some(section) = tournament_section {
            for a in section.select(&css("a")) {
                let title = a.value().attr("title").unwrap_or_default();
                if !title.contains("Watch Game") {
                    continue;
                }
                if let Some(id) = a.value().attr("href").and_then(trailing_id) {
                    push("YouTube", id, "Watch Match".to_string());
                }
            }
        }
        return streams;
    }

    let sections = container
        .select(&css("div.match-info-streams"))
        .next()
        .into_iter()
        .chain(tournament_section);
    for section in sections {
        for a in section.select(&css("a")) {
            let href = a.value().attr("href").unwrap_or_default();
            let platform = if href.contains("youtube") {
                "YouTube"
            } else if href.contains("twitch") {
                "Twitch"
            } else {
                continue;
            };
            let Some(id) = trailing_id(href) else { continue };
            let label = {
                let text = collect_text(&a);
                if text.is_empty() {
                    "Stream".to_string()
                } else {
                    text
                }
            };
            push(platform, id, label);
        }
    }
    streams
}

/// Last path segment of an href, query string stripped.
fn trailing_id(href: &str) -> Option<String> {
    let last = href.trim_end_matches('/').rsplit('/').next()?;
    let id = last.split('?').next()?;
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}
