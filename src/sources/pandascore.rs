use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;

use crate::config::TeamSpec;
use crate::error::{ExtractError, Result};
use crate::extract::SiteLinks;
use crate::fetch::SourceClient;
use crate::model::{MatchRecord, MatchStatus, TeamRef, TournamentRef};
use crate::sources::MatchSource;

const VIDEOGAME_TITLE: &str = "cs-2";

/// REST adapter over the PandaScore match feed. One request per tracked
/// team returns the single most relevant match, already sorted by the API.
pub struct PandascoreSource {
    client: SourceClient,
    links: SiteLinks,
    api_url: String,
    api_key: String,
}

impl PandascoreSource {
    pub fn new(client: SourceClient, links: SiteLinks, api_url: &str, api_key: String) -> Self {
        PandascoreSource {
            client,
            links,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl MatchSource for PandascoreSource {
    async fn fetch_match(&self, team: &TeamSpec) -> Result<MatchRecord> {
        let url = format!("{}/teams/{}/matches", self.api_url, team.name);
        let matches: Vec<ApiMatch> = self
            .client
            .get_json(
                &url,
                &[("videogame_title", VIDEOGAME_TITLE), ("page[size]", "1")],
                Some(&self.api_key),
            )
            .await?;
        let api_match = matches
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::not_found("matches for team"))?;
        map_api_match(api_match, team, &self.links)
    }

    fn name(&self) -> &str {
        "pandascore"
    }
}

#[derive(Debug, Deserialize)]
struct ApiMatch {
    scheduled_at: Option<String>,
    begin_at: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    opponents: Vec<ApiOpponentSlot>,
    #[serde(default)]
    results: Vec<ApiResult>,
    tournament: Option<ApiSeries>,
    league: Option<ApiSeries>,
    serie: Option<ApiSeries>,
}

#[derive(Debug, Deserialize)]
struct ApiOpponentSlot {
    opponent: ApiTeam,
}

#[derive(Debug, Deserialize, Clone)]
struct ApiTeam {
    id: Option<i64>,
    slug: Option<String>,
    acronym: Option<String>,
    name: Option<String>,
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    team_id: Option<i64>,
    score: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ApiSeries {
    name: Option<String>,
    full_name: Option<String>,
    slug: Option<String>,
}

/// Normalize one API match into a record for the tracked team.
fn map_api_match(m: ApiMatch, team: &TeamSpec, links: &SiteLinks) -> Result<MatchRecord> {
    let raw_time = m
        .scheduled_at
        .as_deref()
        .or(m.begin_at.as_deref())
        .ok_or_else(|| ExtractError::not_found("match start time"))?;
    let start_time = DateTime::parse_from_rfc3339(raw_time)
        .map_err(|e| ExtractError::malformed("match start time", e.to_string()))?
        .timestamp();

    let status = match m.status.as_deref() {
        Some("running") => MatchStatus::In,
        Some("finished") => MatchStatus::Post,
        _ => MatchStatus::Pre,
    };

    let (team_ref, opponent) = assign_sides(&m, team, status, links)?;

    Ok(MatchRecord {
        team: team_ref,
        opponent,
        tournament: tournament_ref(&m, links),
        start_time,
        status: status.smoothed(),
        streams: Vec::new(),
    })
}

/// Decide which opponent entry is the tracked team. Slugs are compared with
/// underscores folded to dashes, the API's slug convention. With fewer than
/// two entries the missing side becomes a TBD placeholder; with two entries
/// and no slug match the record is ambiguous rather than guessed by
/// position.
fn assign_sides(
    m: &ApiMatch,
    team: &TeamSpec,
    status: MatchStatus,
    links: &SiteLinks,
) -> Result<(TeamRef, TeamRef)> {
    let tracked_slug = normalize_slug(&team.name);

    if m.opponents.len() < 2 {
        let team_ref = match m.opponents.first() {
            Some(slot) => team_from_api(&slot.opponent, None, links),
            None => TeamRef {
                abbreviation: team.name.clone(),
                name: titlecase_slug(&team.name),
                link: links.team_page(&team.name),
                logo: String::new(),
                score: None,
            },
        };
        return Ok((team_ref, TeamRef::tbd(&links.default_crest())));
    }

    let mut ours: Option<&ApiTeam> = None;
    let mut theirs: Option<&ApiTeam> = None;
    for slot in &m.opponents {
        let slug = slot.opponent.slug.as_deref().unwrap_or_default();
        if normalize_slug(slug) == tracked_slug {
            ours = Some(&slot.opponent);
        } else {
            theirs = Some(&slot.opponent);
        }
    }
    let (ours, theirs) = match (ours, theirs) {
        (Some(a), Some(b)) => (a, b),
        _ => {
            return Err(ExtractError::Ambiguous {
                tracked: team.name.clone(),
                left: api_slug(&m.opponents[0].opponent),
                right: api_slug(&m.opponents[1].opponent),
            })
        }
    };

    let show = team.show_scores && matches!(status, MatchStatus::Post | MatchStatus::In);
    let (our_score, their_score) = if show {
        match_scores(&m.results, ours.id, theirs.id)
    } else {
        (None, None)
    };

    Ok((
        team_from_api(ours, our_score, links),
        team_from_api(theirs, their_score, links),
    ))
}

/// Scores are matched to sides by team id; when no result row names either
/// id the array order is used, matching the feed's documented ordering.
fn match_scores(
    results: &[ApiResult],
    our_id: Option<i64>,
    their_id: Option<i64>,
) -> (Option<String>, Option<String>) {
    if results.len() < 2 {
        return (None, None);
    }
    let mut ours = None;
    let mut theirs = None;
    for r in results {
        if r.team_id.is_some() && r.team_id == our_id {
            ours = r.score;
        } else if r.team_id.is_some() && r.team_id == their_id {
            theirs = r.score;
        }
    }
    if ours.is_none() && theirs.is_none() {
        ours = results[0].score;
        theirs = results[1].score;
    }
    (
        ours.map(|s| s.to_string()),
        theirs.map(|s| s.to_string()),
    )
}

fn team_from_api(api: &ApiTeam, score: Option<String>, links: &SiteLinks) -> TeamRef {
    let slug = api_slug(api);
    TeamRef {
        link: if slug.is_empty() {
            String::new()
        } else {
            links.team_page(&slug)
        },
        abbreviation: slug,
        name: api.name.clone().unwrap_or_else(|| "Unknown".to_string()),
        logo: api.image_url.clone().unwrap_or_default(),
        score,
    }
}

fn api_slug(api: &ApiTeam) -> String {
    api.slug
        .clone()
        .or_else(|| api.acronym.clone())
        .unwrap_or_default()
}

fn normalize_slug(slug: &str) -> String {
    slug.replace('_', "-")
}

/// "falcons-esports" -> "Falcons Esports".
fn titlecase_slug(slug: &str) -> String {
    slug.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Series names are the most specific the feed offers, so prefer them over
/// the tournament stage and the league umbrella.
fn tournament_ref(m: &ApiMatch, links: &SiteLinks) -> TournamentRef {
    let pick = |s: &Option<ApiSeries>, full: bool| -> Option<String> {
        s.as_ref().and_then(|s| {
            if full {
                s.full_name.clone()
            } else {
                s.name.clone()
            }
        })
    };
    let name = pick(&m.serie, true)
        .or_else(|| pick(&m.serie, false))
        .or_else(|| pick(&m.tournament, false))
        .or_else(|| pick(&m.league, false))
        .unwrap_or_else(|| "Unknown".to_string());

    let slug = m
        .serie
        .as_ref()
        .and_then(|s| s.slug.clone())
        .or_else(|| m.tournament.as_ref().and_then(|s| s.slug.clone()))
        .or_else(|| m.league.as_ref().and_then(|s| s.slug.clone()))
        .unwrap_or_default();

    TournamentRef {
        name,
        link: tournament_link(&slug, links),
    }
}

/// Best-effort wiki page for a feed slug: strip the game prefix, then
/// capitalize each dash-separated word into a subpage path.
fn tournament_link(slug: &str, links: &SiteLinks) -> String {
    if slug.is_empty() {
        return String::new();
    }
    let clean = slug
        .trim_start_matches("cs-go-")
        .trim_start_matches("cs-2-");
    let path = clean
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("/");
    links.team_page(&path)
}
