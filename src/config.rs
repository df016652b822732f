use clap::Parser;
use std::str::FromStr;

/// Counter-Strike match sensor daemon
#[derive(Parser, Debug, Clone)]
#[command(name = "csmatch-sensor", version, about)]
pub struct Config {
    /// Tracked team as `Name[:upcoming|completed][:noscore]`, e.g.
    /// `FaZe_Clan`, `G2_Esports:completed`, `Team_Vitality:completed:noscore`.
    /// Repeat the flag (or comma-separate via env) for multiple teams.
    #[arg(long = "team", env = "TRACKED_TEAMS", value_delimiter = ',', required = true)]
    pub teams: Vec<TeamSpec>,

    /// Which source backs the sensors
    #[arg(long, env = "MATCH_SOURCE", value_enum, default_value_t = SourceKind::Listing)]
    pub source: SourceKind,

    /// Wiki root for the scraped sources
    #[arg(long, env = "SITE_BASE_URL", default_value = "https://liquipedia.net")]
    pub base_url: String,

    /// Game section under the wiki root
    #[arg(long, env = "SITE_GAME", default_value = "counterstrike")]
    pub game: String,

    /// PandaScore API base URL
    #[arg(
        long,
        env = "PANDASCORE_API_URL",
        default_value = "https://api.pandascore.co"
    )]
    pub pandascore_api_url: String,

    /// PandaScore API key (required for the pandascore source)
    #[arg(long, env = "PANDASCORE_API_KEY")]
    pub pandascore_api_key: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "3600")]
    pub poll_interval_secs: u64,

    /// Sensor API listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8090")]
    pub listen_addr: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.source == SourceKind::Pandascore && self.pandascore_api_key.is_none() {
            anyhow::bail!("PANDASCORE_API_KEY is required when --source pandascore is selected");
        }
        if self.poll_interval_secs == 0 {
            anyhow::bail!("poll_interval_secs must be positive");
        }
        for team in &self.teams {
            if team.name.is_empty() {
                anyhow::bail!("tracked team name must not be empty");
            }
        }
        Ok(())
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Scrape the aggregate matches listing page
    Listing,
    /// Scrape the team's own page (fixture carousel / results table)
    TeamPage,
    /// Query the PandaScore REST API
    Pandascore,
}

/// Which phase of matches a sensor tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    Upcoming,
    Completed,
}

impl MatchPhase {
    /// Value of the listing page's `data-toggle-area-content` section key.
    pub fn toggle_area(&self) -> &'static str {
        match self {
            MatchPhase::Upcoming => "1",
            MatchPhase::Completed => "2",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchPhase::Upcoming => "upcoming",
            MatchPhase::Completed => "completed",
        }
    }
}

/// One tracked team/phase pair, with its per-sensor options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSpec {
    /// Canonical abbreviation/slug as it appears in team page URLs.
    pub name: String,
    pub phase: MatchPhase,
    pub show_scores: bool,
}

impl TeamSpec {
    /// Stable entity id the sensor is registered under.
    pub fn entity_id(&self) -> String {
        let slug: String = self
            .name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("sensor.cs_{}_{}", slug, self.phase.as_str())
    }
}

impl FromStr for TeamSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| "team name must not be empty".to_string())?
            .to_string();

        let mut phase = MatchPhase::Upcoming;
        let mut show_scores = true;
        for part in parts {
            match part {
                "upcoming" => phase = MatchPhase::Upcoming,
                "completed" => phase = MatchPhase::Completed,
                "noscore" => show_scores = false,
                "score" => show_scores = true,
                other => {
                    return Err(format!(
                        "unknown team option '{}' (expected upcoming|completed|score|noscore)",
                        other
                    ))
                }
            }
        }

        Ok(TeamSpec {
            name,
            phase,
            show_scores,
        })
    }
}
