pub mod listing;
pub mod pandascore;
pub mod team_page;

pub use listing::ListingSource;
pub use pandascore::PandascoreSource;
pub use team_page::TeamPageSource;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, SourceKind, TeamSpec};
use crate::error::Result;
use crate::extract::SiteLinks;
use crate::fetch::SourceClient;
use crate::model::MatchRecord;

/// Trait every match source must implement.
///
/// A source turns one tracked team/phase pair into a normalized record.
/// Implementations are independent of the polling schedule; all transport
/// and parse failures surface through the error taxonomy so the caller can
/// degrade that one sensor.
#[async_trait]
pub trait MatchSource: Send + Sync {
    /// Fetch and normalize the relevant match for one tracked team.
    async fn fetch_match(&self, team: &TeamSpec) -> Result<MatchRecord>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Build the source selected by configuration.
pub fn build_source(config: &Config, client: SourceClient) -> anyhow::Result<Arc<dyn MatchSource>> {
    let links = SiteLinks::new(&config.base_url, &config.game)?;
    Ok(match config.source {
        SourceKind::Listing => Arc::new(ListingSource::new(client, links)),
        SourceKind::TeamPage => Arc::new(TeamPageSource::new(client, links)),
        SourceKind::Pandascore => Arc::new(PandascoreSource::new(
            client,
            links,
            &config.pandascore_api_url,
            config.pandascore_api_key.clone().unwrap_or_default(),
        )),
    })
}
