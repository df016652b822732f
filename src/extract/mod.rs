pub mod disambiguate;
pub mod links;
pub mod locator;
pub mod score;
pub mod status;
pub mod team_block;

pub use disambiguate::disambiguate;
pub use links::SiteLinks;
pub use locator::find_match_container;
pub use score::{parse_score, ScorePair};
pub use status::classify_status;
pub use team_block::{extract_team_block, RawTeamBlock};

use scraper::{ElementRef, Selector};

/// Compile a selector known to be valid at compile time.
pub(crate) fn css(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|_| unreachable!())
}

/// Trimmed text of the first element matching `selector` under `el`.
pub(crate) fn select_text(el: &ElementRef, selector: &Selector) -> String {
    el.select(selector)
        .next()
        .map(|e| collect_text(&e))
        .unwrap_or_default()
}

/// All text under an element, whitespace-trimmed.
pub(crate) fn collect_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
