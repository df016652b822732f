use scraper::ElementRef;

use crate::extract::links::SiteLinks;
use crate::extract::{collect_text, css};

/// Raw fields scraped from one team's visual block, before disambiguation
/// and link normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTeamBlock {
    pub name: String,
    pub abbreviation: String,
    /// href as scraped, possibly relative or empty.
    pub href: String,
    /// Logo src as scraped, possibly relative or empty.
    pub logo: String,
    /// The name was a wiki self-link, i.e. this block refers to the page's
    /// own subject.
    pub is_self: bool,
}

impl RawTeamBlock {
    /// An unresolvable or placeholder opponent.
    pub fn is_tbd(&self) -> bool {
        self.name.is_empty() || self.name == "TBD"
    }
}

/// Extract the raw team fields from a team block.
///
/// The block is the horizontal `div.block-team` of the listing page, or a
/// vertical table-cell variant from a team page; both carry a name label
/// (self-link, profile link, red link or plain text) and an optional crest.
pub fn extract_team_block(block: ElementRef<'_>, links: &SiteLinks) -> RawTeamBlock {
    let name_label = css("span.name");
    let self_link = css("strong.mw-selflink");
    let anchor = css("a");
    let image = css("img");

    let logo = block
        .select(&image)
        .next()
        .and_then(|img| img.value().attr("src"))
        .unwrap_or_default()
        .to_string();

    // Table-cell variants carry the link directly, without a name label.
    let scope = block.select(&name_label).next().unwrap_or(block);

    if let Some(strong) = scope.select(&self_link).next() {
        // A page referring to its own subject has no distinct URL; the
        // display name doubles as the identifier.
        let name = collect_text(&strong);
        return RawTeamBlock {
            abbreviation: name.clone(),
            name,
            href: String::new(),
            logo,
            is_self: true,
        };
    }

    if let Some(a) = scope.select(&anchor).next() {
        let name = collect_text(&a);
        let href = a.value().attr("href").unwrap_or_default().to_string();
        let abbreviation = links
            .slug_from_href(&href)
            .unwrap_or_else(|| name.clone());
        return RawTeamBlock {
            name,
            abbreviation,
            href,
            logo,
            is_self: false,
        };
    }

    // Plain-text label, e.g. a literal "TBD" opponent.
    let name = collect_text(&scope);
    RawTeamBlock {
        abbreviation: name.clone(),
        name,
        href: String::new(),
        logo,
        is_self: false,
    }
}
