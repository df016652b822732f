use url::Url;

/// Crest shown for a TBD opponent.
pub const DEFAULT_CREST_PATH: &str =
    "/commons/images/thumb/5/57/Counter-Strike_2_default_lightmode.png/47px-Counter-Strike_2_default_lightmode.png";

const MATCHES_PAGE: &str = "Liquipedia:Matches";

/// Builds absolute site URLs and derives canonical team slugs from the two
/// link encodings the wiki uses: direct paths (`/<game>/<Slug>`) and
/// redirect-style "red links" (`/index.php?title=Ns:Slug&...`).
#[derive(Debug, Clone)]
pub struct SiteLinks {
    base: Url,
    game: String,
}

impl SiteLinks {
    pub fn new(base_url: &str, game: &str) -> Result<Self, url::ParseError> {
        Ok(SiteLinks {
            base: Url::parse(base_url)?,
            game: game.trim_matches('/').to_string(),
        })
    }

    pub fn game(&self) -> &str {
        &self.game
    }

    /// Absolute form of a scraped href. Empty stays empty; absolute hrefs
    /// pass through unchanged.
    pub fn absolute(&self, href: &str) -> String {
        if href.is_empty() {
            return String::new();
        }
        self.base
            .join(href)
            .map(|u| u.to_string())
            .unwrap_or_default()
    }

    /// Canonical profile URL for a team slug.
    pub fn team_page(&self, slug: &str) -> String {
        self.absolute(&format!("/{}/{}", self.game, slug))
    }

    /// The aggregate matches listing page.
    pub fn matches_page(&self) -> String {
        self.absolute(&format!("/{}/{}", self.game, MATCHES_PAGE))
    }

    pub fn default_crest(&self) -> String {
        self.absolute(DEFAULT_CREST_PATH)
    }

    /// Derive a canonical team slug from a scraped href.
    ///
    /// Direct links yield the trailing path segment; red links yield the
    /// decoded `title` query parameter with any namespace prefix stripped.
    /// Returns `None` when the href matches neither shape.
    pub fn slug_from_href(&self, href: &str) -> Option<String> {
        if href.is_empty() {
            return None;
        }

        // Work on the site-relative form so absolute links resolve too.
        let resolved = self.base.join(href).ok()?;
        let path = resolved.path();

        let prefix = format!("/{}/", self.game);
        if let Some(rest) = path.strip_prefix(prefix.as_str()) {
            if !rest.is_empty() && resolved.query().is_none() {
                let slug = rest.rsplit('/').find(|s| !s.is_empty())?;
                return Some(slug.to_string());
            }
        }

        if path.ends_with("index.php") {
            let title = resolved
                .query_pairs()
                .find(|(k, _)| k == "title")
                .map(|(_, v)| v.into_owned())?;
            let stripped = match title.split_once(':') {
                Some((_, rest)) => rest.to_string(),
                None => title,
            };
            if !stripped.is_empty() {
                return Some(stripped);
            }
        }

        None
    }
}
