/// A validated left/right score pair. The numeric strings are kept verbatim
/// as scraped rather than re-rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorePair {
    pub left: String,
    pub right: String,
}

/// Parse a raw score string like `"16:12"`.
///
/// Returns `None` (no real score yet) for forfeits (`FF`), walkover
/// shorthand (`W`), placeholder hyphens, misdetected timezone-suffixed
/// clock strings (`EST`/`PST`), and anything that is not exactly two
/// colon-delimited integers.
pub fn parse_score(raw: &str) -> Option<ScorePair> {
    let upper = raw.to_uppercase();
    if upper.contains("EST") || upper.contains("PST") {
        return None;
    }

    let mut parts = raw.split(':');
    let left = parts.next()?.trim();
    let right = parts.next()?.trim();
    if parts.next().is_some() {
        return None;
    }

    for side in [left, right] {
        if side.contains("FF") || side.contains('W') || side.contains('-') {
            return None;
        }
        if side.is_empty() || side.parse::<u32>().is_err() {
            return None;
        }
    }

    Some(ScorePair {
        left: left.to_string(),
        right: right.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_score() {
        let pair = parse_score("16:12").unwrap();
        assert_eq!(pair.left, "16");
        assert_eq!(pair.right, "12");
    }

    #[test]
    fn test_accepts_padded_score() {
        let pair = parse_score(" 2 : 0 ").unwrap();
        assert_eq!(pair.left, "2");
        assert_eq!(pair.right, "0");
    }

    #[test]
    fn test_rejects_forfeits_and_walkovers() {
        assert!(parse_score("W : FF").is_none());
        assert!(parse_score("2 : FF").is_none());
        assert!(parse_score("W : 0").is_none());
    }

    #[test]
    fn test_rejects_placeholder_hyphens() {
        assert!(parse_score("- : -").is_none());
    }

    #[test]
    fn test_rejects_timezone_suffixed_clock() {
        assert!(parse_score("10:30 EST").is_none());
        assert!(parse_score("10:30 PST").is_none());
    }

    #[test]
    fn test_rejects_wrong_arity_and_garbage() {
        assert!(parse_score("16").is_none());
        assert!(parse_score("1:2:3").is_none());
        assert!(parse_score("vs").is_none());
        assert!(parse_score("a:b").is_none());
        assert!(parse_score(":").is_none());
    }
}
