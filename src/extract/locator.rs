use scraper::{CaseSensitivity, ElementRef};

/// Class the listing page puts on the container that encloses one match.
const CONTAINER_CLASS: &str = "new-match-style";

/// Hops examined (starting node included) before giving up.
const MAX_ASCENT: usize = 10;

/// Walk up from a node known to sit inside a match record (typically the
/// anchor referencing the tracked team) until the enclosing match container
/// is found. The record boundary carries no unique id, so it has to be
/// discovered structurally.
///
/// Returns `None` when no qualifying ancestor exists within the bound.
pub fn find_match_container(start: ElementRef<'_>) -> Option<ElementRef<'_>> {
    let mut node = Some(*start);
    for _ in 0..MAX_ASCENT {
        let current = node?;
        if let Some(el) = ElementRef::wrap(current) {
            let v = el.value();
            if v.name() == "div"
                && v.has_class(CONTAINER_CLASS, CaseSensitivity::CaseSensitive)
            {
                return Some(el);
            }
        }
        node = current.parent();
    }
    None
}
