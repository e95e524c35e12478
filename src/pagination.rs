use std::collections::BTreeSet;

const EDGE_PAGES: usize = 2;
const PAGES_BEFORE_CURRENT: usize = 2;
const PAGES_AFTER_CURRENT: usize = 4;

/// Page links for pagination controls.
///
/// `current_index` is zero-based; returned numbers are one-based for display
/// and `None` marks a gap between non-adjacent links.
pub fn page_window(total_pages: usize, current_index: usize) -> Vec<Option<usize>> {
    if total_pages == 0 {
        return Vec::new();
    }

    let current = (current_index + 1).min(total_pages);
    let mut shown = BTreeSet::new();
    shown.extend(1..=EDGE_PAGES.min(total_pages));
    shown.extend(
        current.saturating_sub(PAGES_BEFORE_CURRENT).max(1)
            ..=(current + PAGES_AFTER_CURRENT).min(total_pages),
    );
    shown.extend((total_pages.saturating_sub(EDGE_PAGES) + 1)..=total_pages);

    let mut links = Vec::with_capacity(shown.len() + 2);
    let mut previous = 0;
    for page in shown {
        if page > previous + 1 {
            links.push(None);
        }
        links.push(Some(page));
        previous = page;
    }
    links
}
