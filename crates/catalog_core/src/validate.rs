use crate::model::CatalogItem;
use crate::scan::DocumentScan;

/// Drop every entry whose bound element is no longer in the document.
/// Unbound entries are kept. Returns how many entries were removed.
///
/// Only removes; the relative order of survivors is untouched, so running
/// it again against the same scan removes nothing.
pub fn prune_stale(items: &mut Vec<CatalogItem>, scan: &DocumentScan) -> usize {
    let before = items.len();
    items.retain(|item| {
        item.element_id
            .as_deref()
            .map_or(true, |id| scan.contains(id))
    });
    before - items.len()
}
