use crate::extract::{extract_catalog, ExtractError};
use crate::model::{CatalogItem, ConversationSnapshot, RawTurn};
use crate::scan::DocumentScan;
use crate::validate::prune_stale;
use crate::view_model::{CatalogRowView, CatalogViewModel};

pub const DEFAULT_TITLE: &str = "Untitled prompt";

/// The catalog store: the only shared mutable state of the engine.
///
/// Items are replaced wholesale by each decoded snapshot and otherwise only
/// shrink through validation. Visibility changes only on explicit toggles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    title: String,
    turns: Option<Vec<Option<RawTurn>>>,
    items: Vec<CatalogItem>,
    visible: bool,
    selected: Option<usize>,
    validation_pending: bool,
    dirty: bool,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self::with_title(DEFAULT_TITLE)
    }
}

impl CatalogState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose title until the first decoded one is `title`.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            turns: None,
            items: Vec::new(),
            visible: false,
            selected: None,
            validation_pending: false,
            dirty: false,
        }
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_validation_pending(&self) -> bool {
        self.validation_pending
    }

    /// Last decoded turns paired with the current title.
    pub fn snapshot(&self) -> Option<ConversationSnapshot> {
        self.turns.as_ref().map(|turns| ConversationSnapshot {
            title: self.title.clone(),
            turns: turns.clone(),
        })
    }

    pub fn view(&self) -> CatalogViewModel {
        let rows = self
            .items
            .iter()
            .map(|item| CatalogRowView::from_item(item, self.selected == Some(item.turn_index)))
            .collect::<Vec<_>>();
        CatalogViewModel {
            visible: self.visible,
            title: self.title.clone(),
            empty: rows.is_empty(),
            rows,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Replace the turns and rebuild the catalog from scratch against `scan`.
    /// On extraction failure the catalog is cleared rather than left stale.
    pub(crate) fn replace_turns(
        &mut self,
        turns: Vec<Option<RawTurn>>,
        scan: &DocumentScan,
    ) -> Result<usize, ExtractError> {
        let extracted = extract_catalog(&turns, scan);
        self.turns = Some(turns);
        self.selected = None;
        self.mark_dirty();
        match extracted {
            Ok(items) => {
                self.items = items;
                Ok(self.items.len())
            }
            Err(err) => {
                self.items.clear();
                Err(err)
            }
        }
    }

    /// Returns true when the title changed.
    pub(crate) fn replace_title(&mut self, title: String) -> bool {
        if self.title == title {
            return false;
        }
        self.title = title;
        self.mark_dirty();
        true
    }

    /// Returns true when visibility changed.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        self.mark_dirty();
        true
    }

    /// Returns true when the selection changed.
    pub(crate) fn select(&mut self, turn_index: usize) -> bool {
        if self.selected == Some(turn_index) {
            return false;
        }
        self.selected = Some(turn_index);
        self.mark_dirty();
        true
    }

    /// Returns true when no validation was pending, i.e. one must be scheduled.
    pub(crate) fn begin_validation(&mut self) -> bool {
        !std::mem::replace(&mut self.validation_pending, true)
    }

    pub(crate) fn finish_validation(&mut self) {
        self.validation_pending = false;
    }

    pub(crate) fn prune_stale(&mut self, scan: &DocumentScan) -> usize {
        let removed = prune_stale(&mut self.items, scan);
        if removed > 0 {
            if let Some(selected) = self.selected {
                if !self.items.iter().any(|item| item.turn_index == selected) {
                    self.selected = None;
                }
            }
            self.mark_dirty();
        }
        removed
    }
}
