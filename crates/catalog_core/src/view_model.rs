use crate::model::{CatalogItem, ContentType};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogViewModel {
    pub visible: bool,
    pub title: String,
    pub rows: Vec<CatalogRowView>,
    /// Render the explicit empty state instead of rows.
    pub empty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRowView {
    pub turn_index: usize,
    pub label: String,
    pub content_type: ContentType,
    pub bound: bool,
    pub selected: bool,
}

impl CatalogRowView {
    pub(crate) fn from_item(item: &CatalogItem, selected: bool) -> Self {
        // Placeholders are short; only prompt text is shown truncated.
        let label = match item.content_type {
            ContentType::Text => item.truncated_text.clone(),
            ContentType::Image | ContentType::File => item.text.clone(),
        };
        Self {
            turn_index: item.turn_index,
            label,
            content_type: item.content_type,
            bound: item.element_id.is_some(),
            selected,
        }
    }
}
