use engine_logging::engine_trace;

use crate::model::{
    CatalogItem, ContentType, RawTurn, Role, TextContent, FILE_PLACEHOLDER, IMAGE_PLACEHOLDER,
};
use crate::scan::DocumentScan;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("user turn {turn_index} has an unreadable text slot ({kind})")]
    UnreadableText {
        turn_index: usize,
        kind: &'static str,
    },
}

/// Binds catalog entries to document turn elements by user ordinal: the Nth
/// entry built belongs to the Nth user-marked element in document order.
pub struct ElementBinder<'a> {
    scan: &'a DocumentScan,
}

impl<'a> ElementBinder<'a> {
    pub fn new(scan: &'a DocumentScan) -> Self {
        Self { scan }
    }

    /// Identifier of the user element at `ordinal`, if there is one and it has an id.
    pub fn bind(&self, ordinal: usize) -> Option<String> {
        self.scan
            .user_turns()
            .nth(ordinal)
            .and_then(|(_, element)| element.id.clone())
    }
}

/// Build the catalog of user turns, in snapshot order, bound against `scan`.
///
/// Turns without readable text still get an entry (`[Image]` or `[File]`)
/// so catalog ordinals stay aligned with the user turns in the document.
pub fn extract_catalog(
    turns: &[Option<RawTurn>],
    scan: &DocumentScan,
) -> Result<Vec<CatalogItem>, ExtractError> {
    let binder = ElementBinder::new(scan);
    let mut items: Vec<CatalogItem> = Vec::new();

    for (turn_index, turn) in turns.iter().enumerate() {
        let Some(turn) = turn else {
            continue;
        };
        if turn.role != Role::User {
            continue;
        }

        let (content_type, text) = classify(turn_index, turn)?;
        let element_id = binder.bind(items.len());
        if element_id.is_none() {
            engine_trace!(
                "No document element for catalog entry {} (turn {})",
                items.len(),
                turn_index
            );
        }
        items.push(CatalogItem::new(turn_index, element_id, text, content_type));
    }

    Ok(items)
}

fn classify(turn_index: usize, turn: &RawTurn) -> Result<(ContentType, String), ExtractError> {
    match &turn.text_content {
        TextContent::Unreadable(kind) => Err(ExtractError::UnreadableText {
            turn_index,
            kind: *kind,
        }),
        TextContent::Text(text) if !text.trim().is_empty() => {
            Ok((ContentType::Text, text.trim().to_string()))
        }
        _ if turn.has_media() => Ok((ContentType::Image, IMAGE_PLACEHOLDER.to_string())),
        _ => Ok((ContentType::File, FILE_PLACEHOLDER.to_string())),
    }
}
