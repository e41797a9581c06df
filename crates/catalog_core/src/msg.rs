use serde_json::Value;

use crate::scan::DocumentScan;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Interceptor republished a network response.
    PayloadReceived {
        payload: Value,
        api_keyword: String,
        scan: DocumentScan,
    },
    /// Document mutation notification; `removed_turns` counts removed
    /// turn-bearing elements.
    DocumentMutated { removed_turns: usize },
    /// The settle delay after a mutation elapsed.
    ValidationDue { scan: DocumentScan },
    /// User opened or closed the catalog. `None` toggles.
    CatalogToggled { show: Option<bool> },
    /// User clicked (or pressed Enter/Space on) a catalog entry.
    PromptActivated { turn_index: usize, scan: DocumentScan },
    /// User asked for the markdown export.
    ExportRequested,
}
