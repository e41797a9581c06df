#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Catalog is visible and must be redrawn from `CatalogState::view`.
    RenderCatalog,
    /// Run a validation after the settle delay.
    ScheduleValidation,
    /// Scroll the element into view and highlight it.
    FocusTurn { locator: crate::TurnLocator },
    ExportSnapshot {
        snapshot: crate::ConversationSnapshot,
    },
    /// Export asked for before any snapshot was decoded.
    ExportUnavailable,
}
