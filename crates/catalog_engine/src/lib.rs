//! Catalog engine: the side-effecting collaborators of the catalog core.
//!
//! Host document access, deferred callbacks, highlight sequencing and the
//! markdown export live here; the state machine itself is in `catalog_core`.
mod config;
mod document;
mod export;
mod filename;
mod highlight;
mod persist;
mod timers;

pub use config::{EngineConfig, HighlightSettings, TurnSelectors};
pub use document::{
    DocumentError, HostDocument, HtmlDocument, InlineStyle, MutationRecord, NodeHandle,
    ScrolledTurn,
};
pub use export::build_markdown;
pub use filename::export_filename;
pub use highlight::{
    CapturedStyle, HighlightStage, Highlighter, StageTimer, BACKGROUND_PROPERTY,
    TRANSITION_PROPERTY,
};
pub use persist::{ensure_output_dir, ExportError, ExportWriter};
pub use timers::{ManualScheduler, Scheduler, TimerHandle, Unscheduled};
