//! Catalog core: pure state machine for the prompt catalog.
//!
//! Decodes intercepted conversation payloads into turns, derives the catalog
//! of user prompts bound to document elements, prunes stale entries and
//! resolves navigation requests. Document observations arrive inside
//! messages as [`DocumentScan`]s; nothing here touches the document itself.
mod decode;
mod effect;
mod extract;
mod model;
mod msg;
mod navigate;
mod scan;
mod state;
mod update;
mod validate;
mod view_model;

pub use decode::{
    decode_event, decode_payload, ApiKeyword, DecodeError, DecodedPayload, PayloadShape,
};
pub use effect::Effect;
pub use extract::{extract_catalog, ElementBinder, ExtractError};
pub use model::{
    is_truthy, truncate_text, CatalogItem, ContentType, ConversationSnapshot, RawTurn, Role,
    TextContent, ELLIPSIS, FILE_PLACEHOLDER, IMAGE_PLACEHOLDER, MIN_TURN_SLOTS, TRUNCATE_CHARS,
};
pub use msg::Msg;
pub use navigate::{
    resolve_navigation, NavigationMiss, NavigationTarget, NavigationTier, TurnLocator,
};
pub use scan::{DocumentScan, TurnElement};
pub use state::{CatalogState, DEFAULT_TITLE};
pub use update::update;
pub use validate::prune_stale;
pub use view_model::{CatalogRowView, CatalogViewModel};
