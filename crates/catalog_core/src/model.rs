use serde_json::Value;

/// Display text limit for catalog rows, in characters.
pub const TRUNCATE_CHARS: usize = 50;
pub const ELLIPSIS: &str = "...";
/// A positional record shorter than this is not a turn.
pub const MIN_TURN_SLOTS: usize = 9;

pub const IMAGE_PLACEHOLDER: &str = "[Image]";
pub const FILE_PLACEHOLDER: &str = "[File]";

const TEXT_SLOT: usize = 0;
const IMAGE_SLOT: usize = 1;
const OVERRIDE_SLOT: usize = 2;
const ROLE_SLOT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Model,
    Unknown,
}

impl Role {
    fn from_slot(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("user") => Role::User,
            Some("model") => Role::Model,
            _ => Role::Unknown,
        }
    }
}

/// Contents of the text slot, classified by how the host filled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextContent {
    /// Absent or falsy (`null`, `false`, `0`, `""`).
    Missing,
    Text(String),
    /// A truthy value that is not a string; carries the JSON kind.
    Unreadable(&'static str),
}

impl TextContent {
    fn from_slot(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(text)) if !text.is_empty() => TextContent::Text(text.clone()),
            Some(other) if is_truthy(other) => TextContent::Unreadable(value_kind(other)),
            _ => TextContent::Missing,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TextContent::Text(text) => Some(text),
            TextContent::Missing | TextContent::Unreadable(_) => None,
        }
    }
}

/// One exchange unit read out of the host's positional turn record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTurn {
    pub text_content: TextContent,
    pub image_content: Option<Vec<Value>>,
    /// Non-empty string from the override slot; supersedes the text for model display.
    pub override_content: Option<String>,
    pub role: Role,
}

impl RawTurn {
    /// Reads a turn record. Anything that is not an array of at least
    /// [`MIN_TURN_SLOTS`] entries is not a turn.
    pub fn from_value(value: &Value) -> Option<Self> {
        let slots = value
            .as_array()
            .filter(|slots| slots.len() >= MIN_TURN_SLOTS)?;

        Some(Self {
            text_content: TextContent::from_slot(slots.get(TEXT_SLOT)),
            image_content: slots.get(IMAGE_SLOT).and_then(Value::as_array).cloned(),
            override_content: slots
                .get(OVERRIDE_SLOT)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_owned),
            role: Role::from_slot(slots.get(ROLE_SLOT)),
        })
    }

    pub fn has_media(&self) -> bool {
        self.image_content
            .as_ref()
            .is_some_and(|media| !media.is_empty())
    }

    /// Text shown for a model answer: the override slot wins over the text slot.
    pub fn display_text(&self) -> Option<&str> {
        self.override_content
            .as_deref()
            .or_else(|| self.text_content.as_text())
    }
}

/// Full decoded state of a conversation. Turn positions are kept: an entry
/// that failed turn validation stays as `None` so indices match the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSnapshot {
    pub title: String,
    pub turns: Vec<Option<RawTurn>>,
}

impl ConversationSnapshot {
    pub fn valid_turns(&self) -> impl Iterator<Item = (usize, &RawTurn)> + '_ {
        self.turns
            .iter()
            .enumerate()
            .filter_map(|(index, turn)| turn.as_ref().map(|turn| (index, turn)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Text,
    Image,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Position of the source turn in the snapshot, not the catalog ordinal.
    pub turn_index: usize,
    pub element_id: Option<String>,
    pub text: String,
    pub truncated_text: String,
    pub content_type: ContentType,
}

impl CatalogItem {
    pub fn new(
        turn_index: usize,
        element_id: Option<String>,
        text: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        let text = text.into();
        let truncated_text = truncate_text(&text);
        Self {
            turn_index,
            element_id,
            text,
            truncated_text,
            content_type,
        }
    }
}

/// Caps `text` at [`TRUNCATE_CHARS`] characters, appending [`ELLIPSIS`] when cut.
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(TRUNCATE_CHARS) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Truthiness as the host page evaluates it.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
