use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::model::{is_truthy, RawTurn};

/// Network operations whose responses carry a conversation snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKeyword {
    CreatePrompt,
    ResolveDriveResource,
    UpdatePrompt,
}

/// Positional layout of a snapshot payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Turns at `[0][13][0]`, title at `[0][4][0]`.
    Wrapped,
    /// Turns at `[13][0]`, title at `[4][0]`.
    Direct,
}

impl ApiKeyword {
    pub const ALL: [ApiKeyword; 3] = [
        ApiKeyword::CreatePrompt,
        ApiKeyword::ResolveDriveResource,
        ApiKeyword::UpdatePrompt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ApiKeyword::CreatePrompt => "CreatePrompt",
            ApiKeyword::ResolveDriveResource => "ResolveDriveResource",
            ApiKeyword::UpdatePrompt => "UpdatePrompt",
        }
    }

    pub fn shape(self) -> PayloadShape {
        match self {
            ApiKeyword::ResolveDriveResource => PayloadShape::Wrapped,
            ApiKeyword::CreatePrompt | ApiKeyword::UpdatePrompt => PayloadShape::Direct,
        }
    }

    /// First known keyword contained in a request URL.
    pub fn match_url(url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| url.contains(keyword.as_str()))
    }
}

impl fmt::Display for ApiKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiKeyword {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str() == s)
            .ok_or_else(|| DecodeError::UnknownKeyword(s.to_string()))
    }
}

impl PayloadShape {
    fn turns_path(self) -> &'static [usize] {
        match self {
            PayloadShape::Wrapped => &[0, 13, 0],
            PayloadShape::Direct => &[13, 0],
        }
    }

    fn title_path(self) -> &'static [usize] {
        match self {
            PayloadShape::Wrapped => &[0, 4, 0],
            PayloadShape::Direct => &[4, 0],
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown api keyword '{0}'")]
    UnknownKeyword(String),
    #[error("{keyword} payload matches neither turns nor title slot")]
    ShapeMismatch { keyword: ApiKeyword },
}

/// What could be read from one payload. Each half is independent: a missing
/// half leaves the corresponding prior value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DecodedPayload {
    pub turns: Option<Vec<Option<RawTurn>>>,
    pub title: Option<String>,
}

/// Decode an intercepted event whose keyword arrives as a plain string.
pub fn decode_event(payload: &Value, api_keyword: &str) -> Result<DecodedPayload, DecodeError> {
    let keyword = api_keyword.parse::<ApiKeyword>()?;
    decode_payload(payload, keyword)
}

/// Read turns and title from the slots selected by `keyword`. Never indexes
/// unchecked; a wrong type anywhere along a path reads as absent.
pub fn decode_payload(payload: &Value, keyword: ApiKeyword) -> Result<DecodedPayload, DecodeError> {
    let shape = keyword.shape();

    let turns = lookup(payload, shape.turns_path())
        .and_then(Value::as_array)
        .map(|records| records.iter().map(RawTurn::from_value).collect::<Vec<_>>());

    let title = lookup(payload, shape.title_path())
        .filter(|value| is_truthy(value))
        .and_then(Value::as_str)
        .map(str::to_owned);

    if turns.is_none() && title.is_none() {
        return Err(DecodeError::ShapeMismatch { keyword });
    }
    Ok(DecodedPayload { turns, title })
}

fn lookup<'a>(value: &'a Value, path: &[usize]) -> Option<&'a Value> {
    path.iter()
        .try_fold(value, |node, &index| node.as_array()?.get(index))
}
