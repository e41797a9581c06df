use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Host page structure used to find turn elements. The host renames these
/// from time to time, so they are configuration rather than constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnSelectors {
    /// Tag of the element wrapping one turn.
    pub turn_tag: String,
    /// Class of the container inside a turn that carries the role marker.
    pub container_class: String,
    /// Marker class on that container for user turns.
    pub user_class: String,
}

impl Default for TurnSelectors {
    fn default() -> Self {
        Self {
            turn_tag: "ms-chat-turn".to_string(),
            container_class: "chat-turn-container".to_string(),
            user_class: "user".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightSettings {
    pub color: String,
    pub transition: String,
    /// How long the emphasis stays before fading.
    pub highlight_ms: u64,
    /// Delay between reverting the background and restoring the transition.
    pub fade_ms: u64,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            color: "rgba(66, 133, 244, 0.1)".to_string(),
            transition: "background-color 0.3s ease".to_string(),
            highlight_ms: 1_500,
            fade_ms: 300,
        }
    }
}

impl HighlightSettings {
    pub fn highlight_duration(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub selectors: TurnSelectors,
    /// Settle time between a mutation notification and the staleness check.
    pub validation_delay_ms: u64,
    pub highlight: HighlightSettings,
    /// Title used until a payload provides one.
    pub default_title: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            selectors: TurnSelectors::default(),
            validation_delay_ms: 100,
            highlight: HighlightSettings::default(),
            default_title: catalog_core::DEFAULT_TITLE.to_string(),
        }
    }
}

impl EngineConfig {
    pub fn validation_delay(&self) -> Duration {
        Duration::from_millis(self.validation_delay_ms)
    }
}
