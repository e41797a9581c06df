use std::collections::HashMap;
use std::time::Duration;

use engine_logging::{engine_debug, engine_trace};

use crate::config::HighlightSettings;
use crate::document::{DocumentError, HostDocument, NodeHandle};

pub const BACKGROUND_PROPERTY: &str = "background-color";
pub const TRANSITION_PROPERTY: &str = "transition";

/// Inline style values an element had before it was highlighted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CapturedStyle {
    pub background: Option<String>,
    pub transition: Option<String>,
}

/// Deferred cleanup step of a highlight. Each stage carries the element it
/// belongs to and what it restores there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HighlightStage {
    /// Put the original background back; the transition makes it fade.
    Revert {
        node: NodeHandle,
        ticket: u64,
        original: CapturedStyle,
    },
    /// Put the original transition back once the fade is over.
    ClearTransition {
        node: NodeHandle,
        ticket: u64,
        original: CapturedStyle,
    },
}

impl HighlightStage {
    fn key(&self) -> (NodeHandle, u64) {
        match self {
            HighlightStage::Revert { node, ticket, .. }
            | HighlightStage::ClearTransition { node, ticket, .. } => (*node, *ticket),
        }
    }
}

/// A stage and the delay after which it must run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTimer {
    pub delay: Duration,
    pub stage: HighlightStage,
}

#[derive(Debug)]
struct ActiveHighlight {
    ticket: u64,
    original: CapturedStyle,
}

/// Transient emphasis of a navigated-to turn element.
///
/// Highlights are tracked per element, however the element was located. An
/// element highlighted again before its cleanup finished keeps the style
/// captured the first time; stages of the superseded highlight are ignored.
#[derive(Debug)]
pub struct Highlighter {
    settings: HighlightSettings,
    next_ticket: u64,
    active: HashMap<NodeHandle, ActiveHighlight>,
}

impl Highlighter {
    pub fn new(settings: HighlightSettings) -> Self {
        Self {
            settings,
            next_ticket: 0,
            active: HashMap::new(),
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Apply the emphasis now and return the revert stage to schedule.
    pub fn begin<D: HostDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        node: NodeHandle,
    ) -> Result<StageTimer, DocumentError> {
        let original = match self.active.get(&node) {
            Some(active) => active.original.clone(),
            None => CapturedStyle {
                background: doc.inline_style(node, BACKGROUND_PROPERTY)?,
                transition: doc.inline_style(node, TRANSITION_PROPERTY)?,
            },
        };

        doc.set_inline_style(node, TRANSITION_PROPERTY, Some(&self.settings.transition))?;
        doc.set_inline_style(node, BACKGROUND_PROPERTY, Some(&self.settings.color))?;

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.active.insert(
            node,
            ActiveHighlight {
                ticket,
                original: original.clone(),
            },
        );

        Ok(StageTimer {
            delay: self.settings.highlight_duration(),
            stage: HighlightStage::Revert {
                node,
                ticket,
                original,
            },
        })
    }

    /// Run a fired stage; returns the follow-up stage, if any.
    pub fn advance<D: HostDocument + ?Sized>(
        &mut self,
        doc: &mut D,
        stage: HighlightStage,
    ) -> Option<StageTimer> {
        let (node, ticket) = stage.key();
        let current = self
            .active
            .get(&node)
            .is_some_and(|active| active.ticket == ticket);
        if !current {
            engine_trace!("Ignoring superseded highlight stage for {:?}", node);
            return None;
        }

        match stage {
            HighlightStage::Revert {
                node,
                ticket,
                original,
            } => {
                let restored =
                    doc.set_inline_style(node, BACKGROUND_PROPERTY, original.background.as_deref());
                if let Err(err) = restored {
                    engine_debug!("Highlight target vanished before revert: {}", err);
                    self.active.remove(&node);
                    return None;
                }
                Some(StageTimer {
                    delay: self.settings.fade_duration(),
                    stage: HighlightStage::ClearTransition {
                        node,
                        ticket,
                        original,
                    },
                })
            }
            HighlightStage::ClearTransition { node, original, .. } => {
                self.active.remove(&node);
                let restored =
                    doc.set_inline_style(node, TRANSITION_PROPERTY, original.transition.as_deref());
                if let Err(err) = restored {
                    engine_debug!("Highlight target vanished before cleanup: {}", err);
                }
                None
            }
        }
    }
}
