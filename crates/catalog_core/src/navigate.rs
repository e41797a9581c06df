use engine_logging::engine_debug;

use crate::model::CatalogItem;
use crate::scan::DocumentScan;

/// How the runner finds the element to focus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TurnLocator {
    /// Element identifier.
    Id(String),
    /// Index among all turn elements, in document order.
    Position(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTier {
    Direct,
    OrdinalFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub locator: TurnLocator,
    pub tier: NavigationTier,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationMiss {
    #[error("no catalog entry for turn {turn_index}")]
    UnknownTurn { turn_index: usize },
    #[error("document has no turn elements")]
    NoTurnElements,
    #[error("catalog ordinal {ordinal} has no user element ({available} available)")]
    OrdinalOutOfRange { ordinal: usize, available: usize },
}

/// Resolve `turn_index` to an element: first by the entry's bound id, then by
/// the entry's catalog ordinal against the user elements currently present.
pub fn resolve_navigation(
    items: &[CatalogItem],
    turn_index: usize,
    scan: &DocumentScan,
) -> Result<NavigationTarget, NavigationMiss> {
    let ordinal = items
        .iter()
        .position(|item| item.turn_index == turn_index)
        .ok_or(NavigationMiss::UnknownTurn { turn_index })?;

    if let Some(id) = items[ordinal].element_id.as_deref() {
        if scan.contains(id) {
            return Ok(NavigationTarget {
                locator: TurnLocator::Id(id.to_string()),
                tier: NavigationTier::Direct,
            });
        }
        engine_debug!("Bound element '{}' is gone; trying ordinal {}", id, ordinal);
    }

    if scan.is_empty() {
        return Err(NavigationMiss::NoTurnElements);
    }

    match scan.user_turns().nth(ordinal) {
        Some((position, _)) => Ok(NavigationTarget {
            locator: TurnLocator::Position(position),
            tier: NavigationTier::OrdinalFallback,
        }),
        None => Err(NavigationMiss::OrdinalOutOfRange {
            ordinal,
            available: scan.user_turns().count(),
        }),
    }
}
