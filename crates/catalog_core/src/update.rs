use engine_logging::{engine_debug, engine_info, engine_trace, engine_warn};

use crate::decode::{decode_event, DecodedPayload};
use crate::navigate::resolve_navigation;
use crate::scan::DocumentScan;
use crate::{CatalogState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
///
/// Each call runs to completion; the store is never observed half-updated.
pub fn update(mut state: CatalogState, msg: Msg) -> (CatalogState, Vec<Effect>) {
    let effects = match msg {
        Msg::PayloadReceived {
            payload,
            api_keyword,
            scan,
        } => match decode_event(&payload, &api_keyword) {
            Ok(decoded) => apply_decoded(&mut state, decoded, &scan),
            Err(err) => {
                // Prior snapshot-derived state stays as it was.
                engine_debug!("Ignoring intercepted payload: {}", err);
                Vec::new()
            }
        },
        Msg::DocumentMutated { removed_turns } => {
            if removed_turns == 0 {
                Vec::new()
            } else if state.begin_validation() {
                vec![Effect::ScheduleValidation]
            } else {
                // The pending check runs after this mutation too.
                engine_trace!(
                    "Validation already pending; {} removal(s) folded in",
                    removed_turns
                );
                Vec::new()
            }
        }
        Msg::ValidationDue { scan } => {
            state.finish_validation();
            let removed = state.prune_stale(&scan);
            if removed > 0 {
                engine_debug!(
                    "Pruned {} stale catalog entr{}, {} left",
                    removed,
                    if removed == 1 { "y" } else { "ies" },
                    state.items().len()
                );
                render_if_visible(&state)
            } else {
                Vec::new()
            }
        }
        Msg::CatalogToggled { show } => {
            let show = show.unwrap_or(!state.is_visible());
            if state.set_visible(show) && show {
                vec![Effect::RenderCatalog]
            } else {
                Vec::new()
            }
        }
        Msg::PromptActivated { turn_index, scan } => {
            let known = state.items().iter().any(|item| item.turn_index == turn_index);
            let mut effects = if known && state.select(turn_index) {
                render_if_visible(&state)
            } else {
                Vec::new()
            };
            match resolve_navigation(state.items(), turn_index, &scan) {
                Ok(target) => {
                    engine_debug!(
                        "Navigating to turn {} via {:?} ({:?})",
                        turn_index,
                        target.tier,
                        target.locator
                    );
                    effects.push(Effect::FocusTurn {
                        locator: target.locator,
                    });
                }
                Err(miss) => {
                    engine_warn!("Navigation to turn {} skipped: {}", turn_index, miss);
                }
            }
            effects
        }
        Msg::ExportRequested => match state.snapshot() {
            Some(snapshot) => vec![Effect::ExportSnapshot { snapshot }],
            None => vec![Effect::ExportUnavailable],
        },
    };

    (state, effects)
}

fn apply_decoded(
    state: &mut CatalogState,
    decoded: DecodedPayload,
    scan: &DocumentScan,
) -> Vec<Effect> {
    let mut changed = false;

    if let Some(turns) = decoded.turns {
        changed = true;
        match state.replace_turns(turns, scan) {
            Ok(count) => engine_info!("Catalog rebuilt with {} user prompt(s)", count),
            Err(err) => engine_warn!("Catalog extraction failed, showing empty catalog: {}", err),
        }
    }
    if let Some(title) = decoded.title {
        changed |= state.replace_title(title);
    }

    if changed {
        render_if_visible(state)
    } else {
        Vec::new()
    }
}

fn render_if_visible(state: &CatalogState) -> Vec<Effect> {
    if state.is_visible() {
        vec![Effect::RenderCatalog]
    } else {
        Vec::new()
    }
}
