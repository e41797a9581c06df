use std::sync::Once;

use catalog_core::{
    update, CatalogState, ContentType, DocumentScan, Effect, Msg, TurnElement, TurnLocator,
    DEFAULT_TITLE,
};
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn user(text: &str) -> Value {
    json!([text, null, null, 0, 0, 0, 0, 0, "user"])
}

fn model(text: &str) -> Value {
    json!([text, null, null, 0, 0, 0, 0, 0, "model"])
}

/// Payload in the direct shape used by `CreatePrompt` / `UpdatePrompt`.
fn direct_payload(title: Option<&str>, turns: Vec<Value>) -> Value {
    let mut payload = vec![Value::Null; 14];
    if let Some(title) = title {
        payload[4] = json!([title]);
    }
    payload[13] = json!([turns]);
    Value::Array(payload)
}

fn three_prompt_scan() -> DocumentScan {
    DocumentScan::new(vec![
        TurnElement::user("turn-a"),
        TurnElement::model("turn-a-reply"),
        TurnElement::user("turn-b"),
        TurnElement::model("turn-b-reply"),
        TurnElement::user("turn-c"),
    ])
}

fn receive(state: CatalogState, payload: Value, scan: DocumentScan) -> (CatalogState, Vec<Effect>) {
    update(
        state,
        Msg::PayloadReceived {
            payload,
            api_keyword: "UpdatePrompt".to_string(),
            scan,
        },
    )
}

fn three_prompt_state() -> CatalogState {
    let payload = direct_payload(
        Some("Trip planning"),
        vec![
            user("one"),
            model("r1"),
            user("two"),
            model("r2"),
            user("three"),
        ],
    );
    let (state, _) = receive(CatalogState::new(), payload, three_prompt_scan());
    state
}

fn show(state: CatalogState) -> CatalogState {
    let (state, _) = update(state, Msg::CatalogToggled { show: Some(true) });
    state
}

#[test]
fn snapshot_builds_bound_catalog() {
    init_logging();
    let mut state = three_prompt_state();

    assert_eq!(state.title(), "Trip planning");
    let ids: Vec<_> = state
        .items()
        .iter()
        .map(|item| item.element_id.clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            Some("turn-a".to_string()),
            Some("turn-b".to_string()),
            Some("turn-c".to_string())
        ]
    );
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn hidden_catalog_is_not_rendered() {
    init_logging();
    let payload = direct_payload(None, vec![user("Hello")]);

    let (state, effects) = receive(CatalogState::new(), payload, DocumentScan::default());

    assert!(effects.is_empty());
    assert_eq!(state.items().len(), 1);
    assert_eq!(state.title(), DEFAULT_TITLE);
}

#[test]
fn newer_snapshot_replaces_catalog_wholesale() {
    init_logging();
    let state = show(three_prompt_state());

    let payload = direct_payload(None, vec![model("greeting"), user("fresh")]);
    let (state, effects) = receive(
        state,
        payload,
        DocumentScan::new(vec![TurnElement::model("x"), TurnElement::user("y")]),
    );

    assert_eq!(effects, vec![Effect::RenderCatalog]);
    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].turn_index, 1);
    assert_eq!(state.items()[0].element_id.as_deref(), Some("y"));
    // Title was not part of this payload.
    assert_eq!(state.title(), "Trip planning");
}

#[test]
fn undecodable_payload_leaves_state_untouched() {
    init_logging();
    let state = show(three_prompt_state());
    let before = state.clone();

    let (state, effects) = update(
        state,
        Msg::PayloadReceived {
            payload: json!({"unexpected": true}),
            api_keyword: "UpdatePrompt".to_string(),
            scan: DocumentScan::default(),
        },
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::PayloadReceived {
            payload: direct_payload(Some("Other"), vec![user("x")]),
            api_keyword: "ListPrompts".to_string(),
            scan: DocumentScan::default(),
        },
    );
    assert_eq!(state, before);
    assert!(effects.is_empty());
}

#[test]
fn extraction_failure_clears_catalog_and_renders_empty_state() {
    init_logging();
    let state = show(three_prompt_state());
    let payload = direct_payload(
        None,
        vec![user("ok"), json!([12, null, null, 0, 0, 0, 0, 0, "user"])],
    );

    let (state, effects) = receive(state, payload, three_prompt_scan());

    assert_eq!(effects, vec![Effect::RenderCatalog]);
    assert!(state.items().is_empty());
    let view = state.view();
    assert!(view.visible);
    assert!(view.empty);
    // Export still sees the decoded turns.
    assert!(state.snapshot().is_some());
}

#[test]
fn removed_element_is_pruned_and_rerendered() {
    init_logging();
    let state = show(three_prompt_state());

    let (state, effects) = update(state, Msg::DocumentMutated { removed_turns: 1 });
    assert_eq!(effects, vec![Effect::ScheduleValidation]);

    let scan = DocumentScan::new(vec![
        TurnElement::user("turn-a"),
        TurnElement::model("turn-a-reply"),
        TurnElement::model("turn-b-reply"),
        TurnElement::user("turn-c"),
    ]);
    let (state, effects) = update(state, Msg::ValidationDue { scan });

    assert_eq!(effects, vec![Effect::RenderCatalog]);
    let texts: Vec<_> = state.items().iter().map(|item| item.text.as_str()).collect();
    assert_eq!(texts, vec!["one", "three"]);
}

#[test]
fn pruning_while_hidden_does_not_render() {
    init_logging();
    let state = three_prompt_state();
    let (state, _) = update(state, Msg::DocumentMutated { removed_turns: 1 });

    let (state, effects) = update(
        state,
        Msg::ValidationDue {
            scan: DocumentScan::default(),
        },
    );

    assert!(effects.is_empty());
    assert!(state.items().is_empty());
}

#[test]
fn validation_is_idempotent() {
    init_logging();
    let state = show(three_prompt_state());
    let scan = DocumentScan::new(vec![TurnElement::user("turn-b")]);

    let (state, _) = update(state, Msg::ValidationDue { scan: scan.clone() });
    let once = state.items().to_vec();
    let (state, effects) = update(state, Msg::ValidationDue { scan });

    assert_eq!(state.items(), once.as_slice());
    assert!(effects.is_empty());
}

#[test]
fn unbound_entries_survive_validation() {
    init_logging();
    let payload = direct_payload(None, vec![user("a"), user("b")]);
    let (state, _) = receive(
        CatalogState::new(),
        payload,
        DocumentScan::new(vec![TurnElement::user("only")]),
    );
    assert_eq!(state.items()[1].element_id, None);

    let (state, _) = update(
        state,
        Msg::ValidationDue {
            scan: DocumentScan::default(),
        },
    );

    assert_eq!(state.items().len(), 1);
    assert_eq!(state.items()[0].text, "b");
}

#[test]
fn mutation_bursts_share_one_pending_validation() {
    init_logging();
    let state = three_prompt_state();

    let (state, first) = update(state, Msg::DocumentMutated { removed_turns: 2 });
    let (state, second) = update(state, Msg::DocumentMutated { removed_turns: 1 });
    let (state, unrelated) = update(state, Msg::DocumentMutated { removed_turns: 0 });

    assert_eq!(first, vec![Effect::ScheduleValidation]);
    assert!(second.is_empty());
    assert!(unrelated.is_empty());
    assert!(state.is_validation_pending());

    let (state, _) = update(
        state,
        Msg::ValidationDue {
            scan: three_prompt_scan(),
        },
    );
    assert!(!state.is_validation_pending());
    let (_, again) = update(state, Msg::DocumentMutated { removed_turns: 1 });
    assert_eq!(again, vec![Effect::ScheduleValidation]);
}

#[test]
fn toggle_flips_and_forced_state_is_noop_when_matching() {
    init_logging();
    let state = three_prompt_state();

    let (state, effects) = update(state, Msg::CatalogToggled { show: None });
    assert!(state.is_visible());
    assert_eq!(effects, vec![Effect::RenderCatalog]);

    let (mut state, effects) = update(state, Msg::CatalogToggled { show: Some(true) });
    assert!(effects.is_empty());
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::CatalogToggled { show: None });
    assert!(!state.is_visible());
    assert!(effects.is_empty());
    assert!(state.consume_dirty());
}

#[test]
fn navigation_uses_bound_element_first() {
    init_logging();
    let state = three_prompt_state();

    let (state, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 2,
            scan: three_prompt_scan(),
        },
    );

    assert_eq!(
        effects,
        vec![Effect::FocusTurn {
            locator: TurnLocator::Id("turn-b".into())
        }]
    );
    let view = state.view();
    assert!(view.rows.iter().any(|row| row.turn_index == 2 && row.selected));
}

#[test]
fn navigation_falls_back_to_ordinal_for_unbound_entry() {
    init_logging();
    // Document was not rendered yet when the snapshot arrived.
    let payload = direct_payload(None, vec![user("first"), model("r"), user("second")]);
    let (state, _) = receive(CatalogState::new(), payload, DocumentScan::default());
    assert!(state.items().iter().all(|item| item.element_id.is_none()));

    let scan = DocumentScan::new(vec![
        TurnElement::user("later-1"),
        TurnElement::model("later-2"),
        TurnElement::user("later-3"),
    ]);
    let (_, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 2,
            scan,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::FocusTurn {
            locator: TurnLocator::Position(2)
        }]
    );
}

#[test]
fn navigation_falls_back_when_bound_element_vanished() {
    init_logging();
    let state = three_prompt_state();
    let scan = DocumentScan::new(vec![
        TurnElement::user("rerendered-a"),
        TurnElement::user("rerendered-b"),
    ]);

    let (_, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 2,
            scan,
        },
    );

    assert_eq!(
        effects,
        vec![Effect::FocusTurn {
            locator: TurnLocator::Position(1)
        }]
    );
}

#[test]
fn navigation_miss_is_a_quiet_noop() {
    init_logging();
    let state = three_prompt_state();

    let (state, unknown) = update(
        state,
        Msg::PromptActivated {
            turn_index: 99,
            scan: three_prompt_scan(),
        },
    );
    assert!(unknown.is_empty());

    let (state, empty_doc) = update(
        state,
        Msg::PromptActivated {
            turn_index: 4,
            scan: DocumentScan::default(),
        },
    );
    assert!(empty_doc.is_empty());

    let (_, out_of_range) = update(
        state,
        Msg::PromptActivated {
            turn_index: 4,
            scan: DocumentScan::new(vec![TurnElement::user("lonely")]),
        },
    );
    assert!(out_of_range.is_empty());
}

#[test]
fn activation_while_visible_rerenders_selection() {
    init_logging();
    let state = show(three_prompt_state());

    let (state, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 0,
            scan: three_prompt_scan(),
        },
    );
    assert_eq!(
        effects,
        vec![
            Effect::RenderCatalog,
            Effect::FocusTurn {
                locator: TurnLocator::Id("turn-a".into())
            }
        ]
    );

    // Same entry again: selection unchanged, only focus.
    let (_, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 0,
            scan: three_prompt_scan(),
        },
    );
    assert_eq!(effects.len(), 1);
}

#[test]
fn activating_a_turn_without_entry_keeps_selection() {
    init_logging();
    let state = show(three_prompt_state());
    let (mut state, _) = update(
        state,
        Msg::PromptActivated {
            turn_index: 2,
            scan: three_prompt_scan(),
        },
    );
    state.consume_dirty();

    // Turn 1 is a model answer and has no catalog entry.
    let (mut state, effects) = update(
        state,
        Msg::PromptActivated {
            turn_index: 1,
            scan: three_prompt_scan(),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    let selected: Vec<_> = state
        .view()
        .rows
        .iter()
        .filter(|row| row.selected)
        .map(|row| row.turn_index)
        .collect();
    assert_eq!(selected, vec![2]);
}

#[test]
fn view_labels_follow_content_type() {
    init_logging();
    let long = "y".repeat(60);
    let payload = direct_payload(
        None,
        vec![
            user(&long),
            json!(["", [{"mime": "image/png"}], null, 0, 0, 0, 0, 0, "user"]),
        ],
    );
    let (state, _) = receive(CatalogState::new(), payload, DocumentScan::default());

    let view = state.view();
    assert!(!view.empty);
    assert_eq!(view.rows[0].label, format!("{}...", "y".repeat(50)));
    assert_eq!(view.rows[1].label, "[Image]");
    assert_eq!(view.rows[1].content_type, ContentType::Image);
    assert!(!view.rows[1].bound);
}

#[test]
fn export_requires_a_snapshot() {
    init_logging();
    let (_, effects) = update(CatalogState::new(), Msg::ExportRequested);
    assert_eq!(effects, vec![Effect::ExportUnavailable]);

    let (_, effects) = update(three_prompt_state(), Msg::ExportRequested);
    match effects.as_slice() {
        [Effect::ExportSnapshot { snapshot }] => {
            assert_eq!(snapshot.title, "Trip planning");
            assert_eq!(snapshot.turns.len(), 5);
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}
