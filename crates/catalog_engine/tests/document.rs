use catalog_core::{TurnElement, TurnLocator};
use catalog_engine::{DocumentError, HostDocument, HtmlDocument, MutationRecord, TurnSelectors};
use pretty_assertions::assert_eq;

const PAGE: &str = r#"
<html><body>
  <ms-chat-turn id="turn-1" style="padding: 4px">
    <div class="chat-turn-container user render">How do  I boil an egg?</div>
  </ms-chat-turn>
  <ms-chat-turn id="turn-2">
    <div class="chat-turn-container model render">Put it in water.</div>
  </ms-chat-turn>
  <ms-chat-turn id="">
    <div class="chat-turn-container user"><img src="egg.png"></div>
  </ms-chat-turn>
  <ms-chat-turn id="turn-4">
    <div class="wrapper"><div class="chat-turn-container user">Thanks</div></div>
  </ms-chat-turn>
</body></html>
"#;

fn page() -> HtmlDocument {
    HtmlDocument::parse(PAGE, &TurnSelectors::default()).unwrap()
}

#[test]
fn scan_reports_turns_in_document_order() {
    let doc = page();

    assert_eq!(
        doc.scan().turns(),
        &[
            TurnElement::user("turn-1"),
            TurnElement::model("turn-2"),
            TurnElement::new(None, true),
            TurnElement::user("turn-4"),
        ]
    );
    assert_eq!(
        doc.turn_text(&TurnLocator::Id("turn-1".into())),
        Some("How do I boil an egg?")
    );
}

#[test]
fn custom_selectors_are_honoured() {
    let html = r#"<chat-row id="a"><p class="bubble mine">hi</p></chat-row>
                  <chat-row id="b"><p class="bubble">yo</p></chat-row>"#;
    let selectors = TurnSelectors {
        turn_tag: "chat-row".into(),
        container_class: "bubble".into(),
        user_class: "mine".into(),
    };

    let doc = HtmlDocument::parse(html, &selectors).unwrap();

    assert_eq!(
        doc.scan().turns(),
        &[TurnElement::user("a"), TurnElement::model("b")]
    );
}

#[test]
fn invalid_selector_is_reported() {
    let selectors = TurnSelectors {
        turn_tag: "ms-chat-turn[".into(),
        ..TurnSelectors::default()
    };

    let err = HtmlDocument::parse(PAGE, &selectors).unwrap_err();
    assert!(matches!(err, DocumentError::InvalidSelector { .. }));
}

#[test]
fn removing_turns_reports_mutations() {
    let mut doc = page();

    assert_eq!(
        doc.remove_turn("turn-2"),
        MutationRecord {
            removed_turns: 1,
            added_turns: 0
        }
    );
    assert_eq!(doc.remove_turn("turn-2"), MutationRecord::default());
    assert_eq!(doc.remove_turn_at(10), MutationRecord::default());
    assert!(!doc.scan().contains("turn-2"));
    assert_eq!(doc.len(), 3);

    let record = doc.append_turn(Some("turn-9"), false, "Anytime.");
    assert_eq!(record.added_turns, 1);
    assert!(doc.scan().contains("turn-9"));
}

#[test]
fn styles_are_read_and_written_per_element() {
    let mut doc = page();
    let first = TurnLocator::Id("turn-1".into());
    let node = doc.resolve(&first).unwrap();

    assert_eq!(doc.inline_style(node, "padding").unwrap().as_deref(), Some("4px"));
    assert_eq!(doc.inline_style(node, "background-color").unwrap(), None);

    doc.set_inline_style(node, "background-color", Some("yellow"))
        .unwrap();
    assert_eq!(
        doc.style_attribute(&first).as_deref(),
        Some("padding: 4px; background-color: yellow")
    );

    let missing = TurnLocator::Id("nope".into());
    assert_eq!(
        doc.resolve(&missing),
        Err(DocumentError::ElementNotFound(missing.clone()))
    );
}

#[test]
fn handles_outlive_neighbouring_removals() {
    let mut doc = page();
    let thanks = doc.resolve(&TurnLocator::Position(3)).unwrap();
    let egg = doc.resolve(&TurnLocator::Position(2)).unwrap();

    doc.remove_turn_at(0);
    assert_eq!(doc.resolve(&TurnLocator::Id("turn-4".into())), Ok(thanks));
    assert_eq!(doc.resolve(&TurnLocator::Position(1)), Ok(egg));

    doc.remove_turn_at(1);
    assert_eq!(
        doc.set_inline_style(egg, "color", Some("red")),
        Err(DocumentError::Detached(egg))
    );

    doc.append_turn(None, true, "Again");
    let appended = doc.resolve(&TurnLocator::Position(2)).unwrap();
    assert_ne!(appended, egg);
    assert_ne!(appended, thanks);
}

#[test]
fn scrolling_is_recorded_by_position_and_id() {
    let mut doc = page();

    let third = doc.resolve(&TurnLocator::Position(2)).unwrap();
    let fourth = doc.resolve(&TurnLocator::Id("turn-4".into())).unwrap();
    doc.scroll_into_view(third).unwrap();
    doc.scroll_into_view(fourth).unwrap();

    let scrolled: Vec<_> = doc
        .scrolled()
        .iter()
        .map(|turn| (turn.position, turn.id.clone()))
        .collect();
    assert_eq!(scrolled, vec![(2, None), (3, Some("turn-4".to_string()))]);
    assert!(doc.resolve(&TurnLocator::Position(4)).is_err());
}
