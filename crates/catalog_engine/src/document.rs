use catalog_core::{DocumentScan, TurnElement, TurnLocator};
use scraper::{ElementRef, Html, Selector};

use crate::config::TurnSelectors;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("no turn element for {0:?}")]
    ElementNotFound(TurnLocator),
    #[error("turn element {0:?} is no longer in the document")]
    Detached(NodeHandle),
    #[error("invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// Identity of one turn element. Unlike a [`TurnLocator`], a handle keeps
/// naming the same element while other turns come and go, and is never
/// reused once its element is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle(u64);

/// The live, externally mutated document as the engine sees it.
pub trait HostDocument {
    /// Turn elements in document order.
    fn scan(&self) -> DocumentScan;
    /// The element `locator` points at right now.
    fn resolve(&self, locator: &TurnLocator) -> Result<NodeHandle, DocumentError>;
    fn scroll_into_view(&mut self, node: NodeHandle) -> Result<(), DocumentError>;
    /// Inline style value of `property`, `None` when unset.
    fn inline_style(&self, node: NodeHandle, property: &str)
        -> Result<Option<String>, DocumentError>;
    /// Set or, with `None`, remove an inline style declaration.
    fn set_inline_style(
        &mut self,
        node: NodeHandle,
        property: &str,
        value: Option<&str>,
    ) -> Result<(), DocumentError>;
}

/// What a document mutation did to turn-bearing elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MutationRecord {
    pub removed_turns: usize,
    pub added_turns: usize,
}

/// Ordered inline style declarations of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    pub fn parse(attr: &str) -> Self {
        let declarations = attr
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(property, value)| (property.trim().to_ascii_lowercase(), value.trim().to_string()))
            .filter(|(property, value)| !property.is_empty() && !value.is_empty())
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(property))
            .map(|(_, value)| value.as_str())
    }

    /// An empty value removes the declaration, like assigning `""` in the host.
    pub fn set(&mut self, property: &str, value: Option<&str>) {
        let value = value.map(str::trim).filter(|value| !value.is_empty());
        let existing = self
            .declarations
            .iter()
            .position(|(name, _)| name.eq_ignore_ascii_case(property));
        match (existing, value) {
            (Some(index), Some(value)) => self.declarations[index].1 = value.to_string(),
            (Some(index), None) => {
                self.declarations.remove(index);
            }
            (None, Some(value)) => self
                .declarations
                .push((property.to_ascii_lowercase(), value.to_string())),
            (None, None) => {}
        }
    }

    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TurnNode {
    handle: NodeHandle,
    id: Option<String>,
    is_user: bool,
    text: String,
    style: InlineStyle,
}

/// A scroll performed by the navigator, as recorded by [`HtmlDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrolledTurn {
    pub position: usize,
    pub id: Option<String>,
}

/// Host document built from a captured page. Only turn elements are kept;
/// mutations mimic what the host does when turns are deleted or added.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HtmlDocument {
    turns: Vec<TurnNode>,
    scrolled: Vec<ScrolledTurn>,
    next_handle: u64,
}

impl HtmlDocument {
    pub fn parse(html: &str, selectors: &TurnSelectors) -> Result<Self, DocumentError> {
        let document = Html::parse_document(html);
        let turn_selector = parse_selector(&selectors.turn_tag)?;
        let container_selector = parse_selector(&format!(".{}", selectors.container_class))?;

        let turns: Vec<TurnNode> = document
            .select(&turn_selector)
            .enumerate()
            .map(|(index, element)| TurnNode {
                handle: NodeHandle(index as u64),
                id: element
                    .value()
                    .attr("id")
                    .filter(|id| !id.is_empty())
                    .map(str::to_owned),
                is_user: is_user_turn(element, &container_selector, &selectors.user_class),
                text: collapse_whitespace(element.text()),
                style: InlineStyle::parse(element.value().attr("style").unwrap_or_default()),
            })
            .collect();

        Ok(Self {
            next_handle: turns.len() as u64,
            turns,
            scrolled: Vec::new(),
        })
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Visible text of the turn element `locator` points at.
    pub fn turn_text(&self, locator: &TurnLocator) -> Option<&str> {
        self.position(locator)
            .map(|position| self.turns[position].text.as_str())
    }

    pub fn style_attribute(&self, locator: &TurnLocator) -> Option<String> {
        self.position(locator)
            .map(|position| self.turns[position].style.to_css())
    }

    pub fn scrolled(&self) -> &[ScrolledTurn] {
        &self.scrolled
    }

    pub fn remove_turn(&mut self, id: &str) -> MutationRecord {
        match self.position(&TurnLocator::Id(id.to_string())) {
            Some(position) => self.remove_turn_at(position),
            None => MutationRecord::default(),
        }
    }

    pub fn remove_turn_at(&mut self, position: usize) -> MutationRecord {
        if position >= self.turns.len() {
            return MutationRecord::default();
        }
        self.turns.remove(position);
        MutationRecord {
            removed_turns: 1,
            added_turns: 0,
        }
    }

    pub fn append_turn(
        &mut self,
        id: Option<&str>,
        is_user: bool,
        text: impl Into<String>,
    ) -> MutationRecord {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        self.turns.push(TurnNode {
            handle,
            id: id.filter(|id| !id.is_empty()).map(str::to_owned),
            is_user,
            text: text.into(),
            style: InlineStyle::default(),
        });
        MutationRecord {
            removed_turns: 0,
            added_turns: 1,
        }
    }

    fn position(&self, locator: &TurnLocator) -> Option<usize> {
        match locator {
            TurnLocator::Id(id) => self
                .turns
                .iter()
                .position(|turn| turn.id.as_deref() == Some(id.as_str())),
            TurnLocator::Position(position) => {
                (*position < self.turns.len()).then_some(*position)
            }
        }
    }

    fn position_of(&self, node: NodeHandle) -> Result<usize, DocumentError> {
        self.turns
            .iter()
            .position(|turn| turn.handle == node)
            .ok_or(DocumentError::Detached(node))
    }
}

impl HostDocument for HtmlDocument {
    fn scan(&self) -> DocumentScan {
        self.turns
            .iter()
            .map(|turn| TurnElement::new(turn.id.clone(), turn.is_user))
            .collect()
    }

    fn resolve(&self, locator: &TurnLocator) -> Result<NodeHandle, DocumentError> {
        self.position(locator)
            .map(|position| self.turns[position].handle)
            .ok_or_else(|| DocumentError::ElementNotFound(locator.clone()))
    }

    fn scroll_into_view(&mut self, node: NodeHandle) -> Result<(), DocumentError> {
        let position = self.position_of(node)?;
        let id = self.turns[position].id.clone();
        self.scrolled.push(ScrolledTurn { position, id });
        Ok(())
    }

    fn inline_style(
        &self,
        node: NodeHandle,
        property: &str,
    ) -> Result<Option<String>, DocumentError> {
        let position = self.position_of(node)?;
        Ok(self.turns[position].style.get(property).map(str::to_owned))
    }

    fn set_inline_style(
        &mut self,
        node: NodeHandle,
        property: &str,
        value: Option<&str>,
    ) -> Result<(), DocumentError> {
        let position = self.position_of(node)?;
        self.turns[position].style.set(property, value);
        Ok(())
    }
}

fn parse_selector(selector: &str) -> Result<Selector, DocumentError> {
    Selector::parse(selector).map_err(|err| DocumentError::InvalidSelector {
        selector: selector.to_string(),
        message: format!("{err:?}"),
    })
}

/// The role marker sits on the first container inside the turn element.
fn is_user_turn(element: ElementRef<'_>, container: &Selector, user_class: &str) -> bool {
    element
        .select(container)
        .next()
        .is_some_and(|container| container.value().classes().any(|class| class == user_class))
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::InlineStyle;

    #[test]
    fn style_round_trips_declarations_in_order() {
        let mut style = InlineStyle::parse("color: red; Background-Color : blue;;bad");
        assert_eq!(style.get("background-color"), Some("blue"));

        style.set("transition", Some("all 1s"));
        style.set("color", None);
        assert_eq!(style.to_css(), "background-color: blue; transition: all 1s");
    }

    #[test]
    fn empty_value_removes_declaration() {
        let mut style = InlineStyle::parse("transition: none");
        style.set("transition", Some("  "));
        assert_eq!(style.get("transition"), None);
        assert_eq!(style.to_css(), "");
    }
}
