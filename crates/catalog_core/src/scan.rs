/// One turn element as observed in the live document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnElement {
    /// Element identifier; empty identifiers are stored as `None`.
    pub id: Option<String>,
    /// Whether the element carries the user-turn marker.
    pub is_user: bool,
}

impl TurnElement {
    pub fn new(id: Option<String>, is_user: bool) -> Self {
        Self {
            id: id.filter(|id| !id.is_empty()),
            is_user,
        }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), true)
    }

    pub fn model(id: impl Into<String>) -> Self {
        Self::new(Some(id.into()), false)
    }
}

/// Ordered view of the document's turn elements at one moment.
///
/// The document is mutated by the host page at will, so a scan is taken
/// fresh for every message that needs one and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentScan {
    turns: Vec<TurnElement>,
}

impl DocumentScan {
    pub fn new(turns: Vec<TurnElement>) -> Self {
        Self { turns }
    }

    pub fn turns(&self) -> &[TurnElement] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// User-marked elements with their position among all turn elements.
    pub fn user_turns(&self) -> impl Iterator<Item = (usize, &TurnElement)> + '_ {
        self.turns
            .iter()
            .enumerate()
            .filter(|(_, element)| element.is_user)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.turns
            .iter()
            .any(|element| element.id.as_deref() == Some(id))
    }
}

impl FromIterator<TurnElement> for DocumentScan {
    fn from_iter<I: IntoIterator<Item = TurnElement>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
