use catalog_core::{ConversationSnapshot, Role};

/// Markdown rendition of a snapshot: the title as a heading, user prompts as
/// second-level headings and model answers followed by a rule.
pub fn build_markdown(snapshot: &ConversationSnapshot) -> String {
    let mut markdown = format!("# {}\n\n", snapshot.title);
    for (_, turn) in snapshot.valid_turns() {
        match turn.role {
            Role::User => {
                if let Some(text) = turn.text_content.as_text() {
                    markdown.push_str(&format!("## {text}\n\n"));
                }
            }
            Role::Model => {
                if let Some(text) = turn.display_text() {
                    markdown.push_str(&format!("{text}\n\n---\n\n"));
                }
            }
            Role::Unknown => {}
        }
    }
    markdown.trim().to_string()
}
