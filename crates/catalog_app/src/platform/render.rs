use catalog_core::{CatalogRowView, CatalogViewModel, ContentType};

pub const EMPTY_STATE_TEXT: &str = "No prompts found";

/// Render the catalog panel as plain text, one row per prompt.
pub fn render(view: &CatalogViewModel) -> String {
    let mut out = format!("== {} ==\n", view.title);
    if view.empty {
        out.push_str(EMPTY_STATE_TEXT);
        out.push('\n');
        return out;
    }
    for row in &view.rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

fn render_row(row: &CatalogRowView) -> String {
    let marker = if row.selected { '>' } else { ' ' };
    let kind = match row.content_type {
        ContentType::Text => "",
        ContentType::Image => " (image)",
        ContentType::File => " (file)",
    };
    let unbound = if row.bound { "" } else { " [unbound]" };
    format!(
        "{marker} {:>3}. {}{kind}{unbound}",
        row.turn_index, row.label
    )
}
