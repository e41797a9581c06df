use sha2::{Digest, Sha256};

const MAX_STEM_CHARS: usize = 80;

/// Windows-safe, deterministic filename: `{sanitized_title}--{short_hash(markdown)}.md`.
/// The same export always lands in the same file; an edited one does not.
pub fn export_filename(title: &str, markdown: &str) -> String {
    let sanitized = sanitize_title(title);
    let hash = short_hash(markdown);
    format!("{sanitized}--{hash}.md")
}

fn sanitize_title(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();

    // Collapse runs of underscores
    let mut compacted = String::with_capacity(replaced.len());
    for c in replaced.trim_matches(&['_', ' ', '.'][..]).chars() {
        if c == '_' && compacted.ends_with('_') {
            continue;
        }
        compacted.push(c);
    }

    let mut stem: String = compacted.chars().take(MAX_STEM_CHARS).collect();
    if stem.is_empty() {
        stem = "untitled".to_string();
    }
    if is_reserved_windows_name(&stem) {
        stem.push('_');
    }
    stem
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

fn short_hash(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect()
}
