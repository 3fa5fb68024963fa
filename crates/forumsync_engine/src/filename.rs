use chrono::NaiveDate;

/// Deterministic document filename: `{YYYY-MM-DD}-{slug}.md`.
///
/// Two threads created on the same day with the same slug map to the same file.
pub fn document_filename(created: NaiveDate, slug: &str) -> String {
    format!("{}-{}.md", created.format("%Y-%m-%d"), sanitize_slug(slug))
}

fn sanitize_slug(slug: &str) -> String {
    let cleaned: String = slug
        .chars()
        .map(|c| if is_forbidden(c) { '-' } else { c })
        .collect();
    let trimmed = cleaned.trim_matches(&['-', '.', ' '][..]);
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_forbidden(c: char) -> bool {
    c.is_whitespace()
        || matches!(c,
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
        )
}
