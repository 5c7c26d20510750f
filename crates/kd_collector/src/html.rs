use scraper::{ElementRef, Html};

/// Text content of an HTML fragment, one space between text nodes.
pub fn strip_html(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    element_text(&document.root_element())
}

/// Trimmed text nodes of an element joined with single spaces.
pub fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
