use crate::fonts::FontSet;
use crate::style::TextStyle;

/// Greedy word wrap. Words wider than the column are broken by character.
pub fn wrap(text: &str, style: &TextStyle, max_width: f32, fonts: &FontSet) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if fonts.width(&candidate, style) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if fonts.width(word, style) <= max_width {
            current = word.to_string();
        } else {
            let mut pieces = break_word(word, style, max_width, fonts);
            current = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Split a word into the longest pieces that fit, at least one char each.
fn break_word(word: &str, style: &TextStyle, max_width: f32, fonts: &FontSet) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if fonts.width(&current, style) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::replace(&mut current, ch.to_string()));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
