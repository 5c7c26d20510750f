use std::collections::HashSet;

use kd_core::Article;

/// Drop articles whose title prefix was already seen. First occurrence wins.
pub fn dedup_by_title(articles: Vec<Article>, prefix_chars: usize) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| seen.insert(title_key(&a.title, prefix_chars)))
        .collect()
}

fn title_key(title: &str, prefix_chars: usize) -> String {
    title.chars().take(prefix_chars).collect::<String>().to_lowercase()
}
