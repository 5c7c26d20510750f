use std::fmt;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Duration, Local};
use kd_core::{ActionItem, DigestDocument, Item, Result, Section};

use super::DigestModel;

/// Offline stand-in for the language model.
///
/// Without a fixed response it turns every listed article into one item of a
/// single section, which is enough to exercise rendering and mailing.
pub struct DummyModel {
    response: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel")
            .field("response", &self.response.as_ref().map(|_| "<fixed>"))
            .finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self {
            response: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response`.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn echo_digest(prompt: &str) -> DigestDocument {
        let today = Local::now().date_naive();
        let period = format!(
            "{} — {}",
            (today - Duration::days(7)).format(kd_core::DATE_FORMAT),
            today.format(kd_core::DATE_FORMAT)
        );

        let items: Vec<Item> = prompt.lines().filter_map(parse_listing_line).collect();

        DigestDocument {
            period: Some(period),
            sections: Some(vec![Section {
                id: Some("digest".to_string()),
                title: Some("Новости недели (тестовый режим)".to_string()),
                icon: Some("⚡".to_string()),
                items: Some(items),
            }]),
            actions: Some(vec![ActionItem {
                title: Some("Проверить дайджест вручную".to_string()),
                text: Some("Документ сформирован без обращения к языковой модели.".to_string()),
            }]),
        }
    }
}

impl Default for DummyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// `N. [source | date] title` into an item.
fn parse_listing_line(line: &str) -> Option<Item> {
    let (number, rest) = line.split_once(". [")?;
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (meta, title) = rest.split_once("] ")?;
    let (source, date) = meta.split_once(" | ")?;
    Some(Item {
        label: Some(title.split_whitespace().take(7).collect::<Vec<_>>().join(" ")),
        source: Some(format!("{}, {}", source, date)),
        text: Some(title.to_string()),
    })
}

#[async_trait]
impl DigestModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        match &self.response {
            Some(response) => Ok(response.clone()),
            None => {
                let json = serde_json::to_string_pretty(&Self::echo_digest(prompt))?;
                Ok(format!("```json\n{}\n```", json))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing_line() {
        let item = parse_listing_line(
            "2. [QazaqGreen | 14.10.2026] Ветровая электростанция мощностью 50 МВт введена в строй в Жанатасе",
        )
        .unwrap();
        assert_eq!(item.label(), "Ветровая электростанция мощностью 50 МВт введена в");
        assert_eq!(item.source(), "QazaqGreen, 14.10.2026");

        assert!(parse_listing_line("   Ссылка: https://kapital.kz").is_none());
        assert!(parse_listing_line("5. [Правила] без разделителя").is_none());
    }

    #[tokio::test]
    async fn test_echo_records_prompt() {
        let model = DummyModel::new();
        let reply = model
            .generate("1. [Kapital.kz | 12.10.2026] Тарифы растут\n   \n   Ссылка: ")
            .await
            .unwrap();
        assert!(reply.starts_with("```json"));
        assert!(reply.contains("Тарифы растут"));
        assert_eq!(model.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let model = DummyModel::with_response("{}");
        assert_eq!(model.generate("anything").await.unwrap(), "{}");
    }
}
