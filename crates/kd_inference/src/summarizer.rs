use std::sync::Arc;

use chrono::Local;
use kd_core::{Article, DigestDocument, Error, Result};
use tracing::{info, warn};

use crate::models::DigestModel;
use crate::prompt::{build_prompt, placeholder_article};

/// Turns the collected articles into a `DigestDocument` with one model call.
#[derive(Debug, Clone)]
pub struct Summarizer {
    model: Arc<dyn DigestModel>,
}

impl Summarizer {
    pub fn new(model: Arc<dyn DigestModel>) -> Self {
        Self { model }
    }

    pub async fn summarize(&self, articles: &[Article]) -> Result<DigestDocument> {
        let placeholder;
        let articles = if articles.is_empty() {
            warn!("⚠️ No articles — generating placeholder digest");
            let today = Local::now().format(kd_core::DATE_FORMAT).to_string();
            placeholder = [placeholder_article(&today)];
            &placeholder[..]
        } else {
            articles
        };

        let prompt = build_prompt(articles);
        info!("🤖 Sending {} articles to {}...", articles.len(), self.model.name());
        let raw = self.model.generate(&prompt).await?;

        let digest = parse_digest(&raw)?;
        info!("✨ Digest generated: {} sections", digest.sections().len());
        Ok(digest)
    }
}

/// Remove a surrounding ``` fence, if any: the first line and everything from
/// the last fence marker on.
pub fn strip_fences(raw: &str) -> &str {
    let text = raw.trim();
    if !text.starts_with("```") {
        return text;
    }
    let body = text.split_once('\n').map(|(_, rest)| rest).unwrap_or_default();
    let body = body.rfind("```").map(|end| &body[..end]).unwrap_or(body);
    body.trim()
}

pub fn parse_digest(raw: &str) -> Result<DigestDocument> {
    serde_json::from_str(strip_fences(raw))
        .map_err(|e| Error::Inference(format!("Model response is not valid digest JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DummyModel;

    const DIGEST: &str = r#"{
        "period": "05.10.2026 — 11.10.2026",
        "sections": [
            {"id": "tariffs", "title": "Тарифы и рынок", "icon": "₸",
             "items": [{"label": "Рост тарифов", "source": "Kapital.kz, 10.10.2026", "text": "Тарифы растут."}]}
        ],
        "requires_action": [{"title": "Подготовить позицию", "text": "Направить письмо в АРЕМ."}]
    }"#;

    #[test]
    fn test_fenced_response_parses_like_bare() {
        let fenced = format!("```json\n{}\n```", DIGEST);
        assert_eq!(parse_digest(&fenced).unwrap(), parse_digest(DIGEST).unwrap());

        let bare_fence = format!("  ```\n{}\n```\n", DIGEST);
        assert_eq!(parse_digest(&bare_fence).unwrap(), parse_digest(DIGEST).unwrap());
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences(" {} "), "{}");
        assert_eq!(strip_fences("```"), "");
    }

    #[test]
    fn test_malformed_json_is_error() {
        let err = parse_digest("Вот ваш дайджест: {").unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
    }

    #[tokio::test]
    async fn test_empty_articles_send_single_placeholder() {
        let model = Arc::new(DummyModel::with_response(DIGEST));
        let summarizer = Summarizer::new(model.clone());

        let digest = summarizer.summarize(&[]).await.unwrap();
        assert_eq!(digest.period(), Some("05.10.2026 — 11.10.2026"));

        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("1. [Система | "));
        assert!(prompts[0].contains("За текущую неделю существенных новостей не обнаружено"));
        assert!(!prompts[0].contains("2. ["));
    }

    #[tokio::test]
    async fn test_summarize_with_echo_model() {
        let articles = vec![Article {
            source: "QazaqGreen".to_string(),
            title: "СЭС на 100 МВт запущена".to_string(),
            summary: String::new(),
            link: "https://qazaqgreen.com/1".to_string(),
            date: "13.10.2026".to_string(),
        }];
        let digest = Summarizer::new(Arc::new(DummyModel::new()))
            .summarize(&articles)
            .await
            .unwrap();

        let section = digest.populated_sections().next().unwrap();
        assert_eq!(section.items()[0].source(), "QazaqGreen, 13.10.2026");
        assert_eq!(digest.actions().len(), 1);
    }
}
