use std::path::PathBuf;

use kd_collector::Collector;
use kd_core::prelude::*;
use kd_inference::Summarizer;
use kd_mail::{Dispatched, Dispatcher};
use kd_render::{RenderOutput, Renderer};
use tracing::info;

/// Outcome of one full run.
#[derive(Debug)]
pub struct RunReport {
    pub article_count: usize,
    pub digest: DigestDocument,
    pub output: RenderOutput,
    pub dispatched: Option<Dispatched>,
}

/// Collector, Summarizer, Renderer and Dispatcher chained in one pass.
pub struct Pipeline {
    collector: Collector,
    summarizer: Summarizer,
    renderer: Renderer,
    dispatcher: Option<Dispatcher>,
    save_digest: Option<PathBuf>,
}

impl Pipeline {
    pub fn new(collector: Collector, summarizer: Summarizer, renderer: Renderer) -> Self {
        Self {
            collector,
            summarizer,
            renderer,
            dispatcher: None,
            save_digest: None,
        }
    }

    /// Email the result. Without a dispatcher the run stops after rendering.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Also write the parsed digest as JSON, for re-rendering later.
    pub fn with_saved_digest(mut self, path: Option<PathBuf>) -> Self {
        self.save_digest = path;
        self
    }

    pub async fn run(&self) -> Result<RunReport> {
        info!("═══ KEA Energy Digest ═══");

        info!("📡 Step 1/4: collecting news");
        let articles = self.collector.collect().await;

        info!("🤖 Step 2/4: generating digest");
        let digest = self.summarizer.summarize(&articles).await?;
        if let Some(path) = &self.save_digest {
            std::fs::write(path, serde_json::to_string_pretty(&digest)?)?;
            info!("💾 Digest saved to {}", path.display());
        }

        info!("📄 Step 3/4: rendering PDF");
        let output = self.renderer.render(&digest)?;

        let dispatched = match &self.dispatcher {
            Some(dispatcher) => {
                info!("📧 Step 4/4: sending email");
                Some(dispatcher.dispatch(&output.path, digest.period()).await?)
            }
            None => {
                info!("⏭️ Step 4/4: sending skipped");
                None
            }
        };

        info!("✅ Done");
        Ok(RunReport {
            article_count: articles.len(),
            digest,
            output,
            dispatched,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Local, Utc};
    use kd_core::config::FeedSource;
    use kd_inference::models::DummyModel;
    use kd_mail::{Mailer, Message};
    use kd_render::blocks::BlockKind;
    use std::sync::{Arc, Mutex};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Message>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: Message) -> Result<()> {
            self.sent.lock().unwrap().push(message);
            Ok(())
        }
    }

    const DIGEST_JSON: &str = r#"```json
{
  "period": "05.10.2026 — 11.10.2026",
  "sections": [
    {"id": "regulation", "title": "Регуляторика", "icon": "§", "items": []},
    {"id": "tariffs", "title": "Тарифы и рынок", "icon": "₸", "items": [
      {"label": "Рост тарифов", "source": "Kapital.kz, 10.10.2026", "text": "Тарифы вырастут на 12%."},
      {"label": "Новая ТЭЦ", "source": "Kapital.kz, 09.10.2026", "text": "ТЭЦ запущена."},
      {"label": "ВИЭ аукцион", "source": "Kapital.kz, 08.10.2026", "text": "Аукцион на 300 МВт."}
    ]}
  ],
  "requires_action": [
    {"title": "Позиция по тарифам", "text": "Подготовить письмо в АРЕМ."},
    {"title": "Аукцион ВИЭ", "text": "Собрать предложения членов."}
  ]
}
```"#;

    fn rss(titles: &[&str]) -> String {
        let date = (Utc::now() - Duration::days(1)).to_rfc2822();
        let items: String = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                format!(
                    "<item><title>{}</title><link>https://kapital.kz/n/{}</link>\
                     <description>Подробности.</description><pubDate>{}</pubDate></item>",
                    title, i, date
                )
            })
            .collect();
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><rss version=\"2.0\"><channel>\
             <title>Kapital</title><link>https://kapital.kz</link><description>-</description>{}\
             </channel></rss>",
            items
        )
    }

    #[tokio::test]
    async fn test_end_to_end_run() {
        let server = MockServer::start().await;
        let feed = rss(&[
            "Тарифы на электроэнергию вырастут с января",
            "В Экибастузе запустили новую ТЭЦ",
            "Аукцион ВИЭ на 300 МВт состоится в ноябре",
            "Курс тенге на бирже",
        ]);
        Mock::given(method("GET"))
            .and(path("/kapital/rss"))
            .respond_with(ResponseTemplate::new(200).set_body_string(feed))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut config = DigestConfig::default();
        config.feeds = vec![FeedSource {
            name: "Kapital.kz".to_string(),
            url: format!("{}/kapital/rss", server.uri()),
        }];
        config.scrape_targets = vec![];
        config.output.pdf_path = dir.path().join("digest.pdf");
        config.output.logo_path = dir.path().join("logo.png");
        config.output.font_dir = dir.path().join("fonts");
        let saved = dir.path().join("digest.json");

        let model = Arc::new(DummyModel::with_response(DIGEST_JSON));
        let mailer = Arc::new(RecordingMailer::default());
        let recipients = vec!["members@kea.kz".to_string()];
        let pipeline = Pipeline::new(
            Collector::new(&config).unwrap(),
            Summarizer::new(model.clone()),
            Renderer::new(&config),
        )
        .with_dispatcher(Dispatcher::new(&config.branding, "bot@kea.kz", &recipients, mailer.clone()))
        .with_saved_digest(Some(saved.clone()));

        let report = pipeline.run().await.unwrap();

        assert_eq!(report.article_count, 3);
        let prompts = model.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Тарифы на электроэнергию вырастут с января"));
        assert!(!prompts[0].contains("Курс тенге"));

        let kinds: Vec<BlockKind> = report.output.placements.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Title,
                BlockKind::SectionHeader,
                BlockKind::NewsRow,
                BlockKind::NewsRow,
                BlockKind::NewsRow,
                BlockKind::ActionBanner,
                BlockKind::ActionRow,
                BlockKind::ActionRow,
                BlockKind::Disclaimer,
            ]
        );
        assert_eq!(report.output.placements[1].page, report.output.placements[2].page);
        assert!(report.output.path.exists());

        let dispatched = report.dispatched.unwrap();
        let today = Local::now().format("%d-%m-%Y").to_string();
        assert!(dispatched.attachment_name.contains(&today));
        assert_eq!(dispatched.subject, "КЭА | Дайджест энергетики | 05.10.2026 — 11.10.2026");
        assert_eq!(mailer.sent.lock().unwrap().len(), 1);

        let reloaded: DigestDocument = serde_json::from_str(&std::fs::read_to_string(saved).unwrap()).unwrap();
        assert_eq!(reloaded, report.digest);
    }

    #[tokio::test]
    async fn test_run_without_dispatcher_stops_after_render() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DigestConfig::default();
        config.feeds = vec![];
        config.scrape_targets = vec![];
        config.output.pdf_path = dir.path().join("digest.pdf");
        config.output.logo_path = dir.path().join("logo.png");
        config.output.font_dir = dir.path().join("fonts");

        let model = Arc::new(DummyModel::new());
        let pipeline = Pipeline::new(
            Collector::new(&config).unwrap(),
            Summarizer::new(model.clone()),
            Renderer::new(&config),
        );
        let report = pipeline.run().await.unwrap();

        assert_eq!(report.article_count, 0);
        assert_eq!(model.prompts().len(), 1);
        assert!(report.dispatched.is_none());
        assert!(report.output.path.exists());
    }
}
