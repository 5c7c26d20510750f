use chrono::{DateTime, Duration, Utc};
use kd_core::config::CollectionConfig;
use kd_core::logging::Logger;
use kd_core::prelude::*;
use reqwest::Client;

use crate::dedup::dedup_by_title;
use crate::relevance::KeywordFilter;
use crate::sources::{FeedScraper, FetchContext, PageScraper, Source};

type BoxedSource = Box<dyn Source>;

/// Runs every configured source once and merges the results.
pub struct Collector {
    client: Client,
    filter: KeywordFilter,
    settings: CollectionConfig,
    sources: Vec<BoxedSource>,
}

impl Collector {
    pub fn new(config: &DigestConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.http.user_agent.as_str())
            .timeout(config.http.timeout())
            .build()?;

        let mut collector = Self {
            client,
            filter: KeywordFilter::new(&config.keywords),
            settings: config.collection.clone(),
            sources: Vec::new(),
        };
        // Feeds go first so their articles win deduplication.
        for feed in &config.feeds {
            collector.add_source(Box::new(FeedScraper::new(feed.clone())));
        }
        for target in &config.scrape_targets {
            collector.add_source(Box::new(PageScraper::new(target.clone())));
        }
        Ok(collector)
    }

    pub fn add_source(&mut self, source: BoxedSource) {
        self.sources.push(source);
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub async fn collect(&self) -> Vec<Article> {
        self.collect_at(Utc::now()).await
    }

    /// Collect relative to `now`. A failing source contributes nothing.
    pub async fn collect_at(&self, now: DateTime<Utc>) -> Vec<Article> {
        let ctx = FetchContext {
            client: &self.client,
            filter: &self.filter,
            settings: &self.settings,
            since: now - Duration::days(self.settings.lookback_days),
            now,
        };

        let mut articles = Vec::new();
        for source in &self.sources {
            let logger = Logger::new()
                .with_prefix(source.kind().label())
                .with_prefix(source.name());
            match source.fetch(&ctx).await {
                Ok(found) => {
                    logger.info(&format!("{} energy articles", found.len()));
                    articles.extend(found);
                }
                Err(e) => logger.warn(&format!("failed: {}", e)),
            }
        }

        let unique = dedup_by_title(articles, self.settings.dedup_prefix_chars);
        tracing::info!("📰 Total unique energy articles collected: {}", unique.len());
        unique
    }
}
