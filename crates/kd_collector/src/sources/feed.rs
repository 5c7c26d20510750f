use async_trait::async_trait;
use chrono::{DateTime, Utc};
use feed_rs::model::Entry;
use kd_core::config::FeedSource;
use kd_core::prelude::*;

use super::{fetch_bytes, FetchContext, Source, SourceKind};
use crate::html::{strip_html, truncate_chars};

type DateField = fn(&Entry) -> Option<DateTime<Utc>>;

fn published(entry: &Entry) -> Option<DateTime<Utc>> {
    entry.published
}

fn updated(entry: &Entry) -> Option<DateTime<Utc>> {
    entry.updated
}

/// Timestamp fields in priority order.
const DATE_FIELDS: &[DateField] = &[published, updated];

/// First date field present on the entry, or `fallback`.
pub fn resolve_timestamp(entry: &Entry, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DATE_FIELDS
        .iter()
        .find_map(|field| field(entry))
        .unwrap_or(fallback)
}

/// An RSS or Atom feed.
#[derive(Debug, Clone)]
pub struct FeedScraper {
    source: FeedSource,
}

impl FeedScraper {
    pub fn new(source: FeedSource) -> Self {
        Self { source }
    }

    pub fn parse(&self, body: &[u8], ctx: &FetchContext<'_>) -> Result<Vec<Article>> {
        let feed = feed_rs::parser::parse(body).map_err(|e| {
            Error::Collection(format!("Failed to parse feed {}: {}", self.source.url, e))
        })?;

        let mut articles = Vec::new();
        for entry in &feed.entries {
            let published_at = resolve_timestamp(entry, ctx.now);
            if published_at < ctx.since {
                continue;
            }

            let title = entry
                .title
                .as_ref()
                .map(|t| t.content.trim().to_string())
                .unwrap_or_default();
            let raw_summary = entry
                .summary
                .as_ref()
                .map(|s| s.content.clone())
                .or_else(|| entry.content.as_ref().and_then(|c| c.body.clone()))
                .unwrap_or_default();
            let summary = truncate_chars(&strip_html(&raw_summary), ctx.settings.summary_max_chars);

            if !ctx.filter.is_relevant(&format!("{} {}", title, summary)) {
                continue;
            }

            articles.push(Article {
                source: self.source.name.clone(),
                title,
                summary,
                link: entry.links.first().map(|l| l.href.clone()).unwrap_or_default(),
                date: published_at.format(kd_core::DATE_FORMAT).to_string(),
            });
        }
        Ok(articles)
    }
}

#[async_trait]
impl Source for FeedScraper {
    fn name(&self) -> &str {
        &self.source.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Feed
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<Article>> {
        let body = fetch_bytes(ctx.client, &self.source.url).await?;
        self.parse(&body, ctx)
    }
}
