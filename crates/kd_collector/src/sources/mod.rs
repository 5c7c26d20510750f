use async_trait::async_trait;
use chrono::{DateTime, Utc};
use kd_core::config::CollectionConfig;
use kd_core::prelude::*;
use reqwest::Client;

use crate::relevance::KeywordFilter;

pub mod feed;
pub mod page;

pub use feed::FeedScraper;
pub use page::PageScraper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Feed,
    Scrape,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Feed => "RSS",
            SourceKind::Scrape => "Scrape",
        }
    }
}

/// Shared state for one collection pass.
pub struct FetchContext<'a> {
    pub client: &'a Client,
    pub filter: &'a KeywordFilter,
    pub settings: &'a CollectionConfig,
    /// Entries published before this instant are dropped.
    pub since: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl FetchContext<'_> {
    /// Date stamped on articles that carry none.
    pub fn today(&self) -> String {
        self.now
            .with_timezone(&chrono::Local)
            .format(kd_core::DATE_FORMAT)
            .to_string()
    }
}

#[async_trait]
pub trait Source: Send + Sync {
    /// Human readable source name, used as `Article::source`
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Fetch and filter this source's articles
    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<Article>>;
}

/// GET a URL and return the raw body, failing on non-success status.
/// Feeds declare their own encoding in the XML prolog.
pub(crate) async fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

/// GET a URL and decode the body with the charset from `Content-Type`,
/// UTF-8 when none is given.
pub(crate) async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.text().await?)
}
