use async_trait::async_trait;
use kd_core::config::ScrapeTarget;
use kd_core::prelude::*;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{fetch_text, FetchContext, Source, SourceKind};
use crate::html::element_text;

/// A news listing page scraped with CSS selectors.
///
/// Listings carry no dates, so scraped items are never recency filtered.
#[derive(Debug, Clone)]
pub struct PageScraper {
    target: ScrapeTarget,
}

impl PageScraper {
    pub fn new(target: ScrapeTarget) -> Self {
        Self { target }
    }

    pub fn parse(&self, html: &str, ctx: &FetchContext<'_>) -> Result<Vec<Article>> {
        let document = Html::parse_document(html);
        let item_selectors = parse_selectors(&self.target.item_selectors)?;
        // One union selector, so the earliest title in document order wins.
        let title_selector = parse_selector(&self.target.title_selectors.join(", "))?;
        let link_selector = parse_selector(&self.target.link_selector)?;
        let today = ctx.today();

        let items = first_matching(&document, &item_selectors);
        let mut articles = Vec::new();
        for item in items.into_iter().take(ctx.settings.scrape_item_limit) {
            let Some(title_el) = item.select(&title_selector).next() else {
                continue;
            };
            let title = element_text(&title_el);
            if !ctx.filter.is_relevant(&title) {
                continue;
            }

            let link = item
                .select(&link_selector)
                .next()
                .and_then(|el| el.value().attr("href"))
                .filter(|href| !href.is_empty())
                .map(|href| resolve_link(&self.target.base, href))
                .unwrap_or_default();

            articles.push(Article {
                source: self.target.name.clone(),
                title,
                summary: String::new(),
                link,
                date: today.clone(),
            });
        }
        Ok(articles)
    }
}

#[async_trait]
impl Source for PageScraper {
    fn name(&self) -> &str {
        &self.target.name
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Scrape
    }

    async fn fetch(&self, ctx: &FetchContext<'_>) -> Result<Vec<Article>> {
        let html = fetch_text(ctx.client, &self.target.url).await?;
        self.parse(&html, ctx)
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| Error::Collection(format!("Invalid selector {:?}: {}", selector, e)))
}

fn parse_selectors(selectors: &[String]) -> Result<Vec<Selector>> {
    selectors.iter().map(|s| parse_selector(s)).collect()
}

/// Matches of the first candidate selector that matches anything.
fn first_matching<'a>(document: &'a Html, candidates: &[Selector]) -> Vec<ElementRef<'a>> {
    candidates
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .unwrap_or_default()
}

/// Absolute links pass through; anything else is joined onto `base`.
pub fn resolve_link(base: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }
    Url::parse(base)
        .and_then(|base| base.join(href))
        .map(String::from)
        .unwrap_or_else(|_| format!("{}{}", base, href))
}
