//! Turns a [`DigestDocument`] into a branded, paginated A4 PDF.
//!
//! Content is built as a story of blocks, measured and split into pages by
//! [`flow::Paginator`], then painted together with per-page chrome.

pub mod blocks;
pub mod chrome;
pub mod flow;
pub mod fonts;
pub mod ops;
pub mod pdf;
pub mod story;
pub mod style;
pub mod text;

use std::path::{Path, PathBuf};

use chrono::Local;
use kd_core::config::{Branding, OutputConfig};
use kd_core::prelude::*;
use kd_core::DATE_FORMAT;
use printpdf::image_crate;
use tracing::{info, warn};

use crate::chrome::{DigestChrome, Logo};
use crate::flow::{Frame, Page, Paginator, Placement};
use crate::fonts::FontSet;
use crate::story::{build_story, DEFAULT_PERIOD};

pub use crate::chrome::PageDecorator;
pub use crate::story::Flowable;

#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub path: PathBuf,
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

pub struct Renderer {
    branding: Branding,
    output: OutputConfig,
    fonts: FontSet,
}

impl Renderer {
    pub fn new(config: &DigestConfig) -> Self {
        Self {
            branding: config.branding.clone(),
            output: config.output.clone(),
            fonts: FontSet::load(&config.output.font_dir),
        }
    }

    fn frame() -> Frame {
        Frame {
            x: style::MARGIN_L,
            y: style::MARGIN_T,
            width: style::CONTENT_W,
            height: style::CONTENT_H,
        }
    }

    /// Paginate without writing anything.
    pub fn layout(&self, digest: &DigestDocument, today: &str) -> (Vec<Page>, Vec<Placement>) {
        let story = build_story(digest, &self.branding, today);
        Paginator::new(Self::frame(), &self.fonts).run(&story)
    }

    fn logo(&self) -> Option<Logo> {
        let path = &self.output.logo_path;
        if !path.exists() {
            warn!("Logo not found at {}, header drawn without it", path.display());
            return None;
        }
        match image_crate::image_dimensions(path) {
            Ok((w, h)) if h > 0 => Some(Logo {
                path: path.clone(),
                aspect: w as f32 / h as f32,
            }),
            Ok(_) => None,
            Err(e) => {
                warn!("Unreadable logo {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Render to the configured output path.
    pub fn render(&self, digest: &DigestDocument) -> Result<RenderOutput> {
        let path = self.output.pdf_path.clone();
        self.render_to(digest, &path)
    }

    pub fn render_to(&self, digest: &DigestDocument, path: &Path) -> Result<RenderOutput> {
        let today = Local::now().format(DATE_FORMAT).to_string();
        let (pages, placements) = self.layout(digest, &today);

        let period = digest.period().unwrap_or(DEFAULT_PERIOD);
        let chrome = DigestChrome::new(&self.branding, period, self.logo());
        let title = format!("{} | Дайджест энергетики | {}", self.branding.tag, period);
        pdf::write_pdf(path, &title, &pages, &chrome, &self.fonts)?;

        info!("PDF created: {} ({} pages)", path.display(), pages.len());
        Ok(RenderOutput {
            path: path.to_path_buf(),
            page_count: pages.len(),
            placements,
        })
    }
}
