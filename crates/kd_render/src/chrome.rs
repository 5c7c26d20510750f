use std::path::PathBuf;

use kd_core::config::Branding;

use crate::ops::{Align, DrawOp};
use crate::style::{self, FOOTER_H, HEADER_H, MARGIN_L, MARGIN_R, PAGE_H, PAGE_W};

const LOGO_H: f32 = 14.0;
const LOGO_TOP: f32 = 5.0;

/// Draws page furniture independently of the flowed content.
pub trait PageDecorator {
    fn decorate(&self, page_number: usize) -> Vec<DrawOp>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    pub path: PathBuf,
    /// Width over height of the source image.
    pub aspect: f32,
}

/// Navy banner with logo and period on top, confidentiality notice and page
/// number at the bottom.
#[derive(Debug, Clone)]
pub struct DigestChrome {
    association: String,
    subtitle: String,
    notice: String,
    logo: Option<Logo>,
}

impl DigestChrome {
    pub fn new(branding: &Branding, period: &str, logo: Option<Logo>) -> Self {
        Self {
            association: branding.association.clone(),
            subtitle: format!("Еженедельный мониторинг энергетики  |  {}", period),
            notice: format!("Только для внутреннего использования  |  {}", branding.site),
            logo,
        }
    }
}

impl PageDecorator for DigestChrome {
    fn decorate(&self, page_number: usize) -> Vec<DrawOp> {
        let mut ops = vec![DrawOp::Rect {
            x: 0.0,
            y: 0.0,
            width: PAGE_W,
            height: HEADER_H,
            color: style::NAVY,
        }];

        let text_x = match &self.logo {
            Some(logo) => {
                let width = LOGO_H * logo.aspect;
                ops.push(DrawOp::Image {
                    path: logo.path.clone(),
                    x: MARGIN_L,
                    y: LOGO_TOP,
                    width,
                    height: LOGO_H,
                });
                MARGIN_L + width + 5.0
            }
            None => MARGIN_L,
        };

        ops.push(DrawOp::Text {
            x: text_x,
            y: 11.0,
            text: self.association.clone(),
            style: style::BANNER_TITLE,
            align: Align::Left,
        });
        ops.push(DrawOp::Text {
            x: text_x,
            y: 17.0,
            text: self.subtitle.clone(),
            style: style::BANNER_SUBTITLE,
            align: Align::Left,
        });

        ops.push(DrawOp::Rect {
            x: 0.0,
            y: PAGE_H - FOOTER_H,
            width: PAGE_W,
            height: FOOTER_H,
            color: style::NAVY,
        });
        ops.push(DrawOp::Text {
            x: MARGIN_L,
            y: PAGE_H - 8.0,
            text: self.notice.clone(),
            style: style::FOOTER_NOTICE,
            align: Align::Left,
        });
        ops.push(DrawOp::Text {
            x: PAGE_W - MARGIN_R,
            y: PAGE_H - 8.0,
            text: format!("Стр. {}", page_number),
            style: style::FOOTER_PAGE,
            align: Align::Right,
        });
        ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(ops: &[DrawOp]) -> Vec<&str> {
        ops.iter().filter_map(DrawOp::text).collect()
    }

    #[test]
    fn test_chrome_without_logo() {
        let chrome = DigestChrome::new(&Branding::default(), "05.10.2026 — 11.10.2026", None);
        let ops = chrome.decorate(3);

        assert_eq!(
            texts(&ops),
            vec![
                "ОЮЛ «Казахстанская Электроэнергетическая Ассоциация»",
                "Еженедельный мониторинг энергетики  |  05.10.2026 — 11.10.2026",
                "Только для внутреннего использования  |  kea.kz",
                "Стр. 3",
            ]
        );
        assert!(matches!(ops.last(), Some(DrawOp::Text { align: Align::Right, .. })));
        assert!(!ops.iter().any(|op| matches!(op, DrawOp::Image { .. })));
    }

    #[test]
    fn test_logo_keeps_aspect_and_shifts_text() {
        let logo = Logo {
            path: PathBuf::from("assets/logo.png"),
            aspect: 1600.0 / 1145.0,
        };
        let ops = DigestChrome::new(&Branding::default(), "p", Some(logo)).decorate(1);

        let Some(DrawOp::Image { width, height, .. }) = ops.iter().find(|op| matches!(op, DrawOp::Image { .. })) else {
            panic!("logo expected");
        };
        assert!((width / height - 1600.0 / 1145.0).abs() < 1e-4);

        let Some(DrawOp::Text { x, .. }) = ops.iter().find(|op| op.text().is_some()) else {
            panic!("banner text expected");
        };
        assert!((x - (MARGIN_L + width + 5.0)).abs() < 1e-4);
    }
}
