use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use kd_core::{Error, Result};
use printpdf::path::PaintMode;
use printpdf::{
    image_crate, Image, ImageTransform, ImageXObject, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Rect, Rgb,
};
use tracing::warn;

use crate::chrome::PageDecorator;
use crate::flow::Page;
use crate::fonts::{FontData, FontSet};
use crate::ops::{Align, DrawOp};
use crate::style::{Color, FontRole, PAGE_H, PAGE_W};

const IMAGE_DPI: f32 = 300.0;

fn render_err(e: impl std::fmt::Display) -> Error {
    Error::Render(e.to_string())
}

/// Embeds each face of `fonts` once per document.
fn embed_fonts(doc: &PdfDocumentReference, fonts: &FontSet) -> Result<HashMap<FontRole, IndirectFontRef>> {
    let mut embedded = HashMap::new();
    for role in [FontRole::Regular, FontRole::Bold, FontRole::Italic] {
        let font = match &fonts.face(role).data {
            FontData::TrueType(bytes) => doc.add_external_font(bytes.as_slice()),
            FontData::Builtin(builtin) => doc.add_builtin_font(*builtin),
        }
        .map_err(render_err)?;
        embedded.insert(role, font);
    }
    Ok(embedded)
}

/// Decoded images keyed by path. A file that fails to decode is remembered
/// as `None` and skipped on every page.
#[derive(Default)]
struct ImageCache {
    images: HashMap<PathBuf, Option<ImageXObject>>,
}

impl ImageCache {
    fn get(&mut self, path: &Path) -> Option<&ImageXObject> {
        self.images
            .entry(path.to_path_buf())
            .or_insert_with(|| match image_crate::open(path) {
                Ok(decoded) => Some(ImageXObject::from_dynamic_image(&decoded)),
                Err(e) => {
                    warn!("Skipping image {}: {}", path.display(), e);
                    None
                }
            })
            .as_ref()
    }
}

fn pdf_color(color: Color) -> printpdf::Color {
    printpdf::Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

/// Converts a top-down millimetre `y` to PDF user space.
fn flip(y: f32) -> Mm {
    Mm(PAGE_H - y)
}

struct Painter<'a> {
    layer: PdfLayerReference,
    fonts: &'a FontSet,
    embedded: &'a HashMap<FontRole, IndirectFontRef>,
}

impl Painter<'_> {
    fn paint(&self, op: &DrawOp, images: &mut ImageCache) -> Result<()> {
        match op {
            DrawOp::Rect { x, y, width, height, color } => {
                self.layer.set_fill_color(pdf_color(*color));
                let rect = Rect::new(Mm(*x), flip(y + height), Mm(x + width), flip(*y)).with_mode(PaintMode::Fill);
                self.layer.add_rect(rect);
            }
            DrawOp::Line { x1, y1, x2, y2, thickness_pt, color } => {
                self.layer.set_outline_color(pdf_color(*color));
                self.layer.set_outline_thickness(*thickness_pt);
                self.layer.add_line(Line {
                    points: vec![
                        (Point::new(Mm(*x1), flip(*y1)), false),
                        (Point::new(Mm(*x2), flip(*y2)), false),
                    ],
                    is_closed: false,
                });
            }
            DrawOp::Text { x, y, text, style, align } => {
                let Some(font) = self.embedded.get(&style.font) else {
                    return Err(Error::Render(format!("no font embedded for {:?}", style.font)));
                };
                let left = match align {
                    Align::Left => *x,
                    Align::Center => x - self.fonts.width(text, style) / 2.0,
                    Align::Right => x - self.fonts.width(text, style),
                };
                self.layer.set_fill_color(pdf_color(style.color));
                self.layer.use_text(text.as_str(), style.size_pt, Mm(left), flip(*y), font);
            }
            DrawOp::Image { path, x, y, width, height } => {
                let Some(xobject) = images.get(path) else {
                    return Ok(());
                };
                let natural_w = xobject.width.0 as f32 / IMAGE_DPI * 25.4;
                let natural_h = xobject.height.0 as f32 / IMAGE_DPI * 25.4;
                // Page resources are per page, so each page gets its own copy
                // of the already decoded pixels.
                Image::from(xobject.clone()).add_to_layer(
                    self.layer.clone(),
                    ImageTransform {
                        translate_x: Some(Mm(*x)),
                        translate_y: Some(flip(y + height)),
                        scale_x: Some(width / natural_w),
                        scale_y: Some(height / natural_h),
                        dpi: Some(IMAGE_DPI),
                        ..Default::default()
                    },
                );
            }
        }
        Ok(())
    }
}

/// Paints laid-out pages into an A4 PDF at `path`. Decorations go under the
/// content on every page.
pub fn write_pdf(
    path: &Path,
    title: &str,
    pages: &[Page],
    decorator: &dyn PageDecorator,
    fonts: &FontSet,
) -> Result<()> {
    let (doc, first_page, first_layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Digest");
    let embedded = embed_fonts(&doc, fonts)?;
    let mut images = ImageCache::default();

    for (index, page) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Digest");
            doc.get_page(page_index).get_layer(layer_index)
        };
        let painter = Painter {
            layer,
            fonts,
            embedded: &embedded,
        };
        for op in decorator.decorate(page.number).iter().chain(page.ops.iter()) {
            painter.paint(op, &mut images)?;
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = BufWriter::new(File::create(path)?);
    doc.save(&mut writer).map_err(render_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chrome::{DigestChrome, Logo};
    use crate::fonts::tests::bundled_fonts;
    use kd_core::config::Branding;

    fn logo(dir: &Path) -> PathBuf {
        let path = dir.join("logo.png");
        image_crate::RgbImage::from_pixel(8, 4, image_crate::Rgb([17, 66, 114]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_image_decoded_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = logo(dir.path());
        let mut cache = ImageCache::default();

        assert_eq!(cache.get(&path).map(|x| x.width.0), Some(8));
        std::fs::remove_file(&path).unwrap();
        // Served from the cache even though the file is gone.
        assert_eq!(cache.get(&path).map(|x| x.height.0), Some(4));
        assert_eq!(cache.images.len(), 1);

        assert!(cache.get(&dir.path().join("absent.png")).is_none());
        assert_eq!(cache.images.len(), 2);
    }

    #[test]
    fn test_multi_page_pdf_with_logo() {
        let dir = tempfile::tempdir().unwrap();
        let chrome = DigestChrome::new(
            &Branding::default(),
            "05.10.2026 — 11.10.2026",
            Some(Logo {
                path: logo(dir.path()),
                aspect: 2.0,
            }),
        );
        let pages: Vec<Page> = (1..=3).map(|number| Page { number, ops: Vec::new() }).collect();
        let out = dir.path().join("digest.pdf");

        write_pdf(&out, "КЭА", &pages, &chrome, &bundled_fonts()).unwrap();
        let bytes = std::fs::read(&out).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
