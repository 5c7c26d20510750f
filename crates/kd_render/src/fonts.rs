//! Font faces used by the renderer and their advance widths.
//!
//! Layout and painting share one [`FontSet`], so the widths used to wrap and
//! align text are those of the face that ends up embedded in the PDF.

use std::collections::HashMap;
use std::path::Path;

use kd_core::{Error, Result};
use printpdf::BuiltinFont;
use tracing::warn;

use crate::style::{FontRole, TextStyle, PT};

/// Code points measured from a TrueType face: Latin, Greek and Cyrillic,
/// general punctuation, currency signs and miscellaneous symbols.
const MEASURED_RANGES: [(u32, u32); 3] = [(0x20, 0x24F), (0x370, 0x52F), (0x2000, 0x2BFF)];

/// Helvetica advances for ASCII 0x20..=0x7E, in 1/1000 em (Adobe core AFM).
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold advances for ASCII 0x20..=0x7E, in 1/1000 em.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// Advance widths of one face.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    units_per_em: f32,
    advances: HashMap<char, u16>,
    /// Width for characters the face does not map.
    missing: u16,
}

impl FontMetrics {
    pub fn from_ttf(data: &[u8]) -> Result<Self> {
        let face = ttf_parser::Face::parse(data, 0)
            .map_err(|e| Error::Render(format!("invalid TrueType font: {}", e)))?;

        let mut advances = HashMap::new();
        for (start, end) in MEASURED_RANGES {
            for ch in (start..=end).filter_map(char::from_u32) {
                let advance = face
                    .glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph));
                if let Some(advance) = advance {
                    advances.insert(ch, advance);
                }
            }
        }
        let missing = face
            .glyph_hor_advance(ttf_parser::GlyphId(0))
            .unwrap_or(face.units_per_em());

        Ok(Self {
            units_per_em: face.units_per_em() as f32,
            advances,
            missing,
        })
    }

    /// Standard metrics of a PDF base font. Only ASCII is mapped; anything
    /// else is measured at the width of a digit.
    pub fn builtin(font: BuiltinFont) -> Self {
        let table = match font {
            BuiltinFont::HelveticaBold | BuiltinFont::HelveticaBoldOblique => &HELVETICA_BOLD,
            _ => &HELVETICA,
        };
        let advances = (0x20u8..=0x7E)
            .zip(table.iter())
            .map(|(byte, width)| (byte as char, *width))
            .collect();
        Self {
            units_per_em: 1000.0,
            advances,
            missing: 556,
        }
    }

    /// Width of `text` at `size_pt`, in millimetres.
    pub fn width(&self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text
            .chars()
            .map(|ch| *self.advances.get(&ch).unwrap_or(&self.missing) as u32)
            .sum();
        units as f32 / self.units_per_em * size_pt * PT
    }
}

#[derive(Debug, Clone)]
pub enum FontData {
    TrueType(Vec<u8>),
    Builtin(BuiltinFont),
}

#[derive(Debug, Clone)]
pub struct Face {
    pub data: FontData,
    pub metrics: FontMetrics,
}

impl Face {
    fn builtin(font: BuiltinFont) -> Self {
        Self {
            data: FontData::Builtin(font),
            metrics: FontMetrics::builtin(font),
        }
    }

    fn load(path: &Path, fallback: BuiltinFont) -> Self {
        let loaded = std::fs::read(path)
            .map_err(Error::from)
            .and_then(|bytes| Ok((FontMetrics::from_ttf(&bytes)?, bytes)));
        match loaded {
            Ok((metrics, bytes)) => Self {
                data: FontData::TrueType(bytes),
                metrics,
            },
            Err(e) => {
                warn!("Font {} unavailable ({}), using built-in {:?}", path.display(), e, fallback);
                Self::builtin(fallback)
            }
        }
    }
}

/// The regular, bold and italic faces of the document.
#[derive(Debug, Clone)]
pub struct FontSet {
    regular: Face,
    bold: Face,
    italic: Face,
}

impl FontSet {
    /// DejaVu Sans from `dir`, each missing face replaced by its Helvetica
    /// counterpart.
    pub fn load(dir: &Path) -> Self {
        Self {
            regular: Face::load(&dir.join("DejaVuSans.ttf"), BuiltinFont::Helvetica),
            bold: Face::load(&dir.join("DejaVuSans-Bold.ttf"), BuiltinFont::HelveticaBold),
            italic: Face::load(&dir.join("DejaVuSans-Oblique.ttf"), BuiltinFont::HelveticaOblique),
        }
    }

    pub fn builtin() -> Self {
        Self {
            regular: Face::builtin(BuiltinFont::Helvetica),
            bold: Face::builtin(BuiltinFont::HelveticaBold),
            italic: Face::builtin(BuiltinFont::HelveticaOblique),
        }
    }

    pub fn face(&self, role: FontRole) -> &Face {
        match role {
            FontRole::Regular => &self.regular,
            FontRole::Bold => &self.bold,
            FontRole::Italic => &self.italic,
        }
    }

    /// Rendered width of `text` in `style`, in millimetres.
    pub fn width(&self, text: &str, style: &TextStyle) -> f32 {
        self.face(style.font).metrics.width(text, style.size_pt)
    }
}
