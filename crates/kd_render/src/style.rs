//! Page geometry, corporate palette and text styles.
//!
//! All lengths are millimetres unless the name says `_pt`.

pub const PT: f32 = 25.4 / 72.0;

pub const PAGE_W: f32 = 210.0;
pub const PAGE_H: f32 = 297.0;
pub const MARGIN_L: f32 = 18.0;
pub const MARGIN_R: f32 = 18.0;
/// Leaves room for the 22 mm banner.
pub const MARGIN_T: f32 = 28.0;
/// Leaves room for the 14 mm footer.
pub const MARGIN_B: f32 = 20.0;
pub const CONTENT_W: f32 = PAGE_W - MARGIN_L - MARGIN_R;
pub const CONTENT_H: f32 = PAGE_H - MARGIN_T - MARGIN_B;

pub const HEADER_H: f32 = 22.0;
pub const FOOTER_H: f32 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }
}

pub const NAVY: Color = Color::hex(0x114272);
pub const DARK: Color = Color::hex(0x081F43);
pub const GOLD: Color = Color::hex(0xC0985C);
pub const LGOLD: Color = Color::hex(0xD9B66B);
pub const LGRAY: Color = Color::hex(0xF2F2F2);
pub const MGRAY: Color = Color::hex(0xD9D9D9);
pub const DGRAY: Color = Color::hex(0x555555);
pub const AGRAY: Color = Color::hex(0x999999);
pub const INK: Color = Color::hex(0x1A1A2E);
pub const BODY_GRAY: Color = Color::hex(0x333333);
pub const CREAM: Color = Color::hex(0xFFF8EE);
pub const WHITE: Color = Color::hex(0xFFFFFF);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: FontRole,
    pub size_pt: f32,
    pub leading_pt: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(font: FontRole, size_pt: f32, leading_pt: f32, color: Color) -> Self {
        Self {
            font,
            size_pt,
            leading_pt,
            color,
        }
    }

    pub fn leading(&self) -> f32 {
        self.leading_pt * PT
    }

    pub fn size(&self) -> f32 {
        self.size_pt * PT
    }
}

pub const HEADING: TextStyle = TextStyle::new(FontRole::Bold, 15.0, 18.0, NAVY);
pub const PERIOD: TextStyle = TextStyle::new(FontRole::Regular, 9.0, 11.0, DGRAY);
pub const CAPTION: TextStyle = TextStyle::new(FontRole::Regular, 7.5, 9.0, AGRAY);
pub const SECTION_HEADER: TextStyle = TextStyle::new(FontRole::Bold, 10.5, 14.0, WHITE);
pub const LABEL: TextStyle = TextStyle::new(FontRole::Bold, 9.0, 12.0, NAVY);
pub const SOURCE: TextStyle = TextStyle::new(FontRole::Italic, 7.5, 10.0, AGRAY);
pub const BODY: TextStyle = TextStyle::new(FontRole::Regular, 9.0, 13.0, INK);
pub const ALERT_HEADER: TextStyle = TextStyle::new(FontRole::Bold, 11.0, 15.0, GOLD);
pub const BADGE: TextStyle = TextStyle::new(FontRole::Bold, 11.0, 13.0, WHITE);
pub const ALERT_TITLE: TextStyle = TextStyle::new(FontRole::Bold, 9.5, 13.0, DARK);
pub const ALERT_BODY: TextStyle = TextStyle::new(FontRole::Regular, 8.5, 12.0, BODY_GRAY);
pub const FOOTER_NOTE: TextStyle = TextStyle::new(FontRole::Italic, 7.5, 11.0, AGRAY);

pub const BANNER_TITLE: TextStyle = TextStyle::new(FontRole::Bold, 10.0, 12.0, WHITE);
pub const BANNER_SUBTITLE: TextStyle = TextStyle::new(FontRole::Regular, 8.0, 10.0, LGOLD);
pub const FOOTER_NOTICE: TextStyle = TextStyle::new(FontRole::Regular, 7.5, 9.0, LGOLD);
pub const FOOTER_PAGE: TextStyle = TextStyle::new(FontRole::Regular, 7.5, 9.0, WHITE);
