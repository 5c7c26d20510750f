use crate::fonts::FontSet;
use crate::ops::{Align, DrawOp};
use crate::style::{self, Color, TextStyle, PT};
use crate::text::wrap;

/// Share of the row width given to the label column of a news row.
const LABEL_SHARE: f32 = 0.30;
/// Width of the numbered badge column of an action row.
const BADGE_W: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Title,
    SectionHeader,
    NewsRow,
    ActionBanner,
    ActionRow,
    Disclaimer,
}

/// A self-contained piece of the flowed content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title {
        heading: String,
        period: String,
        caption: String,
    },
    SectionHeader {
        text: String,
    },
    NewsRow {
        label: String,
        source: String,
        body: String,
    },
    ActionBanner {
        text: String,
    },
    ActionRow {
        number: usize,
        title: String,
        body: String,
        last: bool,
    },
    Disclaimer {
        text: String,
    },
}

/// A block measured against a width: its height and its draw operations
/// relative to the block's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Laid {
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

struct Padding {
    top: f32,
    bottom: f32,
    left: f32,
    right: f32,
}

impl Padding {
    fn pt(top: f32, bottom: f32, left: f32, right: f32) -> Self {
        Self {
            top: top * PT,
            bottom: bottom * PT,
            left: left * PT,
            right: right * PT,
        }
    }
}

/// Wrapped paragraph at `(x, y)`. Returns its height and ops.
fn paragraph(
    fonts: &FontSet,
    text: &str,
    style: TextStyle,
    x: f32,
    y: f32,
    width: f32,
    align: Align,
) -> (f32, Vec<DrawOp>) {
    let lines = wrap(text, &style, width, fonts);
    let leading = style.leading();
    let anchor = match align {
        Align::Left => x,
        Align::Center => x + width / 2.0,
        Align::Right => x + width,
    };
    let ops = lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| DrawOp::Text {
            x: anchor,
            y: y + i as f32 * leading + leading * 0.78,
            text: line,
            style,
            align,
        })
        .collect::<Vec<_>>();
    (ops.len() as f32 * leading, ops)
}

fn rect(x: f32, y: f32, width: f32, height: f32, color: Color) -> DrawOp {
    DrawOp::Rect { x, y, width, height, color }
}

fn line(x1: f32, y1: f32, x2: f32, y2: f32, thickness_pt: f32, color: Color) -> DrawOp {
    DrawOp::Line { x1, y1, x2, y2, thickness_pt, color }
}

/// One filled bar holding a single paragraph.
fn banner(fonts: &FontSet, text: &str, style: TextStyle, pad: Padding, background: Color, width: f32) -> Laid {
    let (text_h, text_ops) = paragraph(
        fonts,
        text,
        style,
        pad.left,
        pad.top,
        width - pad.left - pad.right,
        Align::Left,
    );
    let height = pad.top + text_h + pad.bottom;
    let mut ops = vec![rect(0.0, 0.0, width, height, background)];
    ops.extend(text_ops);
    Laid { height, ops }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Title { .. } => BlockKind::Title,
            Block::SectionHeader { .. } => BlockKind::SectionHeader,
            Block::NewsRow { .. } => BlockKind::NewsRow,
            Block::ActionBanner { .. } => BlockKind::ActionBanner,
            Block::ActionRow { .. } => BlockKind::ActionRow,
            Block::Disclaimer { .. } => BlockKind::Disclaimer,
        }
    }

    /// The text a reader would identify the block by.
    pub fn headline(&self) -> String {
        match self {
            Block::Title { heading, .. } => heading.clone(),
            Block::SectionHeader { text } | Block::ActionBanner { text } | Block::Disclaimer { text } => {
                text.clone()
            }
            Block::NewsRow { label, .. } => label.clone(),
            Block::ActionRow { number, .. } => number.to_string(),
        }
    }

    pub fn layout(&self, width: f32, fonts: &FontSet) -> Laid {
        match self {
            Block::Title { heading, period, caption } => {
                let pad = Padding::pt(8.0, 8.0, 12.0, 10.0);
                let inner = width - pad.left - pad.right;
                let mut ops = Vec::new();
                let mut y = pad.top;

                let (h, text) = paragraph(fonts, heading, style::HEADING, pad.left, y, inner, Align::Left);
                ops.extend(text);
                y += h + 3.0;
                let (h, text) = paragraph(fonts, period, style::PERIOD, pad.left, y, inner, Align::Left);
                ops.extend(text);
                y += h + 2.0;
                let (h, text) = paragraph(fonts, caption, style::CAPTION, pad.left, y, inner, Align::Left);
                ops.extend(text);
                let height = y + h + pad.bottom;

                let mut laid = vec![
                    rect(0.0, 0.0, width, height, style::LGRAY),
                    line(0.0, 0.0, 0.0, height, 4.0, style::GOLD),
                ];
                laid.extend(ops);
                Laid { height, ops: laid }
            }
            Block::SectionHeader { text } => banner(
                fonts,
                text,
                style::SECTION_HEADER,
                Padding::pt(5.0, 5.0, 8.0, 8.0),
                style::NAVY,
                width,
            ),
            Block::NewsRow { label, source, body } => {
                let left_w = width * LABEL_SHARE;
                let right_w = width - left_w;

                let lp = Padding::pt(5.0, 6.0, 8.0, 6.0);
                let left_inner = left_w - lp.left - lp.right;
                let (label_h, label_ops) = paragraph(fonts, label, style::LABEL, lp.left, lp.top, left_inner, Align::Left);
                let gap = if label_h > 0.0 { 1.0 } else { 0.0 };
                let (source_h, source_ops) = paragraph(
                    fonts,
                    source,
                    style::SOURCE,
                    lp.left,
                    lp.top + label_h + gap,
                    left_inner,
                    Align::Left,
                );
                let left_h = lp.top + label_h + gap + source_h + lp.bottom;

                let rp = Padding::pt(5.0, 6.0, 10.0, 6.0);
                let (body_h, body_ops) = paragraph(
                    fonts,
                    body,
                    style::BODY,
                    left_w + rp.left,
                    rp.top,
                    right_w - rp.left - rp.right,
                    Align::Left,
                );
                let right_h = rp.top + body_h + rp.bottom;

                let height = left_h.max(right_h);
                let mut ops = vec![
                    rect(0.0, 0.0, left_w, height, style::LGRAY),
                    rect(left_w, 0.0, right_w, height, style::WHITE),
                    line(left_w, 0.0, left_w, height, 2.0, style::LGOLD),
                    line(0.0, height, width, height, 0.5, style::MGRAY),
                ];
                ops.extend(label_ops);
                ops.extend(source_ops);
                ops.extend(body_ops);
                Laid { height, ops }
            }
            Block::ActionBanner { text } => banner(
                fonts,
                text,
                style::ALERT_HEADER,
                Padding::pt(6.0, 6.0, 10.0, 6.0),
                style::DARK,
                width,
            ),
            Block::ActionRow { number, title, body, last } => {
                let pad = Padding::pt(6.0, 6.0, 10.0, 6.0);
                let text_x = BADGE_W + pad.left;
                let text_w = width - BADGE_W - pad.left - pad.right;

                let (badge_h, badge_ops) =
                    paragraph(fonts, &number.to_string(), style::BADGE, 0.0, pad.top, BADGE_W, Align::Center);
                let (title_h, title_ops) = paragraph(fonts, title, style::ALERT_TITLE, text_x, pad.top, text_w, Align::Left);
                let gap = if title_h > 0.0 { 2.0 } else { 0.0 };
                let (body_h, body_ops) = paragraph(
                    fonts,
                    body,
                    style::ALERT_BODY,
                    text_x,
                    pad.top + title_h + gap,
                    text_w,
                    Align::Left,
                );

                let height = pad.top + badge_h.max(title_h + gap + body_h) + pad.bottom;
                let mut ops = vec![
                    rect(0.0, 0.0, BADGE_W, height, style::GOLD),
                    rect(BADGE_W, 0.0, width - BADGE_W, height, style::CREAM),
                ];
                if !last {
                    ops.push(line(0.0, height, width, height, 0.5, style::MGRAY));
                }
                ops.extend(badge_ops);
                ops.extend(title_ops);
                ops.extend(body_ops);
                Laid { height, ops }
            }
            Block::Disclaimer { text } => {
                let (height, ops) = paragraph(fonts, text, style::FOOTER_NOTE, 0.0, 0.0, width, Align::Left);
                Laid { height, ops }
            }
        }
    }
}
