use std::path::PathBuf;

use crate::style::{Color, TextStyle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// One primitive on a page. Coordinates are millimetres from the top-left
/// corner with `y` growing downwards; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        thickness_pt: f32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        style: TextStyle,
        align: Align,
    },
    Image {
        path: PathBuf,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

impl DrawOp {
    pub fn translate(self, dx: f32, dy: f32) -> Self {
        match self {
            DrawOp::Rect { x, y, width, height, color } => DrawOp::Rect {
                x: x + dx,
                y: y + dy,
                width,
                height,
                color,
            },
            DrawOp::Line { x1, y1, x2, y2, thickness_pt, color } => DrawOp::Line {
                x1: x1 + dx,
                y1: y1 + dy,
                x2: x2 + dx,
                y2: y2 + dy,
                thickness_pt,
                color,
            },
            DrawOp::Text { x, y, text, style, align } => DrawOp::Text {
                x: x + dx,
                y: y + dy,
                text,
                style,
                align,
            },
            DrawOp::Image { path, x, y, width, height } => DrawOp::Image {
                path,
                x: x + dx,
                y: y + dy,
                width,
                height,
            },
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}
