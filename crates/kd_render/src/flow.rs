use crate::blocks::{Block, BlockKind, Laid};
use crate::fonts::FontSet;
use crate::ops::DrawOp;
use crate::story::Flowable;

/// The content rectangle of a page, in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where a block ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub kind: BlockKind,
    pub headline: String,
    /// 1-based page number.
    pub page: usize,
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

/// Lays a story out into frames of equal size, one per page.
pub struct Paginator<'a> {
    frame: Frame,
    fonts: &'a FontSet,
    pages: Vec<Page>,
    placements: Vec<Placement>,
    /// Distance from the frame top to the next free line.
    cursor: f32,
}

impl<'a> Paginator<'a> {
    pub fn new(frame: Frame, fonts: &'a FontSet) -> Self {
        Self {
            frame,
            fonts,
            pages: vec![Page {
                number: 1,
                ops: Vec::new(),
            }],
            placements: Vec::new(),
            cursor: 0.0,
        }
    }

    pub fn run(mut self, story: &[Flowable]) -> (Vec<Page>, Vec<Placement>) {
        for flowable in story {
            self.place(flowable);
        }
        (self.pages, self.placements)
    }

    fn at_page_top(&self) -> bool {
        self.cursor == 0.0
    }

    fn remaining(&self) -> f32 {
        self.frame.height - self.cursor
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            ops: Vec::new(),
        });
        self.cursor = 0.0;
    }

    fn measure(&self, flowable: &Flowable) -> f32 {
        match flowable {
            Flowable::Block(block) => block.layout(self.frame.width, self.fonts).height,
            Flowable::Spacer(height) => *height,
            Flowable::KeepTogether(children) => children.iter().map(|c| self.measure(c)).sum(),
        }
    }

    fn place(&mut self, flowable: &Flowable) {
        match flowable {
            Flowable::Spacer(height) => {
                if self.at_page_top() {
                    return;
                }
                if *height >= self.remaining() {
                    self.new_page();
                } else {
                    self.cursor += height;
                }
            }
            Flowable::Block(block) => {
                let laid = block.layout(self.frame.width, self.fonts);
                // A block taller than a whole frame is placed anyway and overflows.
                if laid.height > self.remaining() && !self.at_page_top() {
                    self.new_page();
                }
                self.draw(block, laid);
            }
            Flowable::KeepTogether(children) => {
                if self.measure(flowable) > self.remaining() && !self.at_page_top() {
                    self.new_page();
                }
                for child in children {
                    self.place(child);
                }
            }
        }
    }

    fn draw(&mut self, block: &Block, laid: Laid) {
        let (left, top) = (self.frame.x, self.frame.y + self.cursor);
        let current = self.pages.len() - 1;
        let page = &mut self.pages[current];
        page.ops
            .extend(laid.ops.into_iter().map(|op| op.translate(left, top)));
        self.placements.push(Placement {
            kind: block.kind(),
            headline: block.headline(),
            page: page.number,
            top,
            height: laid.height,
        });
        self.cursor += laid.height;
    }
}
