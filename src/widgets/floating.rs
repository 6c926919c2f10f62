//! Placement of the floating listbox panel.
//!
//! The widget treats positioning as an injected service: it hands over the
//! anchor rectangle and the height its content wants, and gets back where the
//! panel goes. [`FlipPlacement`] is the terminal implementation: same width as
//! the anchor, below it when there is room, flipped above otherwise, height
//! capped to the space on the chosen side.

use crate::terminal::TerminalSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub col: u16,
    pub row: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> u16 {
        self.row.saturating_add(self.height)
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col
            && col < self.col.saturating_add(self.width)
            && row >= self.row
            && row < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Below,
    Above,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub rect: Rect,
    pub side: Side,
}

pub trait FloatingService: Send + Sync {
    fn place(&self, anchor: Rect, content_height: u16, viewport: TerminalSize) -> Placement;
}

#[derive(Debug, Clone, Copy)]
pub struct FlipPlacement {
    /// Rows kept free between the panel and the viewport edge.
    pub padding: u16,
}

impl Default for FlipPlacement {
    fn default() -> Self {
        Self { padding: 1 }
    }
}

impl FloatingService for FlipPlacement {
    fn place(&self, anchor: Rect, content_height: u16, viewport: TerminalSize) -> Placement {
        let below = viewport
            .height
            .saturating_sub(anchor.bottom())
            .saturating_sub(self.padding);
        let above = anchor.row.saturating_sub(self.padding);

        let side = if content_height <= below || below >= above {
            Side::Below
        } else {
            Side::Above
        };

        let available = match side {
            Side::Below => below,
            Side::Above => above,
        };
        let height = content_height.min(available);
        let row = match side {
            Side::Below => anchor.bottom(),
            Side::Above => anchor.row.saturating_sub(height),
        };

        Placement {
            rect: Rect::new(anchor.col, row, anchor.width, height),
            side,
        }
    }
}
