use crate::terminal::{KeyEvent, TerminalSize};
use crate::ui::span::SpanLine;

// ---------------------------------------------------------------------------
// Render context & output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RenderContext {
    pub focused: bool,
    pub terminal_size: TerminalSize,
    /// Columns available to the control.
    pub width: u16,
}

impl RenderContext {
    pub fn new(terminal_size: TerminalSize) -> Self {
        Self {
            focused: false,
            terminal_size,
            width: terminal_size.width,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct DrawOutput {
    pub lines: Vec<SpanLine>,
    /// Cursor position relative to the first line, as (col, row).
    pub cursor: Option<(u16, u16)>,
}

// ---------------------------------------------------------------------------
// Drawable
// ---------------------------------------------------------------------------

pub trait Drawable: Send {
    fn id(&self) -> &str;
    fn label(&self) -> &str {
        ""
    }
    fn draw(&self, ctx: &RenderContext) -> DrawOutput;
}

// ---------------------------------------------------------------------------
// InteractionResult
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionResult {
    pub handled: bool,
    pub request_render: bool,
}

impl InteractionResult {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            handled: true,
            request_render: false,
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            request_render: true,
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.handled |= other.handled;
        self.request_render |= other.request_render;
    }
}

// ---------------------------------------------------------------------------
// Interactive
// ---------------------------------------------------------------------------

/// Where a pointer press landed relative to a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The input or the surface around it.
    Control,
    /// A row of the listbox, by filtered index.
    Option(usize),
    /// The remove button of a selection chip, by selection index.
    Chip(usize),
    Outside,
}

pub trait Interactive: Send {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult;

    fn on_pointer(&mut self, _target: PointerTarget) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_blur(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }

    fn on_tick(&mut self) -> InteractionResult {
        InteractionResult::ignored()
    }
}
