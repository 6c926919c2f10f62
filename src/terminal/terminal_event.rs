use crate::terminal::{KeyEvent, PointerPos};

#[derive(Debug, Clone, Copy)]
pub enum TerminalEvent {
    Key(KeyEvent),
    /// Primary button pressed.
    Click(PointerPos),
    Resize { width: u16, height: u16 },
}
