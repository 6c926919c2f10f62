use crate::ui::span::Span;
use crate::ui::style::{Color, Style};

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Loading indicator shown in the control while results are pending.
#[derive(Debug, Clone, Default)]
pub struct Spinner {
    frame: usize,
}

impl Spinner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES.len();
    }

    pub fn glyph(&self) -> char {
        FRAMES[self.frame % FRAMES.len()]
    }

    pub fn span(&self) -> Span {
        Span::styled(self.glyph().to_string(), Style::new().color(Color::Cyan))
    }
}

#[cfg(test)]
mod tests {
    use super::Spinner;

    #[test]
    fn tick_cycles_through_frames() {
        let mut spinner = Spinner::new();
        let first = spinner.glyph();
        spinner.tick();
        assert_ne!(spinner.glyph(), first);
        for _ in 0..9 {
            spinner.tick();
        }
        assert_eq!(spinner.glyph(), first);
    }
}
