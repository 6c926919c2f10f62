use crate::ui::style::Style;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

impl Span {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    pub fn styled(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Terminal columns occupied by the text.
    pub fn width(&self) -> usize {
        UnicodeWidthStr::width(self.text.as_str())
    }
}

pub type SpanLine = Vec<Span>;

pub fn line_width(line: &[Span]) -> usize {
    line.iter().map(Span::width).sum()
}

pub fn line_text(line: &[Span]) -> String {
    line.iter().map(|span| span.text.as_str()).collect()
}

/// Cuts a line down to `max_width` columns, dropping whole characters.
pub fn truncate_line(line: SpanLine, max_width: usize) -> SpanLine {
    let mut remaining = max_width;
    let mut out = Vec::with_capacity(line.len());
    for span in line {
        if remaining == 0 {
            break;
        }
        let width = span.width();
        if width <= remaining {
            remaining -= width;
            out.push(span);
            continue;
        }
        let mut text = String::new();
        for ch in span.text.chars() {
            let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
            if ch_width > remaining {
                break;
            }
            remaining -= ch_width;
            text.push(ch);
        }
        out.push(Span::styled(text, span.style));
        break;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{Span, line_text, line_width, truncate_line};

    #[test]
    fn width_counts_columns() {
        let line = vec![Span::new("ab"), Span::new("×")];
        assert_eq!(line_width(&line), 3);
    }

    #[test]
    fn truncate_cuts_inside_span() {
        let line = vec![Span::new("Apple"), Span::new(" Banana")];
        let cut = truncate_line(line, 8);
        assert_eq!(line_text(&cut), "Apple Ba");
        assert_eq!(line_width(&cut), 8);
    }
}
