use crate::core::option::AutocompleteOption;
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use std::ops::Range;
use std::sync::Arc;
use unicode_width::UnicodeWidthStr;

pub const NO_RESULTS: &str = "No results found.";
pub const MAX_LISTBOX_ROWS: usize = 8;

const CHIP_REMOVE: &str = "×";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRenderState {
    /// Highlighted by keyboard navigation.
    pub active: bool,
    pub selected: bool,
    pub multiple: bool,
}

pub type OptionRenderer = Arc<dyn Fn(&AutocompleteOption, OptionRenderState) -> SpanLine + Send + Sync>;

pub fn default_option_renderer() -> OptionRenderer {
    Arc::new(default_render_option)
}

fn default_render_option(option: &AutocompleteOption, state: OptionRenderState) -> SpanLine {
    let style = row_style(state.active);
    let mut spans = vec![
        Span::styled(if state.active { "❯ " } else { "  " }, style),
        Span::styled(option.label(), style),
    ];
    if state.multiple {
        let marker = if state.selected { " ■" } else { " □" };
        let marker_style = if state.selected {
            style.merge(Style::new().color(Color::Green))
        } else {
            style
        };
        spans.push(Span::styled(marker, marker_style));
    }
    spans
}

/// Renders `label (field)` and appends ` (Selected)` for chosen entries.
pub fn label_with_field_renderer(field: impl Into<String>) -> OptionRenderer {
    let field = field.into();
    Arc::new(move |option, state| {
        let style = row_style(state.active);
        let mut text = match option.field_text(&field) {
            Some(value) => format!("{} ({value})", option.label()),
            None => option.label().to_string(),
        };
        if state.selected {
            text.push_str(" (Selected)");
        }
        vec![Span::styled("  ", style), Span::styled(text, style)]
    })
}

fn row_style(active: bool) -> Style {
    if active {
        Style::new().color(Color::Black).background(Color::Cyan)
    } else {
        Style::new()
    }
}

/// Column span of one chip's remove button within the chip line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipLayout {
    pub index: usize,
    pub remove: Range<u16>,
}

pub fn chip_line(selection: &[AutocompleteOption]) -> (SpanLine, Vec<ChipLayout>) {
    let chip_style = Style::new().background(Color::DarkGrey).color(Color::White);
    let remove_style = chip_style.merge(Style::new().color(Color::Red).bold());

    let mut spans = Vec::new();
    let mut layout = Vec::with_capacity(selection.len());
    let mut col = 0usize;
    for (index, option) in selection.iter().enumerate() {
        let body = format!(" {} ", option.label());
        col += UnicodeWidthStr::width(body.as_str());
        spans.push(Span::styled(body, chip_style));

        let remove_start = col;
        col += UnicodeWidthStr::width(CHIP_REMOVE);
        spans.push(Span::styled(CHIP_REMOVE, remove_style));
        layout.push(ChipLayout {
            index,
            remove: to_col(remove_start)..to_col(col),
        });

        spans.push(Span::styled(" ", chip_style));
        spans.push(Span::new(" "));
        col += 2;
    }
    (spans, layout)
}

fn to_col(col: usize) -> u16 {
    u16::try_from(col).unwrap_or(u16::MAX)
}

/// Slice of the filtered list shown in a panel of `max_rows`, scrolled so
/// the active entry stays visible.
pub fn visible_window(active: Option<usize>, len: usize, max_rows: usize) -> Range<usize> {
    if max_rows == 0 || len == 0 {
        return 0..0;
    }
    if len <= max_rows {
        return 0..len;
    }
    let active = active.unwrap_or(0).min(len - 1);
    let start = if active < max_rows {
        0
    } else {
        active + 1 - max_rows
    };
    start..start + max_rows
}

pub fn no_results_line() -> SpanLine {
    vec![Span::styled(
        format!("  {NO_RESULTS}"),
        Style::new().color(Color::DarkGrey),
    )]
}

#[cfg(test)]
mod tests {
    use super::{
        OptionRenderState, chip_line, default_option_renderer, label_with_field_renderer,
        visible_window,
    };
    use crate::core::option::AutocompleteOption;
    use crate::ui::span::line_text;

    #[test]
    fn default_renderer_marks_active_and_selected() {
        let render = default_option_renderer();
        let line = render(
            &AutocompleteOption::from("Fig"),
            OptionRenderState {
                active: true,
                selected: true,
                multiple: true,
            },
        );
        assert_eq!(line_text(&line), "❯ Fig ■");

        let line = render(
            &AutocompleteOption::from("Fig"),
            OptionRenderState {
                active: false,
                selected: false,
                multiple: false,
            },
        );
        assert_eq!(line_text(&line), "  Fig");
    }

    #[test]
    fn field_renderer_appends_value() {
        let render = label_with_field_renderer("value");
        let option = AutocompleteOption::record("Japan").with_field("value", "jp");
        let line = render(
            &option,
            OptionRenderState {
                active: false,
                selected: true,
                multiple: true,
            },
        );
        assert_eq!(line_text(&line), "  Japan (jp) (Selected)");
    }

    #[test]
    fn chip_layout_tracks_remove_columns() {
        let selection = vec![AutocompleteOption::from("Fig"), AutocompleteOption::from("Date")];
        let (line, layout) = chip_line(&selection);
        assert_eq!(line_text(&line), " Fig ×   Date ×  ");
        assert_eq!(layout[0].remove, 5..6);
        assert_eq!(layout[1].remove, 14..15);
    }

    #[test]
    fn window_follows_active_entry() {
        assert_eq!(visible_window(None, 3, 8), 0..3);
        assert_eq!(visible_window(Some(2), 20, 8), 0..8);
        assert_eq!(visible_window(Some(12), 20, 8), 5..13);
        assert_eq!(visible_window(Some(19), 20, 8), 12..20);
        assert_eq!(visible_window(Some(0), 20, 0), 0..0);
    }
}
