mod config;
mod query;
mod render;

use crate::core::filter::FilterPolicy;
use crate::core::navigation::{DismissReason, NavDirection, OpenState};
use crate::core::option::{AutocompleteOption, is_homogeneous};
use crate::core::selection::{Selection, toggle};
use crate::core::store::{SelectionStore, resolve_store};
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine, line_width, truncate_line};
use crate::ui::spinner::Spinner;
use crate::ui::style::{Color, Style};
use crate::widgets::base::WidgetBase;
use crate::widgets::traits::{
    DrawOutput, Drawable, InteractionResult, Interactive, PointerTarget, RenderContext,
};
use query::QueryInput;
use render::{chip_line, default_option_renderer, no_results_line, visible_window};
use std::ops::Range;

pub use config::{AutocompleteConfig, AutocompleteProps, DEFAULT_PLACEHOLDER, InputHandler};
pub use render::{
    MAX_LISTBOX_ROWS, NO_RESULTS, OptionRenderState, OptionRenderer, label_with_field_renderer,
};

/// Text input with a filterable dropdown of options.
///
/// The widget composes the option filter, the selection store and the
/// open-state machine. It owns no timers: debounced searches are driven by
/// the owner through `on_input_change`, [`Autocomplete::set_filter`] and
/// [`Autocomplete::set_loading`].
pub struct Autocomplete {
    base: WidgetBase,
    options: Vec<AutocompleteOption>,
    filter: FilterPolicy,
    filtered: Vec<AutocompleteOption>,
    store: Box<dyn SelectionStore>,
    multiple: bool,
    disabled: bool,
    loading: bool,
    query: QueryInput,
    state: OpenState,
    placeholder: String,
    description: Option<String>,
    on_input_change: Option<InputHandler>,
    render_option: OptionRenderer,
    spinner: Spinner,
    /// Typed text matched nothing yet; the first result to arrive gets the
    /// highlight.
    highlight_pending: bool,
}

impl Autocomplete {
    pub fn new(id: impl Into<String>, props: AutocompleteProps) -> Self {
        let AutocompleteProps {
            config,
            value,
            on_change,
            filter,
            on_input_change,
            render_option,
        } = props;
        let id = id.into();

        if !is_homogeneous(&config.options) {
            tracing::warn!(id = %id, "autocomplete options mix plain labels and records");
        }

        let placeholder = config.placeholder_text().to_string();
        let mut widget = Self {
            base: WidgetBase::new(id, config.label),
            store: resolve_store(value, on_change, config.multiple),
            options: config.options,
            filter,
            filtered: Vec::new(),
            multiple: config.multiple,
            disabled: config.disabled,
            loading: config.loading,
            query: QueryInput::new(),
            state: OpenState::Closed,
            placeholder,
            description: config.description,
            on_input_change,
            render_option: render_option.unwrap_or_else(default_option_renderer),
            spinner: Spinner::new(),
            highlight_pending: false,
        };
        widget.recompute();
        widget
    }

    pub fn from_config(id: impl Into<String>, config: AutocompleteConfig) -> Self {
        Self::new(id, AutocompleteProps::from(config))
    }

    // --- owner-driven updates ---

    pub fn set_options(&mut self, options: Vec<AutocompleteOption>) {
        self.options = options;
        self.recompute();
        self.restore_pending_highlight();
    }

    pub fn set_filter(&mut self, filter: FilterPolicy) {
        self.filter = filter;
        self.recompute();
        self.restore_pending_highlight();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.set_state(self.state.dismiss());
        }
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Hands the owner's canonical value to a controlled widget. Ignored, with
    /// a warning, when the widget is uncontrolled.
    pub fn sync_value(&mut self, value: Selection) -> bool {
        self.store.sync(value.normalized(self.multiple))
    }

    // --- interaction ---

    /// Replaces the input text as if typed.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.disabled {
            return;
        }
        self.query.set(text);
        self.on_query_changed();
    }

    /// Selects the filtered option at `index`. A stale index is a no-op.
    pub fn activate(&mut self, index: usize) -> bool {
        if self.disabled {
            return false;
        }
        let Some(option) = self.filtered.get(index).cloned() else {
            return false;
        };
        self.select(option);
        true
    }

    /// Chip delete gesture: removes the option from the selection.
    pub fn remove_selected(&mut self, option: &AutocompleteOption) -> bool {
        if self.disabled || !self.store.selection().is_selected(option) {
            return false;
        }
        let next = self.store.selection().remove(option);
        self.store.propose(next);
        true
    }

    pub fn remove_chip(&mut self, index: usize) -> bool {
        let Some(option) = self.store.selection().as_slice().get(index).cloned() else {
            return false;
        };
        self.remove_selected(&option)
    }

    pub fn open(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.set_state(self.state.open());
        true
    }

    pub fn dismiss(&mut self, reason: DismissReason) -> bool {
        if !self.state.is_open() {
            return false;
        }
        tracing::debug!(id = self.base.id(), ?reason, "listbox dismissed");
        self.highlight_pending = false;
        self.set_state(self.state.dismiss());
        true
    }

    pub fn navigate(&mut self, direction: NavDirection) -> bool {
        if self.disabled {
            return false;
        }
        self.highlight_pending = false;
        self.set_state(self.state.navigate(direction, self.filtered.len()));
        true
    }

    // --- state ---

    pub fn input(&self) -> &str {
        self.query.text()
    }

    pub fn options(&self) -> &[AutocompleteOption] {
        &self.options
    }

    pub fn filtered_options(&self) -> &[AutocompleteOption] {
        &self.filtered
    }

    pub fn selection(&self) -> &Selection {
        self.store.selection()
    }

    pub fn is_selected(&self, option: &AutocompleteOption) -> bool {
        self.store.selection().is_selected(option)
    }

    pub fn open_state(&self) -> OpenState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.state.active_index()
    }

    /// Open and not loading.
    pub fn is_listbox_visible(&self) -> bool {
        self.state.is_open() && !self.loading
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_controlled(&self) -> bool {
        self.store.is_controlled()
    }

    // --- layout ---

    fn label_rows(&self) -> usize {
        usize::from(self.base.label().is_some())
    }

    fn has_chips(&self) -> bool {
        self.multiple && !self.store.selection().is_empty()
    }

    /// Rows of the control surface (chips and input) relative to the top of
    /// the widget.
    pub fn control_rows(&self) -> Range<usize> {
        let start = self.label_rows();
        start..start + usize::from(self.has_chips()) + 1
    }

    fn input_row(&self) -> usize {
        self.control_rows().end - 1
    }

    /// Maps a point relative to the widget's top-left corner.
    pub fn hit_test(&self, col: u16, row: usize) -> PointerTarget {
        if !self.control_rows().contains(&row) {
            return PointerTarget::Outside;
        }
        if self.has_chips() && row == self.control_rows().start {
            let (_, layout) = chip_line(self.store.selection().as_slice());
            if let Some(chip) = layout.iter().find(|chip| chip.remove.contains(&col)) {
                return PointerTarget::Chip(chip.index);
            }
        }
        PointerTarget::Control
    }

    /// Rows the listbox would like to occupy.
    pub fn listbox_content_height(&self) -> u16 {
        let rows = self.filtered.len().clamp(1, MAX_LISTBOX_ROWS);
        u16::try_from(rows).unwrap_or(u16::MAX)
    }

    /// Filtered index shown at `row` of a listbox panel with `max_rows` rows.
    pub fn listbox_option_at(&self, row: usize, max_rows: usize) -> Option<usize> {
        let window = visible_window(self.active_index(), self.filtered.len(), max_rows);
        let index = window.start + row;
        window.contains(&index).then_some(index)
    }

    /// Panel lines, padded to `width`. Empty when the listbox is hidden.
    pub fn draw_listbox(&self, max_rows: usize, width: usize) -> Vec<SpanLine> {
        if !self.is_listbox_visible() || max_rows == 0 {
            return Vec::new();
        }
        if self.filtered.is_empty() {
            return vec![pad_line(no_results_line(), width)];
        }

        let active = self.active_index();
        let window = visible_window(active, self.filtered.len(), max_rows);
        self.filtered[window.clone()]
            .iter()
            .zip(window)
            .map(|(option, index)| {
                let state = OptionRenderState {
                    active: active == Some(index),
                    selected: self.is_selected(option),
                    multiple: self.multiple,
                };
                pad_line((self.render_option)(option, state), width)
            })
            .collect()
    }

    // --- internals ---

    fn select(&mut self, option: AutocompleteOption) {
        let next = toggle(self.store.selection(), &option, self.multiple);
        self.store.propose(next);

        if !self.multiple {
            self.query.set(option.label());
            self.recompute();
            self.notify_input();
            self.set_state(self.state.dismiss());
        }
    }

    fn on_query_changed(&mut self) {
        self.recompute();
        self.set_state(self.state.on_input(self.query.text(), self.filtered.len()));
        self.highlight_pending = !self.query.text().is_empty() && self.filtered.is_empty();
        self.notify_input();
    }

    fn restore_pending_highlight(&mut self) {
        if !self.highlight_pending || self.filtered.is_empty() {
            return;
        }
        self.highlight_pending = false;
        self.state = self.state.restore_highlight(self.filtered.len());
    }

    fn notify_input(&mut self) {
        if let Some(handler) = self.on_input_change.as_mut() {
            handler(self.query.text());
        }
    }

    fn recompute(&mut self) {
        self.filtered = self.filter.apply(&self.options, self.query.text());
        self.state = self.state.reconcile(self.filtered.len());
    }

    fn set_state(&mut self, next: OpenState) {
        if next.is_open() != self.state.is_open() {
            tracing::debug!(
                id = self.base.id(),
                open = next.is_open(),
                "listbox visibility changed"
            );
        }
        self.state = next;
    }

    fn edit_query(&mut self, edit: impl FnOnce(&mut QueryInput) -> bool) -> InteractionResult {
        if edit(&mut self.query) {
            self.on_query_changed();
            InteractionResult::handled()
        } else {
            InteractionResult::consumed()
        }
    }

    fn move_cursor(&mut self, step: impl FnOnce(&mut QueryInput) -> bool) -> InteractionResult {
        if step(&mut self.query) {
            InteractionResult::handled()
        } else {
            InteractionResult::consumed()
        }
    }

    fn input_line(&self, focused: bool) -> SpanLine {
        let marker_style = if self.state.is_open() {
            Style::new().color(Color::Cyan).bold()
        } else {
            Style::new().color(Color::DarkGrey)
        };
        let mut spans = vec![
            Span::styled(self.base.focus_marker(focused || self.state.is_open()), marker_style),
            Span::new(" "),
        ];

        if self.query.text().is_empty() {
            spans.push(Span::styled(
                self.placeholder.as_str(),
                Style::new().color(Color::DarkGrey),
            ));
        } else {
            let style = if self.disabled {
                Style::new().dim()
            } else {
                Style::new()
            };
            spans.push(Span::styled(self.query.text(), style));
        }

        if self.loading {
            spans.push(Span::new(" "));
            spans.push(self.spinner.span());
        }
        spans
    }
}

fn pad_line(line: SpanLine, width: usize) -> SpanLine {
    let mut line = truncate_line(line, width);
    let used = line_width(&line);
    if used < width {
        line.push(Span::new(" ".repeat(width - used)));
    }
    line
}

impl Drawable for Autocomplete {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn label(&self) -> &str {
        self.base.label().unwrap_or_default()
    }

    fn draw(&self, ctx: &RenderContext) -> DrawOutput {
        let width = usize::from(ctx.width);
        let mut lines = Vec::<SpanLine>::new();

        if let Some(label) = self.base.label() {
            lines.push(vec![Span::styled(label, Style::new().bold())]);
        }
        if self.has_chips() {
            let (chips, _) = chip_line(self.store.selection().as_slice());
            lines.push(chips);
        }
        lines.push(self.input_line(ctx.focused));
        if let Some(description) = &self.description {
            lines.push(vec![Span::styled(
                description.as_str(),
                Style::new().color(Color::DarkGrey),
            )]);
        }

        let cursor = (ctx.focused && !self.disabled).then(|| {
            let col = 2 + self.query.cursor_width();
            (
                u16::try_from(col.min(width.saturating_sub(1))).unwrap_or(u16::MAX),
                u16::try_from(self.input_row()).unwrap_or(u16::MAX),
            )
        });

        DrawOutput {
            lines: lines
                .into_iter()
                .map(|line| truncate_line(line, width))
                .collect(),
            cursor,
        }
    }
}

impl Interactive for Autocomplete {
    fn on_key(&mut self, key: KeyEvent) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('w') => self.edit_query(QueryInput::delete_word_left),
                _ => InteractionResult::ignored(),
            };
        }

        match key.code {
            KeyCode::Char(ch) if key.modifiers.is_plain() && !ch.is_control() => {
                self.edit_query(|query| {
                    query.insert(ch);
                    true
                })
            }
            KeyCode::Backspace => self.edit_query(QueryInput::backspace),
            KeyCode::Delete => self.edit_query(QueryInput::delete),
            KeyCode::Left => self.move_cursor(QueryInput::move_left),
            KeyCode::Right => self.move_cursor(QueryInput::move_right),
            KeyCode::Home => self.move_cursor(QueryInput::move_home),
            KeyCode::End => self.move_cursor(QueryInput::move_end),
            KeyCode::Down => {
                self.navigate(NavDirection::Next);
                InteractionResult::handled()
            }
            KeyCode::Up => {
                self.navigate(NavDirection::Previous);
                InteractionResult::handled()
            }
            KeyCode::Enter => match self.active_index() {
                Some(index) if self.activate(index) => InteractionResult::handled(),
                _ => InteractionResult::consumed(),
            },
            KeyCode::Esc => {
                if self.dismiss(DismissReason::Escape) {
                    InteractionResult::handled()
                } else {
                    InteractionResult::ignored()
                }
            }
            _ => InteractionResult::ignored(),
        }
    }

    fn on_pointer(&mut self, target: PointerTarget) -> InteractionResult {
        if self.disabled {
            return InteractionResult::ignored();
        }
        let changed = match target {
            PointerTarget::Control => self.open(),
            PointerTarget::Option(index) => self.is_listbox_visible() && self.activate(index),
            PointerTarget::Chip(index) => self.remove_chip(index),
            PointerTarget::Outside => self.dismiss(DismissReason::OutsidePointer),
        };
        if changed {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn on_blur(&mut self) -> InteractionResult {
        if self.dismiss(DismissReason::FocusLost) {
            InteractionResult::handled()
        } else {
            InteractionResult::ignored()
        }
    }

    fn on_tick(&mut self) -> InteractionResult {
        if !self.loading {
            return InteractionResult::ignored();
        }
        self.spinner.tick();
        InteractionResult::handled()
    }
}
