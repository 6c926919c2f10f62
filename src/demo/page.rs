use super::config::{ConfigError, OptionStyle, PageConfig, WidgetMode, WidgetSpec};
use crate::core::filter::{FilterPolicy, substring_filter};
use crate::core::option::AutocompleteOption;
use crate::core::selection::Selection;
use crate::runtime::Debouncer;
use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, PointerPos, TerminalSize};
use crate::ui::span::{Span, SpanLine};
use crate::ui::style::{Color, Style};
use crate::widgets::autocomplete::{Autocomplete, AutocompleteProps, label_with_field_renderer};
use crate::widgets::floating::{FlipPlacement, FloatingService, Rect};
use crate::widgets::traits::{
    Drawable, InteractionResult, Interactive, PointerTarget, RenderContext,
};
use std::ops::Range;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

const DEFAULT_TITLE: &str = "Autocomplete";
const HINT: &str = "Tab next field  Shift+Tab previous  Enter select  Esc close  Ctrl+C quit";
const MAX_CONTROL_WIDTH: u16 = 60;
const CONTROLLED_PREFIX: &str = "Selected values (controlled from parent): ";

/// Page-side state behind one widget.
enum Driver {
    Uncontrolled,
    /// The page owns the selection; the widget only proposes.
    Controlled {
        value: Selection,
        changes: Receiver<Selection>,
    },
    /// The page runs the search once typing pauses.
    Debounced {
        source: Vec<AutocompleteOption>,
        delay: Duration,
        debouncer: Debouncer<String>,
        inputs: Receiver<String>,
    },
}

struct DemoEntry {
    widget: Autocomplete,
    driver: Driver,
}

#[derive(Debug, Clone, Copy)]
struct PanelLayout {
    owner: usize,
    rect: Rect,
}

/// Where things landed on the last render. Pointer routing reads this.
#[derive(Debug, Default)]
struct PageLayout {
    entries: Vec<Range<u16>>,
    panel: Option<PanelLayout>,
}

/// The demo page: the four widget variants stacked vertically, one of them
/// focused, plus the listbox panel of the focused widget when it is open.
pub struct DemoPage {
    title: String,
    entries: Vec<DemoEntry>,
    focus: usize,
    floating: Box<dyn FloatingService>,
    layout: PageLayout,
    should_exit: bool,
}

impl DemoPage {
    pub fn new(config: &PageConfig) -> Result<Self, ConfigError> {
        let entries = config
            .widgets
            .iter()
            .map(|spec| build_entry(config, spec))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::info!(widgets = entries.len(), "demo page mounted");

        Ok(Self {
            title: config
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            entries,
            focus: 0,
            floating: Box::new(FlipPlacement::default()),
            layout: PageLayout::default(),
            should_exit: false,
        })
    }

    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    pub fn widget(&self, id: &str) -> Option<&Autocomplete> {
        self.entries
            .iter()
            .map(|entry| &entry.widget)
            .find(|widget| widget.id() == id)
    }

    pub fn focused_id(&self) -> Option<&str> {
        self.entries.get(self.focus).map(|entry| entry.widget.id())
    }

    pub fn focus_widget(&mut self, id: &str) -> bool {
        match self.entries.iter().position(|entry| entry.widget.id() == id) {
            Some(index) => {
                self.move_focus(index);
                true
            }
            None => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return true;
        }

        let len = self.entries.len();
        let mut result = match key.code {
            KeyCode::Tab if len > 0 => {
                self.move_focus((self.focus + 1) % len);
                InteractionResult::handled()
            }
            KeyCode::BackTab if len > 0 => {
                self.move_focus((self.focus + len - 1) % len);
                InteractionResult::handled()
            }
            _ => match self.entries.get_mut(self.focus) {
                Some(entry) => entry.widget.on_key(key),
                None => InteractionResult::ignored(),
            },
        };
        result.request_render |= self.pump(now);
        result.request_render
    }

    /// Routes a primary-button press using the layout of the last render.
    pub fn handle_click(&mut self, pos: PointerPos, now: Instant) -> bool {
        let mut result = InteractionResult::ignored();

        if let Some(panel) = self.layout.panel
            && panel.rect.contains(pos.col, pos.row)
        {
            let row = usize::from(pos.row - panel.rect.row);
            let entry = &mut self.entries[panel.owner];
            if let Some(index) = entry
                .widget
                .listbox_option_at(row, usize::from(panel.rect.height))
            {
                result.merge(entry.widget.on_pointer(PointerTarget::Option(index)));
            }
            result.request_render |= self.pump(now);
            return result.request_render;
        }

        let mut hit = None;
        for (index, rows) in self.layout.entries.iter().enumerate() {
            if !rows.contains(&pos.row) {
                continue;
            }
            let target = self.entries[index]
                .widget
                .hit_test(pos.col, usize::from(pos.row - rows.start));
            if target != PointerTarget::Outside {
                hit = Some((index, target));
            }
        }

        for index in 0..self.entries.len() {
            if hit.is_some_and(|(hit_index, _)| hit_index == index) {
                continue;
            }
            result.merge(self.entries[index].widget.on_pointer(PointerTarget::Outside));
        }

        if let Some((index, target)) = hit {
            if index != self.focus {
                self.move_focus(index);
                result.merge(InteractionResult::handled());
            }
            result.merge(self.entries[index].widget.on_pointer(target));
        }

        result.request_render |= self.pump(now);
        result.request_render
    }

    /// Advances spinners and delivers due debounced searches.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut result = InteractionResult::ignored();
        for entry in &mut self.entries {
            result.merge(entry.widget.on_tick());
        }
        result.request_render | self.pump(now)
    }

    /// How long the event loop may block before the next debounced search is
    /// due.
    pub fn poll_timeout(&self, now: Instant, default_timeout: Duration) -> Duration {
        self.entries
            .iter()
            .filter_map(|entry| match &entry.driver {
                Driver::Debounced { debouncer, .. } => {
                    Some(debouncer.poll_timeout(now, default_timeout))
                }
                _ => None,
            })
            .min()
            .unwrap_or(default_timeout)
    }

    pub fn has_pending(&self) -> bool {
        self.entries.iter().any(|entry| {
            matches!(&entry.driver, Driver::Debounced { debouncer, .. } if debouncer.is_pending())
        })
    }

    /// Cancels every pending debounced search.
    pub fn teardown(&mut self) {
        for entry in &mut self.entries {
            if let Driver::Debounced { debouncer, .. } = &mut entry.driver
                && debouncer.is_pending()
            {
                tracing::debug!(id = entry.widget.id(), "pending search cancelled");
                debouncer.cancel();
            }
        }
    }

    /// Lays the page out for `size` and returns its lines and the cursor.
    pub fn render(&mut self, size: TerminalSize) -> (Vec<SpanLine>, Option<(u16, u16)>) {
        let width = size.width.min(MAX_CONTROL_WIDTH);
        let mut lines: Vec<SpanLine> = vec![
            vec![Span::styled(self.title.as_str(), Style::new().bold())],
            vec![Span::styled(HINT, Style::new().color(Color::DarkGrey))],
            Vec::new(),
        ];
        let mut layout = PageLayout::default();
        let mut cursor = None;
        let mut anchor = None;

        for (index, entry) in self.entries.iter().enumerate() {
            let focused = index == self.focus;
            let ctx = RenderContext {
                width,
                ..RenderContext::new(size).focused(focused)
            };
            let output = entry.widget.draw(&ctx);
            let start = to_row(lines.len());

            if let Some((col, row)) = output.cursor
                && focused
            {
                cursor = Some((col, start.saturating_add(row)));
            }
            if focused && entry.widget.is_listbox_visible() {
                let control = entry.widget.control_rows();
                let row = start.saturating_add(to_row(control.start));
                anchor = Some(Rect::new(0, row, width, to_row(control.len())));
            }

            lines.extend(output.lines);
            layout.entries.push(start..to_row(lines.len()));
            lines.push(Vec::new());
        }

        if let Some(anchor) = anchor {
            let widget = &self.entries[self.focus].widget;
            let placement =
                self.floating
                    .place(anchor, widget.listbox_content_height(), size);
            let panel = widget.draw_listbox(
                usize::from(placement.rect.height),
                usize::from(placement.rect.width),
            );
            let top = usize::from(placement.rect.row);
            if lines.len() < top + panel.len() {
                lines.resize_with(top + panel.len(), Vec::new);
            }
            for (offset, line) in panel.into_iter().enumerate() {
                lines[top + offset] = line;
            }
            layout.panel = Some(PanelLayout {
                owner: self.focus,
                rect: placement.rect,
            });
        }

        self.layout = layout;
        (lines, cursor)
    }

    /// Applies what the widgets reported since the last pass. Returns whether
    /// anything visible changed.
    fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for entry in &mut self.entries {
            let DemoEntry { widget, driver } = entry;
            match driver {
                Driver::Uncontrolled => {}
                Driver::Controlled { value, changes } => {
                    let Some(next) = changes.try_iter().last() else {
                        continue;
                    };
                    *value = next;
                    widget.sync_value(value.clone());
                    widget.set_description(Some(controlled_description(value)));
                    changed = true;
                }
                Driver::Debounced {
                    source,
                    delay,
                    debouncer,
                    inputs,
                } => {
                    for text in inputs.try_iter() {
                        debouncer.schedule(text, *delay, now);
                        widget.set_loading(true);
                        changed = true;
                    }
                    if let Some(text) = debouncer.poll(now) {
                        let results = substring_filter(source, &text);
                        tracing::debug!(
                            id = widget.id(),
                            query = %text,
                            results = results.len(),
                            "debounced search finished"
                        );
                        widget.set_filter(FilterPolicy::verbatim(results));
                        widget.set_loading(false);
                        changed = true;
                    }
                }
            }
        }
        changed
    }

    fn move_focus(&mut self, index: usize) {
        if index == self.focus {
            return;
        }
        if let Some(entry) = self.entries.get_mut(self.focus) {
            entry.widget.on_blur();
        }
        self.focus = index;
    }
}

impl Drop for DemoPage {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn build_entry(config: &PageConfig, spec: &WidgetSpec) -> Result<DemoEntry, ConfigError> {
    let options = config.dataset(spec)?.to_vec();
    let mut props = AutocompleteProps::from(spec.widget_config(options.clone()));
    if spec.render == OptionStyle::LabelWithValue {
        props = props.render_option(label_with_field_renderer("value"));
    }

    let driver = match spec.mode {
        WidgetMode::Uncontrolled => Driver::Uncontrolled,
        WidgetMode::Controlled => {
            let (tx, changes) = mpsc::channel();
            let value = Selection::empty(spec.multiple);
            props = props
                .value(value.clone())
                .on_change(move |selection: &Selection| {
                    // The page may already be gone during teardown.
                    let _ = tx.send(selection.clone());
                })
                .description(controlled_description(&value));
            Driver::Controlled { value, changes }
        }
        WidgetMode::Debounced => {
            let (tx, inputs) = mpsc::channel();
            props = props
                .filter(FilterPolicy::verbatim(Vec::new()))
                .on_input_change(move |text: &str| {
                    let _ = tx.send(text.to_string());
                });
            Driver::Debounced {
                source: options,
                delay: Duration::from_millis(spec.debounce_ms),
                debouncer: Debouncer::new(),
                inputs,
            }
        }
    };

    Ok(DemoEntry {
        widget: Autocomplete::new(spec.id.clone(), props),
        driver,
    })
}

/// Every value is a single `Selection` after normalization, so a controlled
/// single-select owner still reads its value as a list.
fn controlled_description(value: &Selection) -> String {
    format!("{CONTROLLED_PREFIX}{}", value.labels().join(", "))
}

fn to_row(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::DemoPage;
    use crate::demo::config::PageConfig;
    use crate::terminal::{KeyCode, KeyEvent, KeyModifiers, PointerPos, TerminalSize};
    use crate::ui::span::line_text;
    use std::time::{Duration, Instant};

    const SIZE: TerminalSize = TerminalSize {
        width: 80,
        height: 60,
    };

    fn page() -> DemoPage {
        DemoPage::new(&PageConfig::builtin().expect("builtin page")).expect("page mounts")
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn type_text(page: &mut DemoPage, text: &str, now: Instant) {
        for ch in text.chars() {
            page.handle_key(KeyEvent::plain(KeyCode::Char(ch)), now);
        }
    }

    fn labels(page: &DemoPage, id: &str) -> Vec<String> {
        page.widget(id)
            .expect("widget")
            .filtered_options()
            .iter()
            .map(|option| option.label().to_string())
            .collect()
    }

    #[test]
    fn debounced_results_arrive_after_typing_pauses() {
        let mut page = page();
        assert!(page.focus_widget("debounced"));
        let start = Instant::now();

        for (step, ch) in "cher".chars().enumerate() {
            let now = start + ms(100 * step as u64);
            page.handle_key(KeyEvent::plain(KeyCode::Char(ch)), now);
            page.tick(now);
        }

        let widget = page.widget("debounced").expect("widget");
        assert!(widget.is_loading());
        assert!(widget.filtered_options().is_empty());
        assert!(page.has_pending());
        assert_eq!(page.poll_timeout(start + ms(300), ms(100)), ms(100));
        assert_eq!(page.poll_timeout(start + ms(550), ms(100)), ms(50));

        page.tick(start + ms(599));
        assert!(labels(&page, "debounced").is_empty());

        assert!(page.tick(start + ms(600)));
        assert_eq!(labels(&page, "debounced"), vec!["Cherry"]);
        let widget = page.widget("debounced").expect("widget");
        assert!(!widget.is_loading());
        assert!(widget.is_listbox_visible());
        assert!(!page.has_pending());
    }

    #[test]
    fn enter_selects_first_debounced_result() {
        let mut page = page();
        page.focus_widget("debounced");
        let start = Instant::now();

        type_text(&mut page, "cher", start);
        assert_eq!(page.widget("debounced").expect("widget").active_index(), None);

        page.tick(start + ms(400));
        let widget = page.widget("debounced").expect("widget");
        assert_eq!(widget.active_index(), Some(0));

        page.handle_key(KeyEvent::plain(KeyCode::Enter), start + ms(450));
        let widget = page.widget("debounced").expect("widget");
        assert_eq!(widget.selection().labels(), vec!["Cherry"]);
        assert!(widget.is_open());
    }

    #[test]
    fn controlled_selection_round_trips_through_the_page() {
        let mut page = page();
        page.focus_widget("controlled");
        let now = Instant::now();

        type_text(&mut page, "jap", now);
        page.handle_key(KeyEvent::plain(KeyCode::Enter), now);

        let widget = page.widget("controlled").expect("widget");
        assert!(widget.is_controlled());
        assert_eq!(widget.selection().labels(), vec!["Japan"]);
        assert!(widget.is_open());

        page.handle_key(KeyEvent::plain(KeyCode::Esc), now);
        let (lines, _) = page.render(SIZE);
        let text: Vec<String> = lines.iter().map(|line| line_text(line)).collect();
        assert!(
            text.iter()
                .any(|line| line == "Selected values (controlled from parent): Japan")
        );
    }

    #[test]
    fn tab_moves_focus_and_closes_the_previous_list() {
        let mut page = page();
        let now = Instant::now();

        type_text(&mut page, "a", now);
        assert!(page.widget("sync_single").expect("widget").is_open());

        page.handle_key(KeyEvent::plain(KeyCode::Tab), now);
        assert_eq!(page.focused_id(), Some("sync_multiple"));
        assert!(!page.widget("sync_single").expect("widget").is_open());

        page.handle_key(KeyEvent::plain(KeyCode::BackTab), now);
        page.handle_key(KeyEvent::plain(KeyCode::BackTab), now);
        assert_eq!(page.focused_id(), Some("debounced"));
    }

    #[test]
    fn clicks_route_to_panel_rows_and_outside() {
        let mut page = page();
        let now = Instant::now();

        type_text(&mut page, "an", now);
        page.render(SIZE);
        let panel = page.layout.panel.expect("panel is placed");
        assert_eq!(panel.owner, 0);

        let second = labels(&page, "sync_single")[1].clone();
        page.handle_click(
            PointerPos {
                col: 2,
                row: panel.rect.row + 1,
            },
            now,
        );
        let widget = page.widget("sync_single").expect("widget");
        assert_eq!(widget.selection().labels(), vec![second.as_str()]);
        assert!(!widget.is_open());

        page.handle_key(KeyEvent::plain(KeyCode::Down), now);
        assert!(page.widget("sync_single").expect("widget").is_open());
        page.render(SIZE);
        page.handle_click(PointerPos { col: 0, row: 0 }, now);
        assert!(!page.widget("sync_single").expect("widget").is_open());
    }

    #[test]
    fn clicking_another_widget_moves_focus() {
        let mut page = page();
        let now = Instant::now();
        page.render(SIZE);

        let rows = page.layout.entries[1].clone();
        page.handle_click(
            PointerPos {
                col: 4,
                row: rows.start + 1,
            },
            now,
        );
        assert_eq!(page.focused_id(), Some("sync_multiple"));
        assert!(page.widget("sync_multiple").expect("widget").is_open());
    }

    #[test]
    fn teardown_cancels_pending_searches() {
        let mut page = page();
        page.focus_widget("debounced");
        let start = Instant::now();

        type_text(&mut page, "fig", start);
        assert!(page.has_pending());

        page.teardown();
        assert!(!page.has_pending());
        page.tick(start + ms(1_000));
        assert!(labels(&page, "debounced").is_empty());
    }

    #[test]
    fn ctrl_c_requests_exit() {
        let mut page = page();
        page.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert!(page.should_exit());
    }
}
