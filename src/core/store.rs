use crate::core::selection::Selection;

pub type ChangeHandler = Box<dyn FnMut(&Selection) + Send>;

/// Where a widget's selection lives.
///
/// Chosen once when the widget is built. Uncontrolled storage owns and
/// mutates the value. Controlled storage only mirrors the value its owner
/// last supplied and forwards proposals to the owner's change handler.
pub trait SelectionStore: Send {
    fn selection(&self) -> &Selection;

    /// Requests `next` as the new selection. Controlled storage does not
    /// apply it; the owner must call [`SelectionStore::sync`] on its next pass.
    fn propose(&mut self, next: Selection);

    /// Receives the owner's canonical value. Returns `false` when the store
    /// is not controlled and the value was ignored.
    fn sync(&mut self, value: Selection) -> bool;

    fn is_controlled(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct InternalSelection {
    selection: Selection,
}

impl InternalSelection {
    pub fn new(selection: Selection) -> Self {
        Self { selection }
    }
}

impl SelectionStore for InternalSelection {
    fn selection(&self) -> &Selection {
        &self.selection
    }

    fn propose(&mut self, next: Selection) {
        tracing::debug!(selection = ?next.labels(), "selection updated");
        self.selection = next;
    }

    fn sync(&mut self, _value: Selection) -> bool {
        tracing::warn!("value supplied to an uncontrolled autocomplete; ignoring");
        false
    }

    fn is_controlled(&self) -> bool {
        false
    }
}

pub struct ExternalSelection {
    value: Selection,
    on_change: ChangeHandler,
}

impl ExternalSelection {
    pub fn new(value: Selection, on_change: ChangeHandler) -> Self {
        Self { value, on_change }
    }
}

impl SelectionStore for ExternalSelection {
    fn selection(&self) -> &Selection {
        &self.value
    }

    fn propose(&mut self, next: Selection) {
        tracing::debug!(selection = ?next.labels(), "selection change requested");
        (self.on_change)(&next);
    }

    fn sync(&mut self, value: Selection) -> bool {
        self.value = value;
        true
    }

    fn is_controlled(&self) -> bool {
        true
    }
}

/// Picks the storage strategy. Controlled storage needs both the value and
/// the change handler; supplying only one falls back to internal storage.
pub fn resolve_store(
    value: Option<Selection>,
    on_change: Option<ChangeHandler>,
    multiple: bool,
) -> Box<dyn SelectionStore> {
    match (value, on_change) {
        (Some(value), Some(on_change)) => {
            Box::new(ExternalSelection::new(value.normalized(multiple), on_change))
        }
        (None, None) => Box::new(InternalSelection::new(Selection::empty(multiple))),
        (Some(_), None) => {
            tracing::warn!(
                "autocomplete received `value` without `on_change`; falling back to uncontrolled selection"
            );
            Box::new(InternalSelection::new(Selection::empty(multiple)))
        }
        (None, Some(_)) => {
            tracing::warn!(
                "autocomplete received `on_change` without `value`; falling back to uncontrolled selection"
            );
            Box::new(InternalSelection::new(Selection::empty(multiple)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeHandler, resolve_store};
    use crate::core::selection::Selection;
    use std::sync::{Arc, Mutex};

    fn recording_handler() -> (ChangeHandler, Arc<Mutex<Vec<Selection>>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let handler: ChangeHandler = Box::new(move |selection| {
            sink.lock().expect("lock").push(selection.clone());
        });
        (handler, calls)
    }

    #[test]
    fn uncontrolled_store_applies_proposals() {
        let mut store = resolve_store(None, None, true);
        assert!(!store.is_controlled());

        store.propose(Selection::multiple(["Fig"]));
        assert_eq!(store.selection(), &Selection::multiple(["Fig"]));
        assert!(!store.sync(Selection::multiple(["Date"])));
        assert_eq!(store.selection(), &Selection::multiple(["Fig"]));
    }

    #[test]
    fn controlled_store_only_calls_handler() {
        let (handler, calls) = recording_handler();
        let mut store = resolve_store(Some(Selection::multiple(["Fig"])), Some(handler), true);
        assert!(store.is_controlled());

        store.propose(Selection::multiple(["Fig", "Date"]));
        assert_eq!(store.selection(), &Selection::multiple(["Fig"]));
        assert_eq!(
            calls.lock().expect("lock").as_slice(),
            &[Selection::multiple(["Fig", "Date"])]
        );

        assert!(store.sync(Selection::multiple(["Fig", "Date"])));
        assert_eq!(store.selection(), &Selection::multiple(["Fig", "Date"]));
    }

    #[test]
    fn half_controlled_props_fall_back_to_internal_state() {
        let store = resolve_store(Some(Selection::single("Fig")), None, false);
        assert!(!store.is_controlled());
        assert!(store.selection().is_empty());

        let (handler, calls) = recording_handler();
        let mut store = resolve_store(None, Some(handler), false);
        assert!(!store.is_controlled());
        store.propose(Selection::single("Date"));
        assert_eq!(store.selection(), &Selection::single("Date"));
        assert!(calls.lock().expect("lock").is_empty());
    }

    #[test]
    fn controlled_value_is_normalized_to_mode() {
        let (handler, _calls) = recording_handler();
        let store = resolve_store(Some(Selection::single("Fig")), Some(handler), true);
        assert_eq!(store.selection(), &Selection::multiple(["Fig"]));
    }
}
