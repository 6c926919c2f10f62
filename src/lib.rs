pub mod core;
pub mod demo;
pub mod runtime;
pub mod terminal;
pub mod ui;
pub mod widgets;

pub use crate::core::filter::{FilterError, FilterPolicy};
pub use crate::core::navigation::{DismissReason, NavDirection, OpenState};
pub use crate::core::option::{AutocompleteOption, OptionRecord, label_of, same_option};
pub use crate::core::selection::{Selection, is_selected, toggle};
pub use crate::core::store::{ChangeHandler, SelectionStore};
pub use crate::runtime::Debouncer;
pub use crate::widgets::autocomplete::{
    Autocomplete, AutocompleteConfig, AutocompleteProps, OptionRenderState, OptionRenderer,
};
pub use crate::widgets::floating::{FlipPlacement, FloatingService, Placement, Rect};
