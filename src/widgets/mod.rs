pub mod autocomplete;
pub mod base;
pub mod floating;
pub mod traits;

pub use autocomplete::{Autocomplete, AutocompleteConfig, AutocompleteProps};
