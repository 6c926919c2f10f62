pub mod filter;
pub mod navigation;
pub mod option;
pub mod selection;
pub mod store;
