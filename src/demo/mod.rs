//! Demo page showing the widget variants side by side.

pub mod config;
pub mod page;

pub use config::{ConfigError, OptionStyle, PageConfig, WidgetMode, WidgetSpec};
pub use page::DemoPage;
