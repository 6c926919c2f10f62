use super::render::OptionRenderer;
use crate::core::filter::FilterPolicy;
use crate::core::option::AutocompleteOption;
use crate::core::selection::Selection;
use crate::core::store::ChangeHandler;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PLACEHOLDER: &str = "Type to begin searching";

pub type InputHandler = Box<dyn FnMut(&str) + Send>;

/// Serializable half of the widget props. Callbacks and overrides are
/// attached through [`AutocompleteProps`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutocompleteConfig {
    pub options: Vec<AutocompleteOption>,
    pub multiple: bool,
    pub disabled: bool,
    pub loading: bool,
    pub placeholder: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

impl AutocompleteConfig {
    pub fn new(options: Vec<AutocompleteOption>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn from_yaml(source: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(source)
    }

    pub fn placeholder_text(&self) -> &str {
        self.placeholder.as_deref().unwrap_or(DEFAULT_PLACEHOLDER)
    }
}

/// Full widget props: the serializable config plus the code-only parts.
///
/// `value` and `on_change` make the widget controlled only when both are
/// present.
#[derive(Default)]
pub struct AutocompleteProps {
    pub config: AutocompleteConfig,
    pub value: Option<Selection>,
    pub on_change: Option<ChangeHandler>,
    pub filter: FilterPolicy,
    pub on_input_change: Option<InputHandler>,
    pub render_option: Option<OptionRenderer>,
}

impl AutocompleteProps {
    pub fn new(options: Vec<AutocompleteOption>) -> Self {
        Self::from(AutocompleteConfig::new(options))
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.config.multiple = multiple;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.config.disabled = disabled;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.config.loading = loading;
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.config.label = Some(label.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.config.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.config.placeholder = Some(placeholder.into());
        self
    }

    pub fn value(mut self, value: Selection) -> Self {
        self.value = Some(value);
        self
    }

    pub fn on_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&Selection) + Send + 'static,
    {
        self.on_change = Some(Box::new(handler));
        self
    }

    pub fn filter(mut self, filter: FilterPolicy) -> Self {
        self.filter = filter;
        self
    }

    pub fn on_input_change<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_input_change = Some(Box::new(handler));
        self
    }

    pub fn render_option(mut self, renderer: OptionRenderer) -> Self {
        self.render_option = Some(renderer);
        self
    }
}

impl From<AutocompleteConfig> for AutocompleteProps {
    fn from(config: AutocompleteConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AutocompleteConfig, DEFAULT_PLACEHOLDER};

    #[test]
    fn parses_yaml_with_defaults() {
        let config = AutocompleteConfig::from_yaml(
            r#"
options:
  - Apple
  - Banana
multiple: true
label: Fruits
"#,
        )
        .expect("config should parse");

        assert_eq!(config.options.len(), 2);
        assert!(config.multiple);
        assert!(!config.disabled);
        assert!(!config.loading);
        assert_eq!(config.label.as_deref(), Some("Fruits"));
        assert_eq!(config.placeholder_text(), DEFAULT_PLACEHOLDER);
    }

    #[test]
    fn parses_record_options() {
        let config = AutocompleteConfig::from_yaml(
            r#"
options:
  - { label: Brazil, name: Brazil, value: br }
"#,
        )
        .expect("config should parse");
        assert_eq!(config.options[0].label(), "Brazil");
        assert_eq!(config.options[0].field_text("value").as_deref(), Some("br"));
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(AutocompleteConfig::from_yaml("options: []\nmultiselect: true\n").is_err());
    }
}
