use crate::core::option::AutocompleteOption;
use crate::widgets::autocomplete::AutocompleteConfig;
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

const BUILTIN_PAGE: &str = include_str!("page.yaml");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read page description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid page description: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("widget `{widget}` references unknown dataset `{dataset}`")]
    UnknownDataset { widget: String, dataset: String },
    #[error("duplicate widget id `{0}`")]
    DuplicateWidget(String),
    #[error("page declares no widgets")]
    Empty,
}

/// How the demo page drives a widget's selection and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetMode {
    /// The widget keeps its own selection.
    #[default]
    Uncontrolled,
    /// The page owns the selection and feeds it back each pass.
    Controlled,
    /// Results are computed by the page after a quiet period.
    Debounced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStyle {
    #[default]
    Default,
    /// `label (value)` with a selected suffix.
    LabelWithValue,
}

fn default_debounce_ms() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetSpec {
    pub id: String,
    pub dataset: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub multiple: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub mode: WidgetMode,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default)]
    pub render: OptionStyle,
}

impl WidgetSpec {
    pub fn widget_config(&self, options: Vec<AutocompleteOption>) -> AutocompleteConfig {
        AutocompleteConfig {
            options,
            multiple: self.multiple,
            disabled: self.disabled,
            loading: false,
            placeholder: self.placeholder.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub datasets: IndexMap<String, Vec<AutocompleteOption>>,
    pub widgets: Vec<WidgetSpec>,
}

impl PageConfig {
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_PAGE)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&source)
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn dataset(&self, spec: &WidgetSpec) -> Result<&[AutocompleteOption], ConfigError> {
        self.datasets
            .get(&spec.dataset)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigError::UnknownDataset {
                widget: spec.id.clone(),
                dataset: spec.dataset.clone(),
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.widgets.is_empty() {
            return Err(ConfigError::Empty);
        }
        let mut seen = HashSet::new();
        for spec in &self.widgets {
            if !seen.insert(spec.id.as_str()) {
                return Err(ConfigError::DuplicateWidget(spec.id.clone()));
            }
            self.dataset(spec)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, OptionStyle, PageConfig, WidgetMode};

    #[test]
    fn builtin_page_describes_four_variants() {
        let page = PageConfig::builtin().expect("builtin page should parse");
        let modes: Vec<WidgetMode> = page.widgets.iter().map(|spec| spec.mode).collect();
        assert_eq!(
            modes,
            vec![
                WidgetMode::Uncontrolled,
                WidgetMode::Uncontrolled,
                WidgetMode::Controlled,
                WidgetMode::Debounced,
            ]
        );
        assert_eq!(page.widgets[2].render, OptionStyle::LabelWithValue);
        assert_eq!(page.widgets[3].debounce_ms, 300);

        let countries = page.dataset(&page.widgets[1]).expect("dataset");
        assert_eq!(countries.len(), 10);
        assert_eq!(countries[8].field_text("name").as_deref(), Some("UK"));
    }

    #[test]
    fn rejects_unknown_dataset() {
        let err = PageConfig::from_yaml(
            r#"
datasets:
  fruits: [Apple]
widgets:
  - id: a
    dataset: vegetables
"#,
        )
        .expect_err("dataset should be missing");
        assert!(matches!(err, ConfigError::UnknownDataset { .. }));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = PageConfig::from_yaml(
            r#"
datasets:
  fruits: [Apple]
widgets:
  - { id: a, dataset: fruits }
  - { id: a, dataset: fruits, multiple: true }
"#,
        )
        .expect_err("ids should clash");
        assert!(matches!(err, ConfigError::DuplicateWidget(id) if id == "a"));
    }

    #[test]
    fn rejects_empty_page_and_bad_yaml() {
        assert!(matches!(
            PageConfig::from_yaml("widgets: []"),
            Err(ConfigError::Empty)
        ));
        assert!(matches!(
            PageConfig::from_yaml("widgets: [ {id: a, dataset: x, colour: red} ]"),
            Err(ConfigError::Parse(_))
        ));
    }
}
