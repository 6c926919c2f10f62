use crate::core::option::AutocompleteOption;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("filter failed: {message}")]
pub struct FilterError {
    message: String,
}

impl FilterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub type FilterFn = Arc<
    dyn Fn(&[AutocompleteOption], &str) -> Result<Vec<AutocompleteOption>, FilterError>
        + Send
        + Sync,
>;

/// How the visible subset is derived from the option set and input text.
#[derive(Clone, Default)]
pub enum FilterPolicy {
    /// Case-insensitive substring match on the option label.
    #[default]
    Substring,
    /// Caller-supplied replacement. Its output is used as-is.
    Custom(FilterFn),
}

impl FilterPolicy {
    pub fn custom<F>(filter: F) -> Self
    where
        F: Fn(&[AutocompleteOption], &str) -> Result<Vec<AutocompleteOption>, FilterError>
            + Send
            + Sync
            + 'static,
    {
        Self::Custom(Arc::new(filter))
    }

    /// Ignores the input and always yields `results`. Used to inject result
    /// sets computed elsewhere, e.g. after a debounced search resolves.
    pub fn verbatim(results: Vec<AutocompleteOption>) -> Self {
        Self::custom(move |_, _| Ok(results.clone()))
    }

    pub fn try_apply(
        &self,
        options: &[AutocompleteOption],
        query: &str,
    ) -> Result<Vec<AutocompleteOption>, FilterError> {
        match self {
            Self::Substring => Ok(substring_filter(options, query)),
            Self::Custom(filter) => filter(options, query),
        }
    }

    /// A failing override yields no matches instead of an error.
    pub fn apply(&self, options: &[AutocompleteOption], query: &str) -> Vec<AutocompleteOption> {
        match self.try_apply(options, query) {
            Ok(matches) => matches,
            Err(err) => {
                tracing::warn!(error = %err, query, "filter override failed; showing no results");
                Vec::new()
            }
        }
    }
}

impl fmt::Debug for FilterPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Substring => f.write_str("Substring"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

pub fn substring_filter(options: &[AutocompleteOption], query: &str) -> Vec<AutocompleteOption> {
    if query.is_empty() {
        return options.to_vec();
    }
    let needle = query.to_lowercase();
    options
        .iter()
        .filter(|option| option.label().to_lowercase().contains(needle.as_str()))
        .cloned()
        .collect()
}
