use crate::core::option::AutocompleteOption;
use serde::{Deserialize, Serialize};

/// Current choice of a widget.
///
/// `Multiple` never holds two entries with the same label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Multiple(Vec<AutocompleteOption>),
    Single(Option<AutocompleteOption>),
}

impl Selection {
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Self::Multiple(Vec::new())
        } else {
            Self::Single(None)
        }
    }

    pub fn single(option: impl Into<AutocompleteOption>) -> Self {
        Self::Single(Some(option.into()))
    }

    /// Builds a multi selection, keeping the first entry for each label.
    pub fn multiple<I>(options: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<AutocompleteOption>,
    {
        let mut entries: Vec<AutocompleteOption> = Vec::new();
        for option in options.into_iter().map(Into::into) {
            if !entries.contains(&option) {
                entries.push(option);
            }
        }
        Self::Multiple(entries)
    }

    pub fn as_slice(&self) -> &[AutocompleteOption] {
        match self {
            Self::Single(Some(option)) => std::slice::from_ref(option),
            Self::Single(None) => &[],
            Self::Multiple(options) => options.as_slice(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.as_slice().iter().map(AutocompleteOption::label).collect()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    pub fn is_selected(&self, option: &AutocompleteOption) -> bool {
        match self {
            Self::Single(current) => current
                .as_ref()
                .is_some_and(|current| current.label() == option.label()),
            Self::Multiple(current) => current.iter().any(|entry| entry.label() == option.label()),
        }
    }

    /// Coerces to the storage shape of the given mode. A lone value becomes a
    /// one-element list; a list keeps only its first entry.
    pub fn normalized(self, multiple: bool) -> Self {
        match (self, multiple) {
            (Self::Single(option), true) => Self::Multiple(option.into_iter().collect()),
            (Self::Multiple(options), true) => Self::multiple(options),
            (Self::Multiple(options), false) => Self::Single(options.into_iter().next()),
            (single @ Self::Single(_), false) => single,
        }
    }

    pub fn toggle(&self, option: &AutocompleteOption, multiple: bool) -> Self {
        toggle(self, option, multiple)
    }

    /// The chip delete gesture: drops `option` in either mode.
    pub fn remove(&self, option: &AutocompleteOption) -> Self {
        match self {
            Self::Single(Some(current)) if current.label() == option.label() => Self::Single(None),
            Self::Single(current) => Self::Single(current.clone()),
            Self::Multiple(current) => Self::Multiple(
                current
                    .iter()
                    .filter(|entry| entry.label() != option.label())
                    .cloned()
                    .collect(),
            ),
        }
    }
}

/// Single mode replaces the selection with `option`. Multiple mode removes
/// `option` when already present and appends it otherwise.
pub fn toggle(current: &Selection, option: &AutocompleteOption, multiple: bool) -> Selection {
    if !multiple {
        return Selection::Single(Some(option.clone()));
    }

    let previous = current.as_slice();
    if current.is_selected(option) {
        Selection::Multiple(
            previous
                .iter()
                .filter(|entry| entry.label() != option.label())
                .cloned()
                .collect(),
        )
    } else {
        let mut next = previous.to_vec();
        next.push(option.clone());
        Selection::Multiple(next)
    }
}

pub fn is_selected(selection: &Selection, option: &AutocompleteOption) -> bool {
    selection.is_selected(option)
}
