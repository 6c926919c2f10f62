use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A selectable entry: either a bare label or a labeled record.
///
/// Equality and hashing only look at the resolved label. Two records that
/// share a label but differ in their other fields compare equal, so a
/// dataset with duplicate labels cannot tell those entries apart.
///
/// An option list is expected to be homogeneous (all plain or all records).
/// Mixing the two kinds is a caller contract violation; label comparison
/// still works but rendering overrides may see shapes they don't expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AutocompleteOption {
    Plain(String),
    Record(OptionRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionRecord {
    pub label: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Plain,
    Record,
}

impl AutocompleteOption {
    pub fn plain(label: impl Into<String>) -> Self {
        Self::Plain(label.into())
    }

    pub fn record(label: impl Into<String>) -> Self {
        Self::Record(OptionRecord {
            label: label.into(),
            fields: IndexMap::new(),
        })
    }

    /// Adds an extra field. Plain options are promoted to records.
    pub fn with_field(self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        let mut record = match self {
            Self::Plain(label) => OptionRecord {
                label,
                fields: IndexMap::new(),
            },
            Self::Record(record) => record,
        };
        record.fields.insert(key.into(), value.into());
        Self::Record(record)
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Plain(label) => label.as_str(),
            Self::Record(record) => record.label.as_str(),
        }
    }

    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Plain(_) => OptionKind::Plain,
            Self::Record(_) => OptionKind::Record,
        }
    }

    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        match self {
            Self::Plain(_) => None,
            Self::Record(record) => record.fields.get(key),
        }
    }

    /// Extra field rendered as display text: strings verbatim, everything
    /// else through its JSON form.
    pub fn field_text(&self, key: &str) -> Option<String> {
        self.field(key).map(|value| match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }
}

pub fn label_of(option: &AutocompleteOption) -> &str {
    option.label()
}

pub fn same_option(a: &AutocompleteOption, b: &AutocompleteOption) -> bool {
    a.label() == b.label()
}

/// Returns `false` when plain and record options are mixed.
pub fn is_homogeneous(options: &[AutocompleteOption]) -> bool {
    let mut kinds = options.iter().map(AutocompleteOption::kind);
    match kinds.next() {
        Some(first) => kinds.all(|kind| kind == first),
        None => true,
    }
}

impl PartialEq for AutocompleteOption {
    fn eq(&self, other: &Self) -> bool {
        same_option(self, other)
    }
}

impl Eq for AutocompleteOption {}

impl Hash for AutocompleteOption {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label().hash(state);
    }
}

impl fmt::Display for AutocompleteOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for AutocompleteOption {
    fn from(value: &str) -> Self {
        Self::plain(value)
    }
}

impl From<String> for AutocompleteOption {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{AutocompleteOption, OptionKind, is_homogeneous, label_of, same_option};

    #[test]
    fn label_resolves_for_both_shapes() {
        let plain = AutocompleteOption::plain("Apple");
        let record = AutocompleteOption::record("Brazil").with_field("value", "br");

        assert_eq!(label_of(&plain), "Apple");
        assert_eq!(label_of(&record), "Brazil");
        assert_eq!(record.field_text("value").as_deref(), Some("br"));
        assert_eq!(plain.field("value"), None);
    }

    #[test]
    fn equality_ignores_extra_fields() {
        let a = AutocompleteOption::record("Georgia").with_field("value", "ge");
        let b = AutocompleteOption::record("Georgia").with_field("value", "us-ga");
        let plain = AutocompleteOption::plain("Georgia");

        assert!(same_option(&a, &b));
        assert_eq!(a, plain);
        assert_ne!(a, AutocompleteOption::plain("georgia"));
    }

    #[test]
    fn with_field_promotes_plain_option() {
        let option = AutocompleteOption::plain("Fig").with_field("color", "purple");
        assert_eq!(option.kind(), OptionKind::Record);
        assert_eq!(option.label(), "Fig");
    }

    #[test]
    fn deserializes_strings_and_records() {
        let parsed: Vec<AutocompleteOption> = serde_json::from_str(
            r#"["Apple", {"label": "Canada", "name": "Canada", "value": "ca"}]"#,
        )
        .expect("options should parse");

        assert_eq!(parsed[0].kind(), OptionKind::Plain);
        assert_eq!(parsed[1].kind(), OptionKind::Record);
        assert_eq!(parsed[1].field_text("value").as_deref(), Some("ca"));
        assert!(!is_homogeneous(&parsed));
    }

    #[test]
    fn record_fields_keep_insertion_order() {
        let parsed: AutocompleteOption =
            serde_json::from_str(r#"{"label": "India", "name": "India", "value": "in"}"#)
                .expect("record should parse");
        let AutocompleteOption::Record(record) = parsed else {
            panic!("expected a record option");
        };
        let keys: Vec<&str> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["name", "value"]);
    }
}
