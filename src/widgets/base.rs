/// Identity shared by every widget: a stable id and an optional label.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    id: String,
    label: Option<String>,
}

impl WidgetBase {
    pub fn new(id: impl Into<String>, label: Option<String>) -> Self {
        Self {
            id: id.into(),
            label: label.filter(|label| !label.is_empty()),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn focus_marker(&self, focused: bool) -> &'static str {
        if focused { "›" } else { " " }
    }
}
