/// Visibility of the listbox and the highlighted entry.
///
/// `active`, when set, indexes the current filtered list. Callers keep it
/// valid by passing every length change through [`OpenState::reconcile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenState {
    #[default]
    Closed,
    Open {
        active: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Escape,
    OutsidePointer,
    FocusLost,
    Selected,
}

impl OpenState {
    pub fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }

    pub fn active_index(self) -> Option<usize> {
        match self {
            Self::Closed => None,
            Self::Open { active } => active,
        }
    }

    /// Typing opens the list with the first entry highlighted. Clearing the
    /// text drops the highlight and leaves visibility alone.
    pub fn on_input(self, text: &str, len: usize) -> Self {
        let next = if text.is_empty() {
            match self {
                Self::Closed => Self::Closed,
                Self::Open { .. } => Self::Open { active: None },
            }
        } else {
            Self::Open { active: Some(0) }
        };
        next.reconcile(len)
    }

    /// Moves the highlight with wraparound. A closed list opens on the first
    /// (`Next`) or last (`Previous`) entry.
    pub fn navigate(self, direction: NavDirection, len: usize) -> Self {
        if len == 0 {
            return Self::Open { active: None };
        }
        let last = len - 1;
        let active = match (self.active_index(), direction) {
            (None, NavDirection::Next) => 0,
            (None, NavDirection::Previous) => last,
            (Some(index), NavDirection::Next) => {
                if index >= last {
                    0
                } else {
                    index + 1
                }
            }
            (Some(index), NavDirection::Previous) => {
                if index == 0 || index > last {
                    last
                } else {
                    index - 1
                }
            }
        };
        Self::Open {
            active: Some(active),
        }
    }

    pub fn open(self) -> Self {
        match self {
            Self::Closed => Self::Open { active: None },
            open => open,
        }
    }

    pub fn dismiss(self) -> Self {
        Self::Closed
    }

    /// Highlights the first entry of an open list that has none, once the
    /// list is non-empty.
    pub fn restore_highlight(self, len: usize) -> Self {
        match self {
            Self::Open { active: None } if len > 0 => Self::Open { active: Some(0) },
            other => other,
        }
    }

    /// Re-establishes the index invariant after the filtered list changed.
    pub fn reconcile(self, len: usize) -> Self {
        match self {
            Self::Open {
                active: Some(index),
            } if index >= len => Self::Open {
                active: if len == 0 { None } else { Some(0) },
            },
            other => other,
        }
    }
}
