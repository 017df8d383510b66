//! State the admin screens render besides the records themselves.

use std::fmt;

/// Which form, if any, is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Modal {
    #[default]
    Closed,
    Creating,
    Editing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Warning,
    Error,
}

/// A dismissible message shown above the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn warning(message: impl Into<String>) -> Self {
        Status {
            level: StatusLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Status {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// True while any remote call is unresolved.
    pub loading: bool,
    pub modal: Modal,
    pub status: Option<Status>,
}

impl UiState {
    pub fn is_modal_open(&self) -> bool {
        self.modal != Modal::Closed
    }

    /// Id of the record being edited, if the edit form is open.
    pub fn editing(&self) -> Option<&str> {
        match &self.modal {
            Modal::Editing(id) => Some(id),
            _ => None,
        }
    }
}
