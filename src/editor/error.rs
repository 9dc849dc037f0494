use thiserror::Error;

use super::ItemField;
use crate::models::Role;

#[derive(Debug, Error)]
pub(crate) enum EditError {
    #[error("{role} role may not {action} budget items")]
    Unauthorized { role: Role, action: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidFieldValue { field: ItemField, reason: String },

    /// The update sink refused the replacement project.
    #[error(transparent)]
    Sink(#[from] anyhow::Error),
}

impl EditError {
    pub(crate) fn invalid(field: ItemField, reason: impl Into<String>) -> Self {
        Self::InvalidFieldValue {
            field,
            reason: reason.into(),
        }
    }
}
