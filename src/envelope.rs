//! Uniform `{ success, message, data }` response shape

use serde::Serialize;

use crate::providers::Outcome;

/// Serialized result envelope returned by every HTTP endpoint.
///
/// Only the constructors below can build one, so a failed envelope never
/// carries data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    /// Convert a provider outcome, using `success_message` when it succeeded
    pub fn from_outcome(outcome: Outcome<T>, success_message: impl Into<String>) -> Self {
        match outcome {
            Ok(data) => Self::success(data, success_message),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
