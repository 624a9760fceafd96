//! Shared response types and request tracing.

pub mod messages;
pub mod tracing;

use std::collections::HashMap;

use serde::Serialize;

pub use messages::FlashMessage;

/// Envelope for every page payload. Outcome messages travel next to the data
/// instead of living in a session.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub messages: Vec<FlashMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, Vec<String>>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            messages: Vec::new(),
            errors: None,
        }
    }

    /// A failed submission that still carries `data` so the form can be shown
    /// again with what the user typed.
    pub fn rejected(data: T, messages: Vec<FlashMessage>) -> Self {
        Self {
            success: false,
            data: Some(data),
            messages,
            errors: None,
        }
    }

    pub fn with_errors(mut self, errors: HashMap<String, Vec<String>>) -> Self {
        self.errors = Some(errors);
        self
    }
}
