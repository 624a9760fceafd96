use serde::Serialize;

pub const INVALID_URL: &str = "Invalid YouTube URL";
pub const DUPLICATE_VIDEO: &str = "You already added that video.";
pub const INVALID_ENTRY: &str = "Invalid entry: Please double check information entered in the form.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            text: text.into(),
        }
    }
}
