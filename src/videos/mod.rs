//! Video catalog: entry types, submission validation, search and storage.

pub mod search;
pub mod store;
pub mod youtube;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use youtube::{extract_video_id, InvalidUrlError};

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_URL_LENGTH: usize = 400;
pub const MAX_VIDEO_ID_LENGTH: usize = 40;
const SUMMARY_NOTES_LENGTH: usize = 200;

pub const NO_NOTES_MESSAGE: &str = "No notes for this video.";
pub const NO_VIDEOS_MESSAGE: &str = "No videos found.";

const REQUIRED_FIELD: &str = "This field is required.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VideoEntry {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub notes: Option<String>,
    pub video_id: String,
}

impl VideoEntry {
    pub fn notes_display(&self) -> &str {
        match self.notes.as_deref() {
            Some(notes) if !notes.is_empty() => notes,
            _ => NO_NOTES_MESSAGE,
        }
    }
}

impl fmt::Display for VideoEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let notes: String = self
            .notes
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(SUMMARY_NOTES_LENGTH)
            .collect();
        write!(
            f,
            "ID: {}, Name: {}, URL: {}, Video ID: {}, Notes: {}",
            self.id, self.name, self.url, self.video_id, notes
        )
    }
}

/// "1 video:" for exactly one entry, "<n> videos:" for any other count.
pub fn count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} video:")
    } else {
        format!("{count} videos:")
    }
}

/// Heading shown above a list of videos.
pub fn list_summary(count: usize) -> String {
    if count == 0 {
        NO_VIDEOS_MESSAGE.to_string()
    } else {
        count_label(count)
    }
}

/// Raw add-form values, echoed back to the caller when a submission is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug)]
pub enum SubmissionError {
    Malformed(HashMap<String, Vec<String>>),
    InvalidUrl(InvalidUrlError),
}

/// A submission that passed every check. The store only inserts these, so no
/// entry can reach the database with an unvalidated URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVideo {
    name: String,
    url: String,
    notes: Option<String>,
    video_id: String,
}

impl NewVideo {
    pub fn validate(form: &VideoForm) -> Result<Self, SubmissionError> {
        let name = form.name.trim();
        let url = form.url.trim();
        let notes = form
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let mut errors: HashMap<String, Vec<String>> = HashMap::new();
        check_text_field(&mut errors, "name", name, MAX_NAME_LENGTH);
        check_text_field(&mut errors, "url", url, MAX_URL_LENGTH);
        if !errors.is_empty() {
            return Err(SubmissionError::Malformed(errors));
        }

        let video_id = extract_video_id(url).map_err(SubmissionError::InvalidUrl)?;

        if video_id.chars().count() > MAX_VIDEO_ID_LENGTH {
            errors.insert(
                "url".to_string(),
                vec![format!(
                    "Video ID must have at most {MAX_VIDEO_ID_LENGTH} characters."
                )],
            );
            return Err(SubmissionError::Malformed(errors));
        }

        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            notes: notes.map(str::to_string),
            video_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }
}

fn check_text_field(
    errors: &mut HashMap<String, Vec<String>>,
    field: &str,
    value: &str,
    max_length: usize,
) {
    let length = value.chars().count();
    if length == 0 {
        errors
            .entry(field.to_string())
            .or_default()
            .push(REQUIRED_FIELD.to_string());
    } else if length > max_length {
        errors.entry(field.to_string()).or_default().push(format!(
            "Ensure this value has at most {max_length} characters (it has {length})."
        ));
    }
}
