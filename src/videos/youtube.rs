//! Validation of YouTube watch URLs and extraction of the `v` identifier.
//!
//! Checks run in a fixed order and the first failure is reported, so every
//! rejection can be traced to exactly one rule.

use std::fmt;

use axum::http::Uri;

const REQUIRED_SCHEME: &str = "https://";
const REQUIRED_AUTHORITY: &str = "www.youtube.com";
const REQUIRED_PATH: &str = "/watch";
const VIDEO_ID_KEY: &str = "v";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidUrlReason {
    Unparseable,
    Scheme,
    Host,
    Path,
    EmptyQuery,
    MalformedQuery,
    MissingVideoId,
    EmptyVideoId,
}

impl fmt::Display for InvalidUrlReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InvalidUrlReason::Unparseable => "not a URL",
            InvalidUrlReason::Scheme => "scheme must be https",
            InvalidUrlReason::Host => "host must be www.youtube.com",
            InvalidUrlReason::Path => "path must be /watch",
            InvalidUrlReason::EmptyQuery => "missing query string",
            InvalidUrlReason::MalformedQuery => "malformed query string",
            InvalidUrlReason::MissingVideoId => "missing v parameter",
            InvalidUrlReason::EmptyVideoId => "empty v parameter",
        };
        f.write_str(text)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid YouTube URL {url} ({reason})")]
pub struct InvalidUrlError {
    pub url: String,
    pub reason: InvalidUrlReason,
}

impl InvalidUrlError {
    fn new(url: &str, reason: InvalidUrlReason) -> Self {
        Self {
            url: url.to_string(),
            reason,
        }
    }
}

pub fn extract_video_id(url: &str) -> Result<String, InvalidUrlError> {
    let reject = |reason| InvalidUrlError::new(url, reason);

    let uri: Uri = url.parse().map_err(|_| reject(InvalidUrlReason::Unparseable))?;

    // `Uri` lowercases well-known schemes, so compare against the raw text.
    if uri.scheme_str().is_none() || !url.starts_with(REQUIRED_SCHEME) {
        return Err(reject(InvalidUrlReason::Scheme));
    }

    if uri.authority().map(|a| a.as_str()) != Some(REQUIRED_AUTHORITY) {
        return Err(reject(InvalidUrlReason::Host));
    }

    if uri.path() != REQUIRED_PATH {
        return Err(reject(InvalidUrlReason::Path));
    }

    let query = match uri.query() {
        Some(q) if !q.is_empty() => q,
        _ => return Err(reject(InvalidUrlReason::EmptyQuery)),
    };

    let pairs = parse_query_strict(query).ok_or_else(|| reject(InvalidUrlReason::MalformedQuery))?;

    let video_id = pairs
        .into_iter()
        .find(|(key, _)| key == VIDEO_ID_KEY)
        .map(|(_, value)| value)
        .ok_or_else(|| reject(InvalidUrlReason::MissingVideoId))?;

    if video_id.is_empty() {
        return Err(reject(InvalidUrlReason::EmptyVideoId));
    }

    Ok(video_id)
}

/// Splits `query` into decoded key/value pairs, returning `None` when any pair is
/// empty, lacks `=`, contains a bad percent escape, or decodes to invalid UTF-8.
fn parse_query_strict(query: &str) -> Option<Vec<(String, String)>> {
    query
        .split('&')
        .map(|pair| {
            if !has_valid_escapes(pair) {
                return None;
            }
            let (key, value) = pair.split_once('=')?;
            Some((decode_component(key)?, decode_component(value)?))
        })
        .collect()
}

fn decode_component(text: &str) -> Option<String> {
    urlencoding::decode(&text.replace('+', " "))
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn has_valid_escapes(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let escape = bytes.get(i + 1..i + 3);
            match escape {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}
