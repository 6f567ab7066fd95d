//! Multipart body splitting with recursive descent into nested multiparts.
//!
//! Parts are classified by a substring search over their lower-cased header
//! block, not by a structured content-type parse. Within one level the last
//! `text/plain` part wins the text slot and the last `text/html` part wins
//! the html slot; nothing is concatenated.

use tracing::{debug, warn};

use crate::error::{DecodeError, Result};
use crate::model::email::{MimePart, ParseResult};
use crate::parser::header::parse_headers;
use crate::parser::transfer::decode_content;

/// Default maximum nesting of multipart parts inside multipart parts.
pub const MAX_DEPTH: usize = 10;

/// How a body part is treated, decided from its raw header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartKind {
    Text,
    Html,
    Multipart,
    Other,
}

impl PartKind {
    pub fn classify(raw_headers: &str) -> Self {
        let lower = raw_headers.to_lowercase();
        if lower.contains("content-type: text/plain") {
            Self::Text
        } else if lower.contains("content-type: text/html") {
            Self::Html
        } else if lower.contains("multipart") {
            Self::Multipart
        } else {
            Self::Other
        }
    }
}

/// Split a multipart body into text and HTML, descending into nested
/// multiparts up to `max_depth` levels below this one.
///
/// A content type without a `boundary` attribute yields an empty result.
/// A subtree nested deeper than `max_depth` contributes nothing.
pub fn split_multipart(body: &str, content_type: &str, max_depth: usize) -> ParseResult {
    walk(body, content_type, 0, max_depth).unwrap_or_else(|e| {
        warn!(error = %e, "Multipart body skipped");
        ParseResult::default()
    })
}

fn walk(body: &str, content_type: &str, depth: usize, max_depth: usize) -> Result<ParseResult> {
    if depth > max_depth {
        return Err(DecodeError::NestingTooDeep(max_depth));
    }

    let mut result = ParseResult::default();

    let Some(boundary) = extract_boundary(content_type) else {
        warn!(depth, "No boundary in multipart content type");
        return Ok(result);
    };
    debug!(boundary, depth, "Splitting multipart body");

    for part in split_parts(body, boundary) {
        match PartKind::classify(part.raw_headers) {
            PartKind::Text => {
                result.text = decode_content(part.content, &part.headers);
                debug!(depth, len = result.text.len(), "Found text/plain part");
            }
            PartKind::Html => {
                result.html = decode_content(part.content, &part.headers);
                debug!(depth, len = result.html.len(), "Found text/html part");
            }
            PartKind::Multipart => {
                let nested_type = part.headers.get("content-type").unwrap_or(part.raw_headers);
                match walk(part.content, nested_type, depth + 1, max_depth) {
                    Ok(nested) => result.absorb(nested),
                    Err(e) => warn!(depth, error = %e, "Nested multipart skipped"),
                }
            }
            PartKind::Other => debug!(depth, "Ignoring non-text part"),
        }
    }

    Ok(result)
}

/// Split a body on `--boundary` into header/content parts.
///
/// Empty segments, the closing `--` marker, and segments without a blank
/// line separating headers from content are skipped.
pub fn split_parts<'a>(body: &'a str, boundary: &str) -> Vec<MimePart<'a>> {
    let delimiter = format!("--{boundary}");

    body.split(delimiter.as_str())
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && *segment != "--")
        .filter_map(|segment| {
            let (raw_headers, content) = segment.split_once("\r\n\r\n")?;
            Some(MimePart {
                raw_headers,
                headers: parse_headers(raw_headers),
                content,
            })
        })
        .collect()
}

/// Extract the `boundary` attribute from a content-type value.
///
/// Matches `boundary=` (or `boundary:`) case-insensitively, with optional
/// whitespace and an optional quote before the token. The token ends at a
/// quote, whitespace, or `;`.
pub fn extract_boundary(content_type: &str) -> Option<&str> {
    let lower = content_type.to_ascii_lowercase();
    let bytes = content_type.as_bytes();
    let mut from = 0;

    while let Some(rel) = lower[from..].find("boundary") {
        let mut i = from + rel + "boundary".len();
        from += rel + 1;

        if !matches!(bytes.get(i), Some(b'=' | b':')) {
            continue;
        }
        i += 1;
        while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
            i += 1;
        }
        if matches!(bytes.get(i), Some(b'"' | b'\'')) {
            i += 1;
        }

        let start = i;
        while bytes
            .get(i)
            .is_some_and(|&b| !matches!(b, b'"' | b'\'' | b';') && !b.is_ascii_whitespace())
        {
            i += 1;
        }
        if i > start {
            return Some(&content_type[start..i]);
        }
    }

    None
}
