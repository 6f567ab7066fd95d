//! Decoded email types produced by the pipeline.

use serde::{Deserialize, Serialize};

use crate::parser::header::HeaderMap;

/// Envelope addresses supplied by the delivering collaborator.
///
/// Carried through to the [`DecodedEmail`] untouched; never parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub from: String,
    pub to: String,
}

impl Envelope {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// One body part found while splitting a multipart body.
///
/// Transient: consumed immediately into a [`ParseResult`].
#[derive(Debug, Clone)]
pub struct MimePart<'a> {
    /// The unparsed header block, kept for substring classification.
    pub raw_headers: &'a str,
    /// Parsed headers of this part.
    pub headers: HeaderMap,
    /// Undecoded content following the blank line.
    pub content: &'a str,
}

/// Text and HTML accumulated while walking a multipart tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    pub text: String,
    pub html: String,
}

impl ParseResult {
    /// Take the non-empty slots of a nested result.
    ///
    /// An empty nested slot never clears a value already found here.
    pub fn absorb(&mut self, nested: ParseResult) {
        if !nested.text.is_empty() {
            self.text = nested.text;
        }
        if !nested.html.is_empty() {
            self.html = nested.html;
        }
    }
}

/// Final decoded record for one inbound message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEmail {
    /// Envelope sender, as delivered.
    pub from: String,
    /// Envelope recipient, as delivered.
    pub to: String,
    /// Subject with RFC 2047 encoded-words resolved.
    pub subject: String,
    /// Plain-text body (from a `text/plain` part, or stripped from HTML).
    pub text: String,
    /// HTML body, if any.
    pub html: String,
    /// Whether the top-level content type declared `multipart`.
    pub is_multipart: bool,
}

impl DecodedEmail {
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_html(&self) -> bool {
        !self.html.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_overrides_empty_slots() {
        let mut parent = ParseResult {
            text: String::new(),
            html: "<p>outer</p>".to_string(),
        };
        parent.absorb(ParseResult {
            text: "inner".to_string(),
            html: String::new(),
        });
        assert_eq!(parent.text, "inner");
        assert_eq!(parent.html, "<p>outer</p>");
    }

    #[test]
    fn test_absorb_replaces_found_values() {
        let mut parent = ParseResult {
            text: "first".to_string(),
            html: String::new(),
        };
        parent.absorb(ParseResult {
            text: "second".to_string(),
            html: String::new(),
        });
        assert_eq!(parent.text, "second");
    }

    #[test]
    fn test_decoded_email_serializes_camel_case() {
        let email = DecodedEmail {
            is_multipart: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&email).expect("serialize");
        assert!(json.contains("\"isMultipart\":true"));
    }
}
