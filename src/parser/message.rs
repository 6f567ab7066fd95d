//! End-to-end decoding of one raw inbound message.

use std::borrow::Cow;

use tracing::{debug, info, warn};

use crate::error::{DecodeError, Result};
use crate::model::email::{DecodedEmail, Envelope, ParseResult};
use crate::parser::encoded_word::decode_encoded_words;
use crate::parser::header::{decode_raw_text, parse_headers, HeaderMap};
use crate::parser::html::html_to_text;
use crate::parser::multipart::{split_multipart, MAX_DEPTH};
use crate::parser::transfer::decode_content;

/// Engine limits and input handling switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderOptions {
    /// Deepest multipart nesting that is still descended into.
    pub max_nesting_depth: usize,
    /// Raw messages larger than this decode to an empty body.
    pub max_message_size: usize,
    /// Rewrite bare-LF input to CRLF before splitting.
    pub normalize_line_endings: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: MAX_DEPTH,
            max_message_size: 25 * 1024 * 1024, // 25 MB
            normalize_line_endings: true,
        }
    }
}

/// Decode a raw message with default options.
pub fn decode_message(envelope: &Envelope, raw: &[u8]) -> DecodedEmail {
    decode_message_with(envelope, raw, &DecoderOptions::default())
}

/// Decode a raw message into a [`DecodedEmail`].
///
/// Never fails. If body decoding hits an error, the record keeps the
/// envelope and subject but has empty text/html and `is_multipart = false`.
pub fn decode_message_with(
    envelope: &Envelope,
    raw: &[u8],
    options: &DecoderOptions,
) -> DecodedEmail {
    let decoded = decode_raw_text(raw);
    let text = if options.normalize_line_endings {
        normalize_line_endings(&decoded)
    } else {
        Cow::Borrowed(decoded.as_str())
    };

    let (header_block, body) = split_message(&text);
    let headers = parse_headers(header_block);
    let subject = decode_encoded_words(headers.get_or_empty("subject"));

    let mut email = DecodedEmail {
        from: envelope.from.clone(),
        to: envelope.to.clone(),
        subject,
        ..Default::default()
    };

    match decode_body(&headers, body, raw.len(), options) {
        Ok((content, is_multipart)) => {
            email.text = content.text;
            email.html = content.html;
            email.is_multipart = is_multipart;
        }
        Err(e) => {
            warn!(from = %email.from, to = %email.to, error = %e, "Body decoding failed, storing empty body");
        }
    }

    info!(
        from = %email.from,
        to = %email.to,
        subject = %email.subject,
        multipart = email.is_multipart,
        text_len = email.text.len(),
        html_len = email.html.len(),
        "Decoded message"
    );
    email
}

/// Decode the body branch and apply the HTML-to-text fallback.
fn decode_body(
    headers: &HeaderMap,
    body: &str,
    raw_len: usize,
    options: &DecoderOptions,
) -> Result<(ParseResult, bool)> {
    if raw_len > options.max_message_size {
        return Err(DecodeError::MessageTooLarge {
            size: raw_len,
            limit: options.max_message_size,
        });
    }

    let content_type = headers.get_or_empty("content-type");
    let is_multipart = content_type.contains("multipart");
    debug!(content_type, is_multipart, "Top-level content type");

    let mut content = if is_multipart {
        split_multipart(body, content_type, options.max_nesting_depth)
    } else {
        ParseResult {
            text: decode_content(body, headers),
            html: String::new(),
        }
    };

    if content.text.is_empty() && !content.html.is_empty() {
        content.text = html_to_text(&content.html);
        debug!(len = content.text.len(), "Derived text from HTML");
    }

    Ok((content, is_multipart))
}

/// Split a message at the first blank line into header block and body.
///
/// A message with no blank line is all headers.
pub fn split_message(text: &str) -> (&str, &str) {
    text.split_once("\r\n\r\n").unwrap_or((text, ""))
}

/// Rewrite bare `\n` line endings to `\r\n` when the input has no CRLF at all.
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") || !text.contains('\n') {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.replace('\n', "\r\n"))
    }
}
