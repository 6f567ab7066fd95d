//! RFC 2047 encoded-word decoding for the subject header.
//!
//! Each `=?charset?B|Q?text?=` word is decoded on its own. Adjacent words
//! are not merged, so the whitespace between them is kept. The charset
//! label is not consulted: decoded bytes are read as UTF-8, and B-encoded
//! bytes that are not UTF-8 fall back to a byte-per-character mapping.

use base64::Engine as _;
use tracing::warn;

use crate::error::{DecodeError, Result};
use crate::parser::header::decode_raw_text;
use crate::parser::transfer::{hex_pair, LENIENT_BASE64};

/// Decode every encoded-word in a header value.
///
/// Example: `"Re: =?UTF-8?Q?Hello_World?="` → `"Re: Hello World"`
///
/// A word that fails to decode is replaced by its raw encoded text; the
/// rest of the value is unaffected. Text outside encoded-words passes
/// through unchanged.
pub fn decode_encoded_words(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut remaining = input;

    while let Some(start) = remaining.find("=?") {
        result.push_str(&remaining[..start]);
        let after_start = &remaining[start + 2..];

        match split_word(after_start) {
            Some(word) => {
                match word.decode() {
                    Ok(text) => result.push_str(&text),
                    Err(e) => {
                        warn!(
                            charset = word.charset,
                            error = %e,
                            "Encoded-word undecodable, keeping raw text"
                        );
                        result.push_str(word.text);
                    }
                }
                remaining = &after_start[word.consumed..];
            }
            None => {
                result.push_str("=?");
                remaining = after_start;
            }
        }
    }

    result.push_str(remaining);
    result
}

struct EncodedWord<'a> {
    charset: &'a str,
    encoding: char,
    text: &'a str,
    consumed: usize, // bytes consumed from the string *after* the initial "=?"
}

impl EncodedWord<'_> {
    fn decode(&self) -> Result<String> {
        match self.encoding {
            'B' | 'b' => {
                let bytes = LENIENT_BASE64.decode(self.text.as_bytes())?;
                Ok(decode_raw_text(&bytes))
            }
            _ => decode_q_encoding(self.text),
        }
    }
}

/// Match `charset?E?text?=` where charset and text are non-empty and E is
/// a single `B` or `Q` (either case).
fn split_word(s: &str) -> Option<EncodedWord<'_>> {
    let first_q = s.find('?')?;
    if first_q == 0 {
        return None;
    }
    let charset = &s[..first_q];

    let rest = &s[first_q + 1..];
    let encoding = match rest.as_bytes() {
        [e @ (b'B' | b'b' | b'Q' | b'q'), b'?', ..] => *e as char,
        _ => return None,
    };

    let rest2 = &rest[2..];
    let end = rest2.find('?')?;
    if end == 0 || !rest2[end..].starts_with("?=") {
        return None;
    }

    Some(EncodedWord {
        charset,
        encoding,
        text: &rest2[..end],
        consumed: first_q + 1 + 2 + end + 2,
    })
}

/// Decode Q-encoding: underscores become spaces, `=XX` becomes a byte.
///
/// The resulting bytes must be valid UTF-8; a malformed escape or an
/// invalid byte sequence fails the whole word.
fn decode_q_encoding(input: &str) -> Result<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' => {
                let byte = match (bytes.get(i + 1), bytes.get(i + 2)) {
                    (Some(&hi), Some(&lo)) => hex_pair(hi, lo),
                    _ => None,
                }
                .ok_or_else(|| DecodeError::Content(format!("bad Q escape in '{input}'")))?;
                out.push(byte);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).map_err(|e| DecodeError::Content(format!("Q word is not UTF-8: {e}")))
}
