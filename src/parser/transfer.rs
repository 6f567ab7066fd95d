//! Content-Transfer-Encoding decoding for body fragments.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use tracing::warn;

use crate::error::Result;
use crate::parser::header::{decode_raw_text, HeaderMap};

/// Base64 engine that accepts missing padding and non-zero trailing bits,
/// as mail clients in the wild produce both.
pub(crate) const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Transfer encodings the decoder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    QuotedPrintable,
    Base64,
    /// `7bit`, `8bit`, `binary`, or absent: passed through.
    Identity,
}

impl TransferEncoding {
    /// Classify a `Content-Transfer-Encoding` value by substring.
    pub fn from_header(value: &str) -> Self {
        let value = value.to_lowercase();
        if value.contains("quoted-printable") {
            Self::QuotedPrintable
        } else if value.contains("base64") {
            Self::Base64
        } else {
            Self::Identity
        }
    }
}

/// Decode a content fragment according to its part's transfer encoding.
///
/// The result is trimmed. Decoding never fails: an undecodable base64
/// fragment is returned as-is.
pub fn decode_content(content: &str, headers: &HeaderMap) -> String {
    let encoding =
        TransferEncoding::from_header(headers.get_or_empty("content-transfer-encoding"));
    decode_with(content, encoding).trim().to_string()
}

fn decode_with(content: &str, encoding: TransferEncoding) -> String {
    match encoding {
        TransferEncoding::QuotedPrintable => decode_quoted_printable(content),
        TransferEncoding::Base64 => match decode_base64(content) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, len = content.len(), "Base64 body undecodable, keeping raw");
                content.to_string()
            }
        },
        TransferEncoding::Identity => content.to_string(),
    }
}

/// Decode quoted-printable: drop soft line breaks, expand `=XX` escapes.
///
/// An `=` not followed by two hex digits is kept literally. Each run of
/// consecutive escapes is decoded on its own (UTF-8, else Windows-1252);
/// the characters between runs are copied through untouched.
pub fn decode_quoted_printable(input: &str) -> String {
    let unfolded = input.replace("=\r\n", "");
    let bytes = unfolded.as_bytes();
    let mut out = String::with_capacity(unfolded.len());
    let mut run: Vec<u8> = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let escaped = if bytes[i] == b'=' && i + 2 < bytes.len() {
            hex_pair(bytes[i + 1], bytes[i + 2])
        } else {
            None
        };
        match escaped {
            Some(byte) => {
                if run.is_empty() {
                    out.push_str(&unfolded[literal_start..i]);
                }
                run.push(byte);
                i += 3;
                literal_start = i;
            }
            None => {
                if !run.is_empty() {
                    out.push_str(&decode_raw_text(&run));
                    run.clear();
                }
                i += 1;
            }
        }
    }
    if !run.is_empty() {
        out.push_str(&decode_raw_text(&run));
    }
    out.push_str(&unfolded[literal_start..]);
    out
}

/// Strip all whitespace and base64-decode.
pub fn decode_base64(input: &str) -> Result<String> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = LENIENT_BASE64.decode(compact.as_bytes())?;
    Ok(decode_raw_text(&bytes))
}

/// Value of two ASCII hex digits, either case.
pub(crate) fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
