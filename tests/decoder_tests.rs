//! Integration tests for end-to-end message decoding and payload shaping.

use std::path::Path;

use maildecode::config::PayloadConfig;
use maildecode::model::email::Envelope;
use maildecode::parser::encoded_word::decode_encoded_words;
use maildecode::parser::html::html_to_text;
use maildecode::parser::{decode_message, decode_message_with, DecoderOptions};
use maildecode::payload::{EmailType, StoragePayload};

fn fixture(name: &str) -> Vec<u8> {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read(&path).unwrap()
}

fn envelope() -> Envelope {
    Envelope::new("alice@example.com", "bob@example.org")
}

// ─── Test 1: Single-part plain text ─────────────────────────────────

#[test]
fn test_plain_message() {
    let email = decode_message(&envelope(), &fixture("plain.eml"));
    assert_eq!(email.subject, "Plain hello");
    assert_eq!(email.text, "Hello");
    assert_eq!(email.html, "");
    assert!(!email.is_multipart);
}

// ─── Test 2: multipart/alternative with encoded parts ───────────────

#[test]
fn test_alternative_message() {
    let email = decode_message(&envelope(), &fixture("alternative.eml"));
    assert_eq!(email.subject, "Café con leña");
    assert_eq!(email.text, "Café is open today.");
    assert_eq!(email.html, "<p>Café is open today.</p>");
    assert!(email.is_multipart);
}

// ─── Test 3: Nested multiparts with HTML only ───────────────────────

#[test]
fn test_nested_html_only_message() {
    let email = decode_message(&envelope(), &fixture("nested.eml"));
    assert_eq!(email.subject, "Nested newsletter");
    assert!(email.is_multipart);
    assert!(email.html.contains("<h1>Weekly</h1>"));
    assert_eq!(email.text, "Weekly News &amp; notes");
}

// ─── Test 4: Nesting limit cuts off deep parts ──────────────────────

#[test]
fn test_nested_message_beyond_depth_limit() {
    let options = DecoderOptions {
        max_nesting_depth: 1,
        ..Default::default()
    };
    let email = decode_message_with(&envelope(), &fixture("nested.eml"), &options);
    assert!(email.is_multipart);
    assert_eq!(email.html, "");
    assert_eq!(email.text, "");
}

// ─── Test 5: Missing boundary degrades quietly ──────────────────────

#[test]
fn test_missing_boundary_message() {
    let email = decode_message(&envelope(), &fixture("no_boundary.eml"));
    assert_eq!(email.subject, "Missing boundary");
    assert!(email.is_multipart);
    assert_eq!(email.text, "");
    assert_eq!(email.html, "");
}

// ─── Test 6: Garbage input never fails ──────────────────────────────

#[test]
fn test_garbage_input() {
    for raw in [
        &b""[..],
        b"\r\n\r\n",
        b"\xff\xfe\x00garbage",
        b"Content-Type: multipart/mixed; boundary=\"\r\n\r\n--\r\n--",
        b"Content-Transfer-Encoding: base64\r\n\r\n%%%%",
    ] {
        let email = decode_message(&envelope(), raw);
        assert_eq!(email.from, "alice@example.com");
    }
}

// ─── Test 7: Envelope carried through unchanged ─────────────────────

#[test]
fn test_envelope_passthrough() {
    let env = Envelope::new("  Odd <x@y>  ", "");
    let email = decode_message(&env, &fixture("plain.eml"));
    assert_eq!(email.from, "  Odd <x@y>  ");
    assert_eq!(email.to, "");
}

// ─── Test 8: Storage payload from a decoded fixture ─────────────────

#[test]
fn test_payload_from_alternative() {
    let email = decode_message(&envelope(), &fixture("alternative.eml"));
    let payload = StoragePayload::build(&email, &PayloadConfig::default());
    assert_eq!(payload.email_info.email_type, EmailType::Multipart);
    assert_eq!(payload.email_info.subject, "Café con leña");
    assert_eq!(payload.email_content.text_length, 19);

    let json = serde_json::to_value(&payload).unwrap();
    assert_eq!(json["emailInfo"]["hasHtml"], true);
    assert_eq!(json["emailContent"]["text"], "Café is open today.");
}

#[test]
fn test_payload_rejects_missing_recipient() {
    let email = decode_message(&Envelope::new("a@b.com", ""), &fixture("plain.eml"));
    assert!(StoragePayload::validate(&email).is_err());
}

// ─── Unit-level properties through the public API ───────────────────

#[test]
fn test_subject_decoding_examples() {
    assert_eq!(decode_encoded_words("=?UTF-8?B?SGVsbG8=?="), "Hello");
    assert_eq!(decode_encoded_words("=?UTF-8?Q?Hello_World?="), "Hello World");
    assert_eq!(decode_encoded_words("Normal subject"), "Normal subject");
}

#[test]
fn test_html_extraction_example() {
    assert_eq!(
        html_to_text("<style>.a{}</style><p>Hi  <b>there</b></p>"),
        "Hi there"
    );
}
