//! JSON record handed to the storage service for one decoded message.
//!
//! Building the payload never changes the [`DecodedEmail`]; whether the
//! storage call later succeeds has no bearing on the decode result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PayloadConfig;
use crate::model::email::DecodedEmail;

const UNKNOWN_SENDER: &str = "unknown sender";
const UNKNOWN_RECIPIENT: &str = "unknown recipient";
const NO_SUBJECT: &str = "(no subject)";

/// Coarse body shape reported to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailType {
    Text,
    Html,
    Multipart,
}

impl EmailType {
    pub fn of(email: &DecodedEmail) -> Self {
        if email.is_multipart && email.has_html() && email.has_text() {
            Self::Multipart
        } else if email.has_html() {
            Self::Html
        } else {
            Self::Text
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailInfo {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub date: DateTime<Utc>,
    pub message_id: String,
    pub has_html: bool,
    pub has_text: bool,
    #[serde(rename = "type")]
    pub email_type: EmailType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailContent {
    pub html: String,
    pub text: String,
    pub html_length: usize,
    pub text_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerInfo {
    pub version: String,
    pub source: String,
}

/// The full storage record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoragePayload {
    pub email_info: EmailInfo,
    pub email_content: EmailContent,
    /// Always `null`: attachments are not extracted.
    pub attachment: Option<serde_json::Value>,
    /// Always empty: no DMARC processing.
    pub dmarc_records: Vec<serde_json::Value>,
    pub processed_at: DateTime<Utc>,
    pub worker_info: WorkerInfo,
}

/// Why a payload must not be sent.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PayloadError {
    #[error("envelope sender is missing")]
    MissingSender,
    #[error("envelope recipient is missing")]
    MissingRecipient,
}

impl StoragePayload {
    /// Build the record for a decoded message at the current time.
    pub fn build(email: &DecodedEmail, config: &PayloadConfig) -> Self {
        Self::build_at(email, config, Utc::now())
    }

    pub fn build_at(email: &DecodedEmail, config: &PayloadConfig, now: DateTime<Utc>) -> Self {
        let subject = sanitize_subject(&email.subject, config.subject_max_chars);

        Self {
            email_info: EmailInfo {
                from: or_placeholder(&email.from, UNKNOWN_SENDER),
                to: or_placeholder(&email.to, UNKNOWN_RECIPIENT),
                subject,
                date: now,
                message_id: generate_message_id(now, &config.message_id_domain),
                has_html: email.has_html(),
                has_text: email.has_text(),
                email_type: EmailType::of(email),
            },
            email_content: EmailContent {
                html: email.html.clone(),
                text: email.text.clone(),
                html_length: email.html.chars().count(),
                text_length: email.text.chars().count(),
            },
            attachment: None,
            dmarc_records: Vec::new(),
            processed_at: now,
            worker_info: WorkerInfo {
                version: env!("CARGO_PKG_VERSION").to_string(),
                source: config.source.clone(),
            },
        }
    }

    /// Refuse records whose envelope was incomplete.
    pub fn validate(email: &DecodedEmail) -> Result<(), PayloadError> {
        if email.from.trim().is_empty() {
            return Err(PayloadError::MissingSender);
        }
        if email.to.trim().is_empty() {
            return Err(PayloadError::MissingRecipient);
        }
        Ok(())
    }
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

/// Clean a subject for storage.
///
/// Drops C0/C1 control characters, turns U+FFFD into `?`, trims, and caps
/// the length at `max_chars` characters followed by `...`.
pub fn sanitize_subject(subject: &str, max_chars: usize) -> String {
    let cleaned: String = subject
        .chars()
        .filter(|c| !matches!(*c as u32, 0x00..=0x1F | 0x7F..=0x9F))
        .map(|c| if c == '\u{FFFD}' { '?' } else { c })
        .collect();
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return NO_SUBJECT.to_string();
    }
    if cleaned.chars().count() > max_chars {
        let mut truncated: String = cleaned.chars().take(max_chars).collect();
        truncated.push_str("...");
        return truncated;
    }
    cleaned.to_string()
}

/// `<unix-millis>-<random>@<domain>`
fn generate_message_id(now: DateTime<Utc>, domain: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}@{domain}", now.timestamp_millis(), &random[..13])
}
