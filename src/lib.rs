//! `maildecode` — best-effort decoding of raw inbound email.
//!
//! This crate turns the unparsed bytes of a delivered message into a
//! [`model::email::DecodedEmail`] (decoded subject, plain text, HTML) and
//! shapes it into the JSON record handed to a storage service.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod payload;
