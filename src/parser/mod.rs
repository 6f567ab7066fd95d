//! Raw message decoding: header folding, encoded-words, multipart splitting,
//! transfer decoding, and HTML-to-text fallback.

pub mod encoded_word;
pub mod header;
pub mod html;
pub mod message;
pub mod multipart;
pub mod transfer;

pub use message::{decode_message, decode_message_with, DecoderOptions};
