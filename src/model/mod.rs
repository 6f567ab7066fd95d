//! Core data model types for decoded messages.

pub mod email;
