//! Top-level views

pub mod chat;
