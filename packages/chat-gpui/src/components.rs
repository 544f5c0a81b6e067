//! Building blocks of the chat widget

pub mod bubble;
pub mod composer;
pub mod media;
pub mod text;
