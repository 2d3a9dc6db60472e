#![warn(clippy::pedantic)]

pub mod error;
pub mod source;

pub use bson::Document;
pub use error::DecodeError;
pub use source::{DecodedSource, MAX_DECODE_DEPTH, decode_document, validate_document};
