#![warn(clippy::pedantic)]

pub mod element;
pub mod element_type;
pub mod error;
pub mod frame_reader;

pub use element::{ElementIter, RawElement, document_body};
pub use element_type::ElementType;
pub use error::{FrameError, WireError};
pub use frame_reader::{FrameReader, MAX_BSON_SIZE, MIN_DOCUMENT_SIZE, RawDocSource};
