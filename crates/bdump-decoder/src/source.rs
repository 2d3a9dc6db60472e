use bdump_wire::{ElementIter, FrameError, RawDocSource};
use bson::Document;

use crate::error::DecodeError;

/// Deepest container nesting a document may have and still be decoded.
/// The top-level document is depth 0.
pub const MAX_DECODE_DEPTH: usize = 256;

/// Fully decode one framed document.
///
/// Duplicate field names collapse the way `bson::Document` inserts them:
/// the last value wins and keeps the position of the first occurrence.
///
/// # Errors
///
/// - [`DecodeError::TooDeep`] if containers nest past [`MAX_DECODE_DEPTH`].
///   Such a document is rejected before `bson` sees it.
/// - [`DecodeError::Malformed`] if the bytes are not a valid document.
pub fn decode_document(bytes: &[u8]) -> Result<Document, DecodeError> {
    check_depth(bytes)?;
    let mut reader = bytes;
    Document::from_reader(&mut reader).map_err(|source| DecodeError::Malformed {
        size: bytes.len(),
        source,
    })
}

/// Walk the container tree with an explicit stack of iterators.
///
/// Only nesting is checked here. A structural error ends the walk of that
/// level and is left for the full decode to report.
fn check_depth(bytes: &[u8]) -> Result<(), DecodeError> {
    let Ok(root) = ElementIter::over_document(bytes) else {
        return Ok(());
    };
    let mut levels = vec![root];

    while let Some(level) = levels.last_mut() {
        match level.next() {
            Some(Ok(element)) => {
                let Some(nested) = element.nested() else {
                    continue;
                };
                // The nested document sits at depth `levels.len()`.
                if levels.len() > MAX_DECODE_DEPTH {
                    return Err(DecodeError::TooDeep {
                        size: bytes.len(),
                        limit: MAX_DECODE_DEPTH,
                    });
                }
                if let Ok(inner) = ElementIter::over_document(nested) {
                    levels.push(inner);
                }
            }
            Some(Err(_)) | None => {
                levels.pop();
            }
        }
    }
    Ok(())
}

/// Decode a document only to prove that it decodes.
///
/// # Errors
///
/// Same as [`decode_document`].
pub fn validate_document(bytes: &[u8]) -> Result<(), DecodeError> {
    decode_document(bytes).map(drop)
}

/// Iterator of decoded documents layered over a raw frame source.
///
/// ```text
///   RawDocSource ──load_next_into(buf)──▶ bytes ──decode──▶ Document
///        │                                                     │
///        └─ err(): framing failure, ends the stream            └─ Err(DecodeError):
///                                                                 this document only
/// ```
///
/// Items are `Ok(document)` or `Err(DecodeError)`. A decode error is
/// per-document: calling `next` again reads the following frame. The
/// iterator ends on a clean end of stream or a framing error; check
/// [`err`](Self::err) afterwards to tell the two apart.
///
/// The source owns one reusable buffer sized to the largest accepted
/// document. It is allocated once, when the source is built.
pub struct DecodedSource<S> {
    source: S,
    buf: Vec<u8>,
    done: bool,
}

impl<S: RawDocSource> DecodedSource<S> {
    /// Wrap `source`, accepting documents of at most `max_document_size` bytes.
    pub fn with_capacity(source: S, max_document_size: usize) -> Self {
        Self::with_buffer(source, vec![0u8; max_document_size])
    }

    /// Wrap `source` around a caller-provided buffer. Its length is the
    /// largest document size that will be accepted.
    pub fn with_buffer(source: S, buf: Vec<u8>) -> Self {
        Self {
            source,
            buf,
            done: false,
        }
    }

    /// The framing error that ended iteration, if any.
    pub fn err(&self) -> Option<&FrameError> {
        self.source.err()
    }

    pub fn take_err(&mut self) -> Option<FrameError> {
        self.source.take_err()
    }

    /// Hand back the frame source and the buffer, e.g. to reuse the buffer
    /// for another stream.
    pub fn into_parts(self) -> (S, Vec<u8>) {
        (self.source, self.buf)
    }
}

impl<S: RawDocSource> Iterator for DecodedSource<S> {
    type Item = Result<Document, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(size) = self.source.load_next_into(&mut self.buf) else {
            self.done = true;
            return None;
        };
        Some(decode_document(&self.buf[..size]))
    }
}
