/// Errors raised while walking the elements of an already-framed document.
///
/// These never affect the stream position: the frame has been read in full
/// before any element is inspected, so the caller can move on to the next
/// frame after reporting one of these.
///
/// ```text
///   WireError
///   ├── MalformedElement       ← name or value runs past the document end
///   ├── UnknownElementType     ← type tag with no known value width
///   ├── InvalidDocumentLength  ← declared length disagrees with the slice
///   └── MissingTerminator      ← last byte of a document is not 0x00
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// An element's name or value boundary lies outside the enclosing
    /// document body. `offset` is relative to the start of that body.
    #[error("malformed element at offset {offset}: {reason}")]
    MalformedElement { offset: usize, reason: &'static str },

    /// The type tag does not name a BSON type, so the value width is unknown.
    #[error("unknown element type {tag:#04X} for field {name:?} at offset {offset}")]
    UnknownElementType {
        tag: u8,
        name: String,
        offset: usize,
    },

    /// A document's length header is below the minimum or does not match
    /// the number of bytes available for it.
    #[error("invalid document length {declared} (have {actual} bytes)")]
    InvalidDocumentLength { declared: i32, actual: usize },

    /// The final byte of a document is not the 0x00 terminator.
    #[error("document terminator is {found:#04X}, expected 0x00")]
    MissingTerminator { found: u8 },
}

/// Errors raised by the frame reader while pulling documents off a stream.
///
/// Every variant is fatal for a traversal: once the reader has consumed a
/// partial header or body, the position of the next frame is unknown.
///
/// ```text
///   FrameError
///   ├── TruncatedHeader  ← 1-3 bytes of length prefix, then EOF
///   ├── InvalidSize      ← declared length < 5 or > buffer capacity
///   ├── TruncatedBody    ← EOF before `length - 4` body bytes arrived
///   └── Io               ← the underlying reader failed
/// ```
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("invalid bson: truncated document header at offset {offset} ({read} of 4 bytes)")]
    TruncatedHeader { offset: u64, read: usize },

    /// The declared size was rejected before any body byte was read.
    #[error("invalid BSONSize: {size} bytes at offset {offset} (limit {max})")]
    InvalidSize { size: i32, max: usize, offset: u64 },

    #[error(
        "invalid bson: truncated document at offset {offset} ({read} of {declared} bytes)"
    )]
    TruncatedBody {
        offset: u64,
        declared: usize,
        read: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Offsets in FrameError are absolute stream positions of the frame's first
// header byte. Offsets in WireError are relative to the document body being
// walked, since the walker only ever sees a slice.
