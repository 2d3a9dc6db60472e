/// Errors from the semantic decode of a single, correctly framed document.
///
/// A `DecodeError` never says anything about the stream: the frame was read
/// in full before decoding started, so the next frame can still be read.
/// Framing failures are reported separately as
/// [`FrameError`](bdump_wire::FrameError) through
/// [`DecodedSource::err`](crate::DecodedSource::err).
///
/// ```text
///   DecodeError
///   ├── Malformed  ← bson rejected the bytes (bad length, bad UTF-8,
///   │                unknown element type, truncated field, ...)
///   └── TooDeep    ← containers nested past MAX_DECODE_DEPTH; never
///                    handed to bson
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid document ({size} bytes): {source}")]
    Malformed {
        size: usize,
        #[source]
        source: bson::de::Error,
    },

    #[error("invalid document ({size} bytes): nested more than {limit} levels deep")]
    TooDeep { size: usize, limit: usize },
}
