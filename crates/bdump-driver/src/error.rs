use bdump_decoder::DecodeError;
use bdump_wire::{FrameError, WireError};

/// Errors from rendering a single document.
///
/// ```text
/// ┌──────────┬───────────────────────────────────────────┬────────────────┐
/// │ Variant  │ Cause                                     │ Traversal      │
/// ├──────────┼───────────────────────────────────────────┼────────────────┤
/// │ Wire     │ structural walk hit a malformed element   │ skip document  │
/// │ TooDeep  │ containers nested past MAX_NESTING_DEPTH  │ skip document  │
/// │ Json     │ extended JSON could not be serialized     │ skip document  │
/// │ Output   │ the output sink refused a write           │ always fatal   │
/// └──────────┴───────────────────────────────────────────┴────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error(transparent)]
    Wire(#[from] WireError),

    #[error("documents nested more than {limit} levels deep")]
    TooDeep { limit: usize },

    #[error("error converting document to JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] std::io::Error),
}

/// The error that ended a traversal.
///
/// Document indices are 1-based, in stream order.
///
/// ```text
///   DumpError
///   ├── Frame(FrameError)   ← stream framing failed (always terminal)
///   ├── Decode              ← JSON mode, validate on: document failed to decode
///   ├── Render              ← JSON mode, validate on: document failed to render
///   ├── Validate            ← debug mode, validate on: full decode failed
///   ├── Walk                ← debug mode, validate on: structural walk failed
///   └── Output              ← writing to the sink failed (always terminal)
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("unable to dump document {index}: {source}")]
    Decode {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("unable to dump document {index}: {source}")]
    Render {
        index: usize,
        #[source]
        source: DriverError,
    },

    #[error("failed to validate bson during objcheck (document {index}): {source}")]
    Validate {
        index: usize,
        #[source]
        source: DecodeError,
    },

    #[error("encountered error debugging document {index}: {source}")]
    Walk {
        index: usize,
        #[source]
        source: DriverError,
    },

    #[error("cannot write output: {0}")]
    Output(#[source] std::io::Error),
}
