use bdump_wire::MAX_BSON_SIZE;

use crate::ext_json::ExtJsonMode;

/// Configuration for a [`Dumper`](crate::Dumper).
///
/// ```text
/// ┌───────────────────┬───────────────────────────────────────────────┐
/// │ Field             │ Purpose                                       │
/// ├───────────────────┼───────────────────────────────────────────────┤
/// │ mode              │ JSON text or structural debug trace           │
/// │ validate          │ full decode check; any failure ends the run   │
/// │ pretty            │ tab-indented JSON (JSON mode only)            │
/// │ max_document_size │ reusable buffer size = largest accepted frame │
/// │ ext_json          │ relaxed or canonical extended JSON            │
/// └───────────────────┴───────────────────────────────────────────────┘
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DumpConfig {
    pub mode: OutputMode,

    /// Treat any document that fails to decode as fatal for the whole run.
    /// In debug mode this also fully decodes every document before its
    /// structural walk.
    pub validate: bool,

    pub pretty: bool,

    /// Frames declaring more bytes than this are rejected before their body
    /// is read. This is also the size of the buffer allocated per dumper.
    pub max_document_size: usize,

    pub ext_json: ExtJsonMode,
}

impl Default for DumpConfig {
    /// JSON mode, no validation, compact output, [`MAX_BSON_SIZE`] limit,
    /// relaxed extended JSON.
    fn default() -> Self {
        Self {
            mode: OutputMode::Json,
            validate: false,
            pretty: false,
            max_document_size: MAX_BSON_SIZE,
            ext_json: ExtJsonMode::default(),
        }
    }
}

/// What the dumper writes for each document.
///
/// ```text
/// ┌───────┬───────────────────────────────────────────────────────┐
/// │ Mode  │ Output                                                │
/// ├───────┼───────────────────────────────────────────────────────┤
/// │ Json  │ one extended-JSON document per line (or indented)     │
/// │ Debug │ per-field name / type tag / byte size, nested indents │
/// └───────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Json,
    Debug,
}
