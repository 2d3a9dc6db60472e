use bson::Document;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::DriverError;
use crate::ext_json::ExtJsonMode;

/// Renders decoded documents as extended JSON text.
///
/// Compact output is a single line. Pretty output indents one tab per
/// nesting level and separates keys from values with `": "`:
///
/// ```text
/// {"a":1,"b":{"c":"x"}}        {
///                                 "a": 1,
///                                 "b": {
///                                     "c": "x"
///                                 }
///                              }
/// ```
///
/// Field order follows the document. The trailing newline between
/// documents is the caller's job.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonFormatter {
    ext_json: ExtJsonMode,
}

impl JsonFormatter {
    #[must_use]
    pub fn new(ext_json: ExtJsonMode) -> Self {
        Self { ext_json }
    }

    /// Render `doc` to bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Json`] if serialization fails.
    pub fn format(&self, doc: Document, pretty: bool) -> Result<Vec<u8>, DriverError> {
        let value = self.ext_json.convert(doc);
        if !pretty {
            return Ok(serde_json::to_vec(&value)?);
        }

        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"\t"));
        value.serialize(&mut ser)?;
        Ok(out)
    }
}
