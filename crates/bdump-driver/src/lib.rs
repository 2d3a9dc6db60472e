#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostics;
pub mod dumper;
pub mod error;
pub mod ext_json;
pub mod render_debug;
pub mod render_json;

pub use config::{DumpConfig, OutputMode};
pub use diagnostics::{Diagnostic, DiagnosticSink, MemorySink, NullSink, Severity, TracingSink};
pub use dumper::{DumpOutcome, Dumper};
pub use error::{DriverError, DumpError};
pub use ext_json::ExtJsonMode;
pub use render_debug::{MAX_NESTING_DEPTH, print_debug};
pub use render_json::JsonFormatter;
