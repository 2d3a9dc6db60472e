use std::io::{Read, Write};
use std::mem;

use bdump_decoder::{DecodedSource, validate_document};
use bdump_wire::{FrameReader, RawDocSource};

use crate::config::{DumpConfig, OutputMode};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::{DriverError, DumpError};
use crate::render_debug::print_debug;
use crate::render_json::JsonFormatter;

/// How a traversal ended.
///
/// `documents` counts every framed document that was reached, including
/// one that failed to decode. `error` is the condition that stopped the
/// traversal early, `None` on a clean end of stream.
#[derive(Debug)]
pub struct DumpOutcome {
    pub documents: usize,
    pub error: Option<DumpError>,
}

impl DumpOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The document count, or the terminal error.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the traversal, if any.
    pub fn into_result(self) -> Result<usize, DumpError> {
        match self.error {
            None => Ok(self.documents),
            Some(e) => Err(e),
        }
    }
}

/// Streams concatenated documents from a reader to a writer.
///
/// ```text
///   Json:   FrameReader ──▶ DecodedSource ──▶ JsonFormatter ──▶ out
///   Debug:  FrameReader ──▶ [validate_document] ──▶ print_debug ──▶ out
/// ```
///
/// One dumper owns one reusable frame buffer of `max_document_size` bytes,
/// allocated at construction and reused by every [`run`](Self::run).
/// Streams processed in parallel each need their own dumper.
///
/// Documents that cannot be rendered are reported to the diagnostics sink
/// and skipped, unless [`DumpConfig::validate`] is set, in which case the
/// first such document ends the run.
pub struct Dumper<D = TracingSink> {
    config: DumpConfig,
    diagnostics: D,
    buf: Vec<u8>,
    formatter: JsonFormatter,
}

impl Dumper<TracingSink> {
    /// A dumper that reports through `tracing`.
    #[must_use]
    pub fn new(config: DumpConfig) -> Self {
        Self::with_diagnostics(config, TracingSink)
    }
}

impl<D: DiagnosticSink> Dumper<D> {
    pub fn with_diagnostics(config: DumpConfig, diagnostics: D) -> Self {
        let buf = vec![0u8; config.max_document_size];
        let formatter = JsonFormatter::new(config.ext_json);
        Self {
            config,
            diagnostics,
            buf,
            formatter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DumpConfig {
        &self.config
    }

    #[must_use]
    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }

    /// Dump every document in `input` to `out` in the configured mode.
    ///
    /// `out` is flushed before returning unless writing already failed.
    pub fn run<R: Read, W: Write>(&mut self, input: R, mut out: W) -> DumpOutcome {
        let mut outcome = match self.config.mode {
            OutputMode::Json => self.dump_json(input, &mut out),
            OutputMode::Debug => self.dump_debug(input, &mut out),
        };

        let write_failed = matches!(outcome.error, Some(DumpError::Output(_)));
        if !write_failed {
            let flushed = out.flush();
            if outcome.error.is_none() {
                outcome.error = flushed.err().map(DumpError::Output);
            }
        }

        self.diagnostics.debug(&format!(
            "{} documents processed, {}",
            outcome.documents,
            if outcome.is_success() { "clean end of stream" } else { "stopped on error" }
        ));
        outcome
    }

    fn dump_json<R: Read, W: Write>(&mut self, input: R, out: &mut W) -> DumpOutcome {
        let pretty = self.config.pretty;
        let mut docs =
            DecodedSource::with_buffer(FrameReader::new(input), mem::take(&mut self.buf));
        let mut documents = 0;
        let mut error = None;

        for item in docs.by_ref() {
            documents += 1;
            let index = documents;

            let rendered = item
                .map_err(|source| DumpError::Decode { index, source })
                .and_then(|doc| {
                    self.formatter
                        .format(doc, pretty)
                        .map_err(|source| DumpError::Render { index, source })
                });

            let bytes = match rendered {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.diagnostics.warn(&e.to_string());
                    if self.config.validate {
                        error = Some(e);
                        break;
                    }
                    continue;
                }
            };

            if let Err(e) = out.write_all(&bytes).and_then(|()| out.write_all(b"\n")) {
                error = Some(DumpError::Output(e));
                break;
            }
        }

        if error.is_none() {
            error = docs.take_err().map(DumpError::Frame);
        }
        let (_, buf) = docs.into_parts();
        self.buf = buf;

        DumpOutcome { documents, error }
    }

    fn dump_debug<R: Read, W: Write>(&mut self, input: R, out: &mut W) -> DumpOutcome {
        let mut frames = FrameReader::new(input);
        let mut documents = 0;
        let mut error = None;

        while let Some(size) = frames.load_next_into(&mut self.buf) {
            documents += 1;
            let raw = &self.buf[..size];

            if self.config.validate {
                if let Err(source) = validate_document(raw) {
                    error = Some(DumpError::Validate {
                        index: documents,
                        source,
                    });
                    break;
                }
            }

            match print_debug(raw, 0, out) {
                Ok(()) => {}
                Err(DriverError::Output(e)) => {
                    error = Some(DumpError::Output(e));
                    break;
                }
                Err(source) => {
                    self.diagnostics.warn(&format!(
                        "encountered error debugging BSON data (document {documents}): {source}"
                    ));
                    if self.config.validate {
                        error = Some(DumpError::Walk {
                            index: documents,
                            source,
                        });
                        break;
                    }
                }
            }
        }

        if error.is_none() {
            error = frames.take_err().map(DumpError::Frame);
        }

        DumpOutcome { documents, error }
    }
}
