#![no_main]

use std::io::{self, Cursor};

use arbitrary::Arbitrary;
use bdump_driver::{DumpConfig, Dumper, ExtJsonMode, NullSink, OutputMode};
use libfuzzer_sys::fuzz_target;

// Fuzz target: full traversal in every mode over an arbitrary stream.
//
// Decode failures must be skipped (or stop the run under validate),
// never panic, and the document count can never exceed what the input
// could hold.
#[derive(Debug, Arbitrary)]
struct Input<'a> {
    debug: bool,
    validate: bool,
    pretty: bool,
    canonical: bool,
    stream: &'a [u8],
}

fuzz_target!(|input: Input<'_>| {
    let config = DumpConfig {
        mode: if input.debug { OutputMode::Debug } else { OutputMode::Json },
        validate: input.validate,
        pretty: input.pretty,
        max_document_size: 64 * 1024,
        ext_json: if input.canonical { ExtJsonMode::Canonical } else { ExtJsonMode::Relaxed },
    };
    let mut dumper = Dumper::with_diagnostics(config, NullSink);
    let outcome = dumper.run(Cursor::new(input.stream), io::sink());
    assert!(outcome.documents <= input.stream.len() / 5);
});
