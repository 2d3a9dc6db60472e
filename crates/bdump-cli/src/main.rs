/// `bsondump`: print the documents of a raw BSON file as extended JSON, or
/// as a structural type/size trace.
///
/// ```text
/// bsondump [OPTIONS] [FILE]
///
/// Arguments:
///   [FILE]             .bson file to read; stdin when omitted or "-"
///
/// Options:
///   --type <TYPE>      json (default) | debug
///   --objcheck         validate every document; stop at the first bad one
///   --pretty           tab-indented JSON
///   --canonical        canonical instead of relaxed extended JSON
///   -o, --out <PATH>   write output to PATH instead of stdout
///   -v, --verbose      more diagnostics (repeatable)
///   --quiet            no diagnostics at all
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                              |
/// |------|------------------------------------------------------|
/// | 0    | Every document framed, end of stream reached cleanly |
/// | 1    | Bad flags, I/O failure, framing error, or objcheck   |
///
/// Documents go to stdout (or `--out`); diagnostics and the final
/// `N objects found` line go to stderr.
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

mod cmd_dump;

/// Arguments for `bsondump`.
#[derive(Parser)]
#[command(name = "bsondump", version, about = "Dump raw BSON files as JSON or a debug trace")]
pub struct DumpArgs {
    /// Input `.bson` file. Reads stdin when omitted or `-`.
    pub file: Option<PathBuf>,

    /// Output type: `json` or `debug`.
    #[arg(long = "type", value_name = "TYPE", default_value = "json")]
    pub output_type: String,

    /// Validate BSON during processing; the first invalid document ends the run.
    #[arg(long)]
    pub objcheck: bool,

    /// Indent JSON output with tabs.
    #[arg(long)]
    pub pretty: bool,

    /// Emit canonical extended JSON (`{"$numberInt": "1"}`) instead of relaxed.
    #[arg(long)]
    pub canonical: bool,

    /// Write output to this file instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Increase diagnostic verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics, including the final document count.
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Level directive for the stderr subscriber. `RUST_LOG` wins when set.
fn log_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "off",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

fn init_tracing(args: &DumpArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_directive(args.verbose, args.quiet)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let args = DumpArgs::parse();
    init_tracing(&args);

    if let Err(e) = cmd_dump::run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
