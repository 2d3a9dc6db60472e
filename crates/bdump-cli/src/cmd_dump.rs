/// Implementation of `bsondump`.
///
/// Opens the input (file or stdin) and the output (file or stdout), builds a
/// [`DumpConfig`] from the flags and hands both streams to a [`Dumper`].
/// Per-document problems are logged by the dumper as they happen; this
/// module only reports the final count and turns a terminal error into the
/// process result.
///
/// ```text
/// ┌────────────┬──────────────────────────────────────────────────────────┐
/// │ Flag       │ DumpConfig                                               │
/// ├────────────┼──────────────────────────────────────────────────────────┤
/// │ --type     │ mode: json → OutputMode::Json, debug → OutputMode::Debug │
/// │ --objcheck │ validate = true                                          │
/// │ --pretty   │ pretty = true (ignored in debug mode)                    │
/// │ --canonical│ ext_json = ExtJsonMode::Canonical                        │
/// └────────────┴──────────────────────────────────────────────────────────┘
/// ```
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use bdump_driver::{DumpConfig, Dumper, ExtJsonMode, OutputMode};

use crate::DumpArgs;

/// Run the dump described by `args`.
///
/// # Errors
///
/// Returns an error if a flag value is unrecognised, the input or output
/// cannot be opened, or the traversal ended on a terminal error.
pub fn run(args: &DumpArgs) -> Result<()> {
    let config = build_config(args)?;
    if config.pretty && config.mode == OutputMode::Debug {
        tracing::debug!("--pretty has no effect with --type=debug");
    }

    let (input, source) = open_input(args.file.as_deref())?;
    let output = open_output(args.out.as_deref())?;

    let mut dumper = Dumper::new(config);
    let outcome = dumper.run(input, output);

    tracing::info!("{} objects found", outcome.documents);
    outcome
        .into_result()
        .with_context(|| format!("failed to dump {source}"))?;
    Ok(())
}

fn build_config(args: &DumpArgs) -> Result<DumpConfig> {
    Ok(DumpConfig {
        mode: parse_output_mode(&args.output_type)?,
        validate: args.objcheck,
        pretty: args.pretty,
        ext_json: if args.canonical {
            ExtJsonMode::Canonical
        } else {
            ExtJsonMode::Relaxed
        },
        ..DumpConfig::default()
    })
}

/// The input stream plus a name for it in error messages.
fn open_input(path: Option<&Path>) -> Result<(Box<dyn Read>, String)> {
    match path {
        None => Ok((Box::new(io::stdin().lock()), "stdin".to_string())),
        Some(p) if p.as_os_str() == "-" => Ok((Box::new(io::stdin().lock()), "stdin".to_string())),
        Some(p) => {
            let file = File::open(p).with_context(|| format!("cannot open {}", p.display()))?;
            Ok((Box::new(BufReader::new(file)), p.display().to_string()))
        }
    }
}

fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>> {
    let sink: Box<dyn Write> = match path {
        None => Box::new(io::stdout().lock()),
        Some(p) => {
            let file = File::create(p).with_context(|| format!("cannot create {}", p.display()))?;
            Box::new(file)
        }
    };
    Ok(BufWriter::new(sink))
}

// ── Flag parsers ──────────────────────────────────────────────────────────────

/// Parses the `--type` string to an [`OutputMode`].
///
/// # Errors
///
/// Returns an error for unrecognised type names.
fn parse_output_mode(s: &str) -> Result<OutputMode> {
    match s.to_lowercase().as_str() {
        "json" => Ok(OutputMode::Json),
        "debug" => Ok(OutputMode::Debug),
        _ => Err(anyhow!("unsupported output type {s:?}, expected json|debug")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::ffi::OsStr;

    #[test]
    fn output_mode_names() {
        assert_eq!(parse_output_mode("json").unwrap(), OutputMode::Json);
        assert_eq!(parse_output_mode("DEBUG").unwrap(), OutputMode::Debug);
        let err = parse_output_mode("xml").unwrap_err();
        assert!(err.to_string().contains("json|debug"));
    }

    #[test]
    fn flags_map_onto_config() {
        let args = DumpArgs::try_parse_from(["bsondump", "--objcheck", "--pretty", "--canonical"])
            .unwrap();
        let config = build_config(&args).unwrap();
        assert_eq!(
            config,
            DumpConfig {
                validate: true,
                pretty: true,
                ext_json: ExtJsonMode::Canonical,
                ..DumpConfig::default()
            }
        );
    }

    #[test]
    fn bad_type_is_rejected_before_opening_files() {
        let args = DumpArgs::try_parse_from(["bsondump", "--type", "csv", "/does/not/exist.bson"])
            .unwrap();
        let err = run(&args).unwrap_err();
        assert!(err.to_string().contains("unsupported output type"));
    }

    #[test]
    fn missing_input_file_is_reported() {
        let err = open_input(Some(Path::new("/does/not/exist.bson"))).err().unwrap();
        assert!(format!("{err:#}").starts_with("cannot open /does/not/exist.bson"));
    }

    #[test]
    fn dash_means_stdin() {
        let (_, name) = open_input(Some(Path::new("-"))).unwrap();
        assert_eq!(name, "stdin");
    }

    #[test]
    fn dumps_a_file_to_a_file() {
        let dir = std::env::temp_dir().join(format!("bsondump-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("two_empty.bson");
        let output = dir.join("two_empty.json");
        std::fs::write(&input, [5u8, 0, 0, 0, 0, 5, 0, 0, 0, 0]).unwrap();

        let args = DumpArgs::try_parse_from([
            OsStr::new("bsondump"),
            OsStr::new("--out"),
            output.as_os_str(),
            input.as_os_str(),
        ])
        .unwrap();
        run(&args).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), "{}\n{}\n");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
