//! Shared fixtures for the bdump integration tests and benchmarks.
//!
//! Well-formed documents are built with the `bson` encoder so their bytes
//! are exactly what a real producer writes. Malformed frames cannot come
//! from an encoder and are written out as hex instead.
//!
//! | Fixture              | Contents                                          |
//! |----------------------|---------------------------------------------------|
//! | `people`             | three small documents, one array, one subdocument |
//! | `all_types`          | one field of (almost) every element type          |
//! | `nested`             | a chain of subdocuments `depth` levels deep       |
//! | `deep_frame`         | the same chain built byte by byte, any depth      |
//! | `EMPTY_DOC`          | `05 00 00 00 00`                                  |
//! | `corrupt_frame`      | frames correctly, unknown element type inside     |
//! | `duplicate_keys`     | `{"k": 1, "k": 2}`, which no encoder will emit    |

use std::io::Cursor;
use std::sync::Arc;

use bdump_driver::{DumpConfig, DumpOutcome, Dumper, MemorySink, OutputMode};
use bson::spec::BinarySubtype;
use bson::{Binary, Bson, DateTime, Document, Regex, Timestamp, doc, oid::ObjectId};

/// The smallest legal document.
pub const EMPTY_DOC: [u8; 5] = [0x05, 0x00, 0x00, 0x00, 0x00];

// ── Well-formed fixtures ─────────────────────────────────────────────────────

pub fn people() -> Vec<Document> {
    vec![
        doc! { "name": "Ada", "age": 36, "langs": ["en", "fr"] },
        doc! { "name": "Linus", "age": 54_i64, "active": true },
        doc! {
            "name": "Grace",
            "address": { "city": "Arlington", "zip": "22201" },
            "score": 9.5,
        },
    ]
}

pub fn all_types() -> Document {
    let oid = ObjectId::parse_str("5f1e2d3c4b5a697887960504").expect("valid hex");
    let binary = Binary {
        subtype: BinarySubtype::Generic,
        bytes: vec![1, 2, 3],
    };
    let regex = Regex {
        pattern: "^a.*".to_string(),
        options: "i".to_string(),
    };
    let timestamp = Timestamp {
        time: 1_600_000_000,
        increment: 7,
    };
    let int64: i64 = 1 << 40;
    doc! {
        "_id": oid,
        "double": 2.5,
        "string": "héllo",
        "doc": { "k": "v" },
        "array": [1, "two"],
        "binary": binary,
        "bool": false,
        "date": DateTime::from_millis(1_600_000_000_000),
        "null": Bson::Null,
        "regex": regex,
        "code": Bson::JavaScriptCode("x => x".to_string()),
        "int32": 42,
        "timestamp": timestamp,
        "int64": int64,
        "min": Bson::MinKey,
        "max": Bson::MaxKey,
    }
}

/// `{"d": {"d": ... {"leaf": true}}}` with `depth` levels of `"d"`.
pub fn nested(depth: usize) -> Document {
    let mut current = doc! { "leaf": true };
    for _ in 0..depth {
        current = doc! { "d": current };
    }
    current
}

// ── Hand-written frames ──────────────────────────────────────────────────────

/// `{"d": {"d": ... {}}}` with `depth` levels of `"d"`, written out directly
/// so that no encoder has to recurse through it.
pub fn deep_frame(depth: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(5 + 8 * depth);
    for level in 0..depth {
        let len = i32::try_from(5 + 8 * (depth - level)).expect("fixture fits in i32");
        out.extend(len.to_le_bytes());
        out.extend([0x03, b'd', 0x00]);
    }
    out.extend(EMPTY_DOC);
    out.resize(out.len() + depth, 0x00);
    out
}

/// Decode a hex fixture. Whitespace is ignored.
pub fn from_hex(text: &str) -> Vec<u8> {
    let compact: String = text.split_whitespace().collect();
    hex::decode(compact).expect("fixture hex is valid")
}

/// Ten bytes, correct length and terminator, element of unknown type 0x42.
pub fn corrupt_frame() -> Vec<u8> {
    from_hex("0a000000 42 7800 0102 00")
}

/// `{"k": 1, "k": 2}`.
pub fn duplicate_keys() -> Vec<u8> {
    from_hex("13000000 10 6b00 01000000 10 6b00 02000000 00")
}

// ── Stream helpers ───────────────────────────────────────────────────────────

pub fn frame(doc: &Document) -> Vec<u8> {
    bson::to_vec(doc).expect("fixture documents encode")
}

/// Concatenate the frames of `docs`.
pub fn stream(docs: &[Document]) -> Vec<u8> {
    docs.iter().flat_map(frame).collect()
}

/// Three documents, the second one corrupt.
pub fn corrupt_middle() -> Vec<u8> {
    let people = people();
    let mut out = frame(&people[0]);
    out.extend(corrupt_frame());
    out.extend(frame(&people[2]));
    out
}

pub fn json_config() -> DumpConfig {
    DumpConfig::default()
}

pub fn debug_config() -> DumpConfig {
    DumpConfig {
        mode: OutputMode::Debug,
        ..DumpConfig::default()
    }
}

/// Everything one dumper run produced.
pub struct DumpRun {
    pub outcome: DumpOutcome,
    pub output: String,
    pub diagnostics: Arc<MemorySink>,
}

/// Run a fresh dumper over `input`, collecting output and diagnostics.
pub fn dump(config: DumpConfig, input: &[u8]) -> DumpRun {
    let diagnostics = Arc::new(MemorySink::new());
    let mut dumper = Dumper::with_diagnostics(config, Arc::clone(&diagnostics));
    let mut out = Vec::new();
    let outcome = dumper.run(Cursor::new(input), &mut out);
    DumpRun {
        outcome,
        output: String::from_utf8(out).expect("dump output is UTF-8"),
        diagnostics,
    }
}
