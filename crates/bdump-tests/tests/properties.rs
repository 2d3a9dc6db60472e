//! Property tests over generated documents and arbitrary bytes.
//!
//! Generated documents are encoded with `bson`, concatenated and fed back
//! through the dumper, so every property holds for real encoder output.

use bdump_driver::{DumpError, print_debug};
use bdump_tests::{debug_config, dump, frame, json_config, stream};
use bdump_wire::{ElementIter, FrameError};
use bson::{Bson, Document};
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = Bson> {
    prop_oneof![
        any::<i32>().prop_map(Bson::Int32),
        any::<i64>().prop_map(Bson::Int64),
        any::<bool>().prop_map(Bson::Boolean),
        "[a-zA-Z0-9 éß]{0,16}".prop_map(Bson::String),
        (-1.0e6..1.0e6f64).prop_map(Bson::Double),
        Just(Bson::Null),
    ]
}

fn value() -> impl Strategy<Value = Bson> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Bson::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..4)
                .prop_map(|fields| Bson::Document(fields.into_iter().collect())),
        ]
    })
}

fn document() -> impl Strategy<Value = Document> {
    prop::collection::vec(("[a-z_]{1,8}", value()), 0..6)
        .prop_map(|fields| fields.into_iter().collect())
}

/// Embedded documents and arrays anywhere below `doc`.
fn containers(doc: &Document) -> usize {
    fn in_value(value: &Bson) -> usize {
        match value {
            Bson::Document(d) => 1 + containers(d),
            Bson::Array(items) => 1 + items.iter().map(in_value).sum::<usize>(),
            _ => 0,
        }
    }
    doc.values().map(in_value).sum()
}

proptest! {
    #[test]
    fn prop_json_emits_one_line_per_document(docs in prop::collection::vec(document(), 0..8)) {
        let run = dump(json_config(), &stream(&docs));

        prop_assert!(run.outcome.error.is_none());
        prop_assert_eq!(run.outcome.documents, docs.len());
        let lines: Vec<_> = run.output.lines().collect();
        prop_assert_eq!(lines.len(), docs.len());
        for line in lines {
            let parsed: serde_json::Value = serde_json::from_str(line).unwrap();
            prop_assert!(parsed.is_object());
        }
    }

    #[test]
    fn prop_debug_opens_one_object_per_container(doc in document()) {
        let run = dump(debug_config(), &frame(&doc));

        prop_assert!(run.outcome.is_success());
        prop_assert_eq!(
            run.output.matches("--- new object ---").count(),
            1 + containers(&doc)
        );
    }

    #[test]
    fn prop_element_sizes_cover_the_body(doc in document()) {
        let bytes = frame(&doc);
        let mut total = 0;
        for element in ElementIter::over_document(&bytes).unwrap() {
            let element = element.unwrap();
            prop_assert_eq!(element.size(), 2 + element.name().len() + element.value().len());
            total += element.size();
        }
        prop_assert_eq!(total, bytes.len() - 5);
    }

    #[test]
    fn prop_debug_header_reports_frame_length(doc in document()) {
        let bytes = frame(&doc);
        let mut out = Vec::new();
        print_debug(&bytes, 0, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = format!("--- new object ---\n\tsize : {}\n", bytes.len());
        prop_assert!(text.starts_with(&header));
    }

    #[test]
    fn prop_cut_stream_reports_truncation(
        docs in prop::collection::vec(document(), 1..5),
        cut in any::<prop::sample::Index>(),
    ) {
        let frames: Vec<_> = docs.iter().map(frame).collect();
        let input: Vec<u8> = frames.concat();
        let at = 1 + cut.index(input.len() - 1);

        // Frames that end at or before the cut survive intact.
        let mut complete = 0;
        let mut end = 0;
        for f in &frames {
            if end + f.len() > at {
                break;
            }
            end += f.len();
            complete += 1;
        }

        let run = dump(json_config(), &input[..at]);
        prop_assert_eq!(run.outcome.documents, complete);
        if at == end {
            prop_assert!(run.outcome.error.is_none());
        } else if at - end < 4 {
            let truncated_header = matches!(
                run.outcome.error,
                Some(DumpError::Frame(FrameError::TruncatedHeader { .. }))
            );
            prop_assert!(truncated_header);
        } else {
            let truncated_body = matches!(
                run.outcome.error,
                Some(DumpError::Frame(FrameError::TruncatedBody { .. }))
            );
            prop_assert!(truncated_body);
        }
    }

    #[test]
    fn prop_arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        for config in [json_config(), debug_config()] {
            let run = dump(config, &bytes);
            prop_assert!(run.outcome.documents <= bytes.len() / 5);
        }
    }
}
