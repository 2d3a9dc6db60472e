#![no_main]

use bdump_wire::ElementIter;
use libfuzzer_sys::fuzz_target;

// Fuzz target: structural element walk over one untrusted document.
//
// Every yielded element must lie inside the body, and its reported size
// must match its name and value. Containers are walked recursively to a
// bounded depth.
fn walk(doc: &[u8], depth: usize) {
    if depth > 64 {
        return;
    }
    let Ok(iter) = ElementIter::over_document(doc) else {
        return;
    };
    let body_len = doc.len() - 5;
    let mut covered = 0;
    for element in iter {
        let Ok(element) = element else {
            return;
        };
        assert_eq!(element.size(), 2 + element.name().len() + element.value().len());
        covered += element.size();
        assert!(covered <= body_len);
        if let Some(nested) = element.nested() {
            walk(nested, depth + 1);
        }
    }
    assert_eq!(covered, body_len);
}

fuzz_target!(|data: &[u8]| {
    walk(data, 0);
});
