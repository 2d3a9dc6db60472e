#![no_main]

use std::io::Cursor;

use bdump_wire::{FrameReader, RawDocSource, MIN_DOCUMENT_SIZE};
use libfuzzer_sys::fuzz_target;

// Fuzz target: FrameReader over an arbitrary stream.
//
// Catches bugs in:
// - Negative or tiny declared sizes
// - Declared sizes past the buffer
// - Partial headers and bodies at end of stream
// - Reads continuing after the reader is poisoned
fuzz_target!(|data: &[u8]| {
    let mut reader = FrameReader::new(Cursor::new(data));
    let mut buf = vec![0u8; 4096];
    let mut consumed = 0;

    while let Some(size) = reader.load_next_into(&mut buf) {
        assert!(size >= MIN_DOCUMENT_SIZE && size <= buf.len());
        assert_eq!(&buf[..size], &data[consumed..consumed + size]);
        consumed += size;
    }

    // Poisoned or exhausted: nothing more comes out.
    assert!(reader.load_next_into(&mut buf).is_none());
    assert!(reader.offset() as usize <= data.len());
});
