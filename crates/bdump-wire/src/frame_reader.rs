use std::io::{self, Read};

use crate::error::FrameError;

/// Largest document the default reusable buffer can hold: the 16 MiB
/// server limit plus 16 KiB of slack for internal command wrappers.
pub const MAX_BSON_SIZE: usize = 16 * 1024 * 1024 + 16 * 1024;

/// Smallest legal frame: the 4-byte length prefix and the 0x00 terminator.
pub const MIN_DOCUMENT_SIZE: usize = 5;

/// Size of the little-endian `i32` length prefix.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// A forward-only source of raw, length-prefixed documents.
///
/// ```text
///   load_next_into(buf) ──▶ Some(size)  buf[..size] holds one frame
///                      └──▶ None        end of stream, or err() is set
/// ```
///
/// The buffer is borrowed mutably for the duration of the call only, and
/// every call overwrites `buf[..size]`. A caller that needs a document past
/// the next call must decode or copy it first.
pub trait RawDocSource {
    /// Read the next frame into `into`, returning its size.
    fn load_next_into(&mut self, into: &mut [u8]) -> Option<usize>;

    /// The error that ended the last read, if any.
    fn err(&self) -> Option<&FrameError>;

    /// Move the recorded error out, leaving `None` behind.
    fn take_err(&mut self) -> Option<FrameError>;
}

impl<S: RawDocSource + ?Sized> RawDocSource for &mut S {
    fn load_next_into(&mut self, into: &mut [u8]) -> Option<usize> {
        (**self).load_next_into(into)
    }

    fn err(&self) -> Option<&FrameError> {
        (**self).err()
    }

    fn take_err(&mut self) -> Option<FrameError> {
        (**self).take_err()
    }
}

/// Frames concatenated BSON documents out of any [`Read`] stream.
///
/// Each frame is validated in this order:
///
/// ```text
///   1. read 4 header bytes      0 bytes   → clean end, no error
///                               1-3 bytes → TruncatedHeader
///   2. decode i32 little-endian
///   3. 5 <= size <= buf.len()   otherwise → InvalidSize (body untouched)
///   4. read size - 4 body bytes short     → TruncatedBody
/// ```
///
/// The header is staged in a local array and only copied into the caller's
/// buffer once the size has passed step 3, so a rejected header leaves the
/// previous document's bytes intact.
///
/// After the first error the reader is poisoned: later calls return `None`
/// without touching the stream. The stream is dropped with the reader.
pub struct FrameReader<R> {
    stream: R,
    err: Option<FrameError>,
    poisoned: bool,
    offset: u64,
    frames: u64,
}

impl<R: Read> FrameReader<R> {
    #[must_use]
    pub fn new(stream: R) -> Self {
        Self {
            stream,
            err: None,
            poisoned: false,
            offset: 0,
            frames: 0,
        }
    }

    /// Number of complete frames read so far.
    pub fn frames_read(&self) -> u64 {
        self.frames
    }

    /// Bytes consumed from the stream so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> R {
        self.stream
    }

    fn read_frame(&mut self, into: &mut [u8]) -> Result<Option<usize>, FrameError> {
        let start = self.offset;

        let mut header = [0u8; LENGTH_PREFIX_SIZE];
        let read = self.fill(&mut header)?;
        match read {
            0 => return Ok(None),
            LENGTH_PREFIX_SIZE => {}
            _ => return Err(FrameError::TruncatedHeader { offset: start, read }),
        }

        let size = i32::from_le_bytes(header);
        let len = usize::try_from(size)
            .ok()
            .filter(|n| (MIN_DOCUMENT_SIZE..=into.len()).contains(n))
            .ok_or(FrameError::InvalidSize {
                size,
                max: into.len(),
                offset: start,
            })?;

        into[..LENGTH_PREFIX_SIZE].copy_from_slice(&header);
        let want = len - LENGTH_PREFIX_SIZE;
        let read = self.fill(&mut into[LENGTH_PREFIX_SIZE..len])?;
        if read < want {
            return Err(FrameError::TruncatedBody {
                offset: start,
                declared: len,
                read: LENGTH_PREFIX_SIZE + read,
            });
        }

        self.frames += 1;
        Ok(Some(len))
    }

    /// Read until `buf` is full or the stream is exhausted.
    ///
    /// Unlike `read_exact`, this reports how many bytes arrived before EOF,
    /// which is what separates a clean end from a truncated header.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => {
                    filled += n;
                    self.offset += n as u64;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl<R: Read> RawDocSource for FrameReader<R> {
    fn load_next_into(&mut self, into: &mut [u8]) -> Option<usize> {
        if self.poisoned {
            return None;
        }
        match self.read_frame(into) {
            Ok(frame) => {
                self.err = None;
                frame
            }
            Err(e) => {
                self.poisoned = true;
                self.err = Some(e);
                None
            }
        }
    }

    fn err(&self) -> Option<&FrameError> {
        self.err.as_ref()
    }

    fn take_err(&mut self) -> Option<FrameError> {
        self.err.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EMPTY_DOC: [u8; 5] = [0x05, 0x00, 0x00, 0x00, 0x00];

    /// `{"a": 1}` as int32.
    const SMALL_DOC: [u8; 12] = [
        0x0C, 0x00, 0x00, 0x00, 0x10, b'a', 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
    ];

    fn reader(bytes: Vec<u8>) -> FrameReader<Cursor<Vec<u8>>> {
        FrameReader::new(Cursor::new(bytes))
    }

    /// Reader that hands out one byte per call and interrupts every other call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            if self.pos >= self.data.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.data[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn empty_stream_is_clean_end() {
        let mut r = reader(Vec::new());
        let mut buf = [0u8; 64];
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(r.err().is_none());
    }

    #[test]
    fn reads_consecutive_frames() {
        let mut bytes = EMPTY_DOC.to_vec();
        bytes.extend_from_slice(&SMALL_DOC);
        let mut r = reader(bytes);
        let mut buf = [0u8; 64];

        assert_eq!(r.load_next_into(&mut buf), Some(5));
        assert_eq!(&buf[..5], &EMPTY_DOC);
        assert_eq!(r.load_next_into(&mut buf), Some(12));
        assert_eq!(&buf[..12], &SMALL_DOC);
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(r.err().is_none());
        assert_eq!(r.frames_read(), 2);
        assert_eq!(r.offset(), 17);
    }

    #[test]
    fn partial_header_is_truncation() {
        for extra in 1..=3 {
            let mut bytes = SMALL_DOC.to_vec();
            bytes.extend(std::iter::repeat_n(0x07, extra));
            let mut r = reader(bytes);
            let mut buf = [0u8; 64];

            assert_eq!(r.load_next_into(&mut buf), Some(12));
            assert_eq!(r.load_next_into(&mut buf), None);
            assert!(
                matches!(
                    r.err(),
                    Some(FrameError::TruncatedHeader { offset: 12, read }) if *read == extra
                ),
                "extra={extra}: {:?}",
                r.err()
            );
        }
    }

    #[test]
    fn oversized_length_rejected_before_body() {
        let mut bytes = SMALL_DOC.to_vec();
        bytes.extend_from_slice(&1000i32.to_le_bytes());
        bytes.extend_from_slice(&[0xAA; 16]);
        let mut r = reader(bytes);
        let mut buf = [0u8; 64];

        assert_eq!(r.load_next_into(&mut buf), Some(12));
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(matches!(
            r.err(),
            Some(FrameError::InvalidSize {
                size: 1000,
                max: 64,
                offset: 12
            })
        ));
        // Only the 4 header bytes were consumed, and the earlier document is intact.
        assert_eq!(r.offset(), 16);
        assert_eq!(&buf[..12], &SMALL_DOC);
    }

    #[test]
    fn undersized_and_negative_lengths_rejected() {
        for size in [-1i32, 0, 4, i32::MIN] {
            let mut r = reader(size.to_le_bytes().to_vec());
            let mut buf = [0u8; 64];
            assert_eq!(r.load_next_into(&mut buf), None);
            assert!(
                matches!(r.err(), Some(FrameError::InvalidSize { size: s, .. }) if *s == size),
                "size={size}"
            );
        }
    }

    #[test]
    fn size_equal_to_capacity_is_accepted() {
        let mut r = reader(SMALL_DOC.to_vec());
        let mut buf = [0u8; 12];
        assert_eq!(r.load_next_into(&mut buf), Some(12));
    }

    #[test]
    fn short_body_is_truncation() {
        let mut r = reader(SMALL_DOC[..8].to_vec());
        let mut buf = [0u8; 64];
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(matches!(
            r.err(),
            Some(FrameError::TruncatedBody {
                offset: 0,
                declared: 12,
                read: 8
            })
        ));
    }

    #[test]
    fn poisoned_after_error() {
        let mut bytes = vec![0x01, 0x02];
        bytes.extend_from_slice(&EMPTY_DOC);
        let mut r = reader(bytes);
        let mut buf = [0u8; 64];

        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(r.err().is_some());
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(matches!(r.take_err(), Some(FrameError::TruncatedHeader { .. })));
        assert!(r.err().is_none());
    }

    #[test]
    fn tolerates_short_reads_and_interrupts() {
        let mut data = SMALL_DOC.to_vec();
        data.extend_from_slice(&EMPTY_DOC);
        let mut r = FrameReader::new(Trickle {
            data,
            pos: 0,
            interrupt: false,
        });
        let mut buf = [0u8; 64];

        assert_eq!(r.load_next_into(&mut buf), Some(12));
        assert_eq!(r.load_next_into(&mut buf), Some(5));
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(r.err().is_none());
    }

    #[test]
    fn io_failure_is_recorded() {
        let mut r = FrameReader::new(Broken);
        let mut buf = [0u8; 64];
        assert_eq!(r.load_next_into(&mut buf), None);
        assert!(matches!(r.err(), Some(FrameError::Io(_))));
    }

    #[test]
    fn works_through_mut_reference() {
        fn pull<S: RawDocSource>(mut source: S, buf: &mut [u8]) -> Option<usize> {
            source.load_next_into(buf)
        }

        let mut r = reader(EMPTY_DOC.to_vec());
        let mut buf = [0u8; 8];
        assert_eq!(pull(&mut r, &mut buf), Some(5));
        assert_eq!(pull(&mut r, &mut buf), None);
        assert!(r.err().is_none());
        assert_eq!(r.frames_read(), 1);
    }
}
