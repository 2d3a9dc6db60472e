use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::element_type::ElementType;
use crate::error::WireError;
use crate::frame_reader::{LENGTH_PREFIX_SIZE, MIN_DOCUMENT_SIZE};

/// One `(name, type tag, value bytes)` triple, borrowed from a document.
///
/// ```text
/// ┌─────┬──────────────┬──────┬──────────────────────┐
/// │ tag │ name bytes   │ 0x00 │ value bytes          │
/// │ 1 B │ len(name) B  │ 1 B  │ width given by tag   │
/// └─────┴──────────────┴──────┴──────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawElement<'a> {
    name: &'a [u8],
    tag: u8,
    value: &'a [u8],
    offset: usize,
}

impl<'a> RawElement<'a> {
    /// Field name without its NUL terminator.
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    /// Field name as text, with invalid UTF-8 replaced.
    pub fn name_lossy(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.name)
    }

    pub fn tag(&self) -> u8 {
        self.tag
    }

    pub fn element_type(&self) -> ElementType {
        ElementType::from_wire_id(self.tag)
    }

    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// Offset of the type tag within the body this element was read from.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Bytes this element occupies on the wire:
    /// 1 (tag) + len(name) + 1 (NUL) + len(value).
    pub fn size(&self) -> usize {
        2 + self.name.len() + self.value.len()
    }

    /// The complete nested document (length prefix included) for embedded
    /// documents and arrays, `None` for every other type.
    pub fn nested(&self) -> Option<&'a [u8]> {
        self.element_type().is_container().then_some(self.value)
    }
}

/// Validate a complete document slice and return its element region.
///
/// The slice must start with an `i32` length equal to its own length and
/// end with the 0x00 terminator. The returned body excludes both.
///
/// # Errors
///
/// - [`WireError::InvalidDocumentLength`] if the header is short, below
///   the minimum, or disagrees with `doc.len()`.
/// - [`WireError::MissingTerminator`] if the last byte is not 0x00.
pub fn document_body(doc: &[u8]) -> Result<&[u8], WireError> {
    let declared = read_i32(doc, 0).unwrap_or(0);
    if doc.len() < MIN_DOCUMENT_SIZE || usize::try_from(declared).ok() != Some(doc.len()) {
        return Err(WireError::InvalidDocumentLength {
            declared,
            actual: doc.len(),
        });
    }

    let last = doc.len() - 1;
    if doc[last] != 0x00 {
        return Err(WireError::MissingTerminator { found: doc[last] });
    }

    Ok(&doc[LENGTH_PREFIX_SIZE..last])
}

/// Lazy walk over the elements of one document body, in wire order.
///
/// Nothing is decoded: each step reads the tag, scans the name to its NUL,
/// and skips the value by the width its tag implies. Duplicate names are
/// yielded as often as they occur.
///
/// The first malformed element is yielded as an `Err` and the iterator is
/// fused afterwards. To descend into a container, build a fresh iterator
/// over [`RawElement::nested`]:
///
/// ```rust
/// use bdump_wire::ElementIter;
///
/// // {"a": {"b": true}}
/// let doc = [
///     0x11, 0, 0, 0, 0x03, b'a', 0, 0x09, 0, 0, 0, 0x08, b'b', 0, 0x01, 0, 0,
/// ];
/// let outer: Vec<_> = ElementIter::over_document(&doc).unwrap().collect();
/// let inner = outer[0].as_ref().unwrap().nested().unwrap();
/// let inner: Vec<_> = ElementIter::over_document(inner).unwrap().collect();
/// assert_eq!(inner[0].as_ref().unwrap().name(), b"b");
/// ```
#[derive(Clone, Debug)]
pub struct ElementIter<'a> {
    body: &'a [u8],
    pos: usize,
    done: bool,
}

impl<'a> ElementIter<'a> {
    /// Walk a body that has already been stripped of its length prefix and
    /// terminator (see [`document_body`]).
    #[must_use]
    pub fn new(body: &'a [u8]) -> Self {
        Self {
            body,
            pos: 0,
            done: false,
        }
    }

    /// Validate a complete document and walk its body.
    ///
    /// # Errors
    ///
    /// Any error from [`document_body`].
    pub fn over_document(doc: &'a [u8]) -> Result<Self, WireError> {
        Ok(Self::new(document_body(doc)?))
    }

    fn read_element(&mut self) -> Result<RawElement<'a>, WireError> {
        let start = self.pos;
        let tag = self.body[start];

        let name_start = start + 1;
        let name_len = cstring_len(self.body, name_start).ok_or(WireError::MalformedElement {
            offset: start,
            reason: "field name is not NUL-terminated",
        })?;
        let name = &self.body[name_start..name_start + name_len];
        let value_start = name_start + name_len + 1;

        let element_type = ElementType::from_wire_id(tag);
        if let ElementType::Unknown(tag) = element_type {
            return Err(WireError::UnknownElementType {
                tag,
                name: String::from_utf8_lossy(name).into_owned(),
                offset: start,
            });
        }

        let value_len = value_len(self.body, element_type, value_start)
            .map_err(|reason| WireError::MalformedElement { offset: start, reason })?;
        let value_end = value_start
            .checked_add(value_len)
            .filter(|&end| end <= self.body.len())
            .ok_or(WireError::MalformedElement {
                offset: start,
                reason: "value runs past end of document",
            })?;

        self.pos = value_end;
        Ok(RawElement {
            name,
            tag,
            value: &self.body[value_start..value_end],
            offset: start,
        })
    }
}

impl<'a> Iterator for ElementIter<'a> {
    type Item = Result<RawElement<'a>, WireError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.body.len() {
            return None;
        }
        let item = self.read_element();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}

impl FusedIterator for ElementIter<'_> {}

// ── Value width rules ─────────────────────────────────────────────────
//
// Everything below works on the body slice and an absolute position in it.
// A returned length is only a claim; read_element does the final
// bounds check against the body end so that check lives in one place.

const TRUNCATED_LENGTH: &str = "length prefix runs past end of document";

fn value_len(body: &[u8], element_type: ElementType, at: usize) -> Result<usize, &'static str> {
    if let Some(width) = element_type.fixed_width() {
        return Ok(width);
    }

    match element_type {
        ElementType::String | ElementType::JavaScriptCode | ElementType::Symbol => {
            string_len(body, at)
        }
        ElementType::EmbeddedDocument | ElementType::Array => {
            length_prefixed(body, at, MIN_DOCUMENT_SIZE, "embedded document length is too small")
        }
        // i32 total + (i32 + at least a NUL) + a minimal document
        ElementType::CodeWithScope => {
            length_prefixed(body, at, 14, "code with scope length is too small")
        }
        ElementType::Binary => {
            let n = read_i32(body, at).ok_or(TRUNCATED_LENGTH)?;
            let n = usize::try_from(n).map_err(|_| "binary length is negative")?;
            Ok(LENGTH_PREFIX_SIZE + 1 + n)
        }
        ElementType::RegularExpression => {
            let pattern = cstring_len(body, at).ok_or("regex pattern is not NUL-terminated")? + 1;
            let options =
                cstring_len(body, at + pattern).ok_or("regex options are not NUL-terminated")? + 1;
            Ok(pattern + options)
        }
        ElementType::DbPointer => Ok(string_len(body, at)? + 12),
        _ => Err("unsupported element type"),
    }
}

/// Width of a BSON string: i32 length (counting the NUL) plus the bytes.
fn string_len(body: &[u8], at: usize) -> Result<usize, &'static str> {
    let n = read_i32(body, at).ok_or(TRUNCATED_LENGTH)?;
    let n = usize::try_from(n)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or("string length must be at least 1")?;
    let total = LENGTH_PREFIX_SIZE + n;
    match body.get(at + total - 1) {
        Some(0x00) => Ok(total),
        Some(_) => Err("string is not NUL-terminated"),
        None => Err("value runs past end of document"),
    }
}

fn length_prefixed(
    body: &[u8],
    at: usize,
    min: usize,
    too_small: &'static str,
) -> Result<usize, &'static str> {
    let n = read_i32(body, at).ok_or(TRUNCATED_LENGTH)?;
    usize::try_from(n)
        .ok()
        .filter(|&n| n >= min)
        .ok_or(too_small)
}

/// Length of the NUL-terminated string starting at `at`, NUL excluded.
fn cstring_len(body: &[u8], at: usize) -> Option<usize> {
    body.get(at..)?.iter().position(|&b| b == 0x00)
}

fn read_i32(bytes: &[u8], at: usize) -> Option<i32> {
    let raw = bytes.get(at..at.checked_add(LENGTH_PREFIX_SIZE)?)?;
    Some(i32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}
