/// BSON element type tags.
///
/// ```text
/// ┌──────┬────────────────────┬─────────────────────────────────────┐
/// │ Tag  │ Variant            │ Value layout                        │
/// ├──────┼────────────────────┼─────────────────────────────────────┤
/// │ 0x01 │ Double             │ 8 bytes                             │
/// │ 0x02 │ String             │ i32 len │ len bytes (NUL last)      │
/// │ 0x03 │ EmbeddedDocument   │ complete document                   │
/// │ 0x04 │ Array              │ complete document ("0", "1", ...)   │
/// │ 0x05 │ Binary             │ i32 len │ subtype │ len bytes       │
/// │ 0x06 │ Undefined          │ empty                               │
/// │ 0x07 │ ObjectId           │ 12 bytes                            │
/// │ 0x08 │ Boolean            │ 1 byte                              │
/// │ 0x09 │ DateTime           │ 8 bytes                             │
/// │ 0x0A │ Null               │ empty                               │
/// │ 0x0B │ RegularExpression  │ cstring │ cstring                   │
/// │ 0x0C │ DbPointer          │ string │ 12 bytes                   │
/// │ 0x0D │ JavaScriptCode     │ string                              │
/// │ 0x0E │ Symbol             │ string                              │
/// │ 0x0F │ CodeWithScope      │ i32 total len │ string │ document   │
/// │ 0x10 │ Int32              │ 4 bytes                             │
/// │ 0x11 │ Timestamp          │ 8 bytes                             │
/// │ 0x12 │ Int64              │ 8 bytes                             │
/// │ 0x13 │ Decimal128         │ 16 bytes                            │
/// │ 0xFF │ MinKey             │ empty                               │
/// │ 0x7F │ MaxKey             │ empty                               │
/// └──────┴────────────────────┴─────────────────────────────────────┘
/// ```
///
/// Tags outside this table are kept as `Unknown(tag)` so the walker can
/// report them; it cannot step over them because their width is unknown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementType {
    Double,
    String,
    EmbeddedDocument,
    Array,
    Binary,
    Undefined,
    ObjectId,
    Boolean,
    DateTime,
    Null,
    RegularExpression,
    DbPointer,
    JavaScriptCode,
    Symbol,
    CodeWithScope,
    Int32,
    Timestamp,
    Int64,
    Decimal128,
    MinKey,
    MaxKey,
    Unknown(u8),
}

impl ElementType {
    pub fn from_wire_id(tag: u8) -> Self {
        match tag {
            0x01 => Self::Double,
            0x02 => Self::String,
            0x03 => Self::EmbeddedDocument,
            0x04 => Self::Array,
            0x05 => Self::Binary,
            0x06 => Self::Undefined,
            0x07 => Self::ObjectId,
            0x08 => Self::Boolean,
            0x09 => Self::DateTime,
            0x0A => Self::Null,
            0x0B => Self::RegularExpression,
            0x0C => Self::DbPointer,
            0x0D => Self::JavaScriptCode,
            0x0E => Self::Symbol,
            0x0F => Self::CodeWithScope,
            0x10 => Self::Int32,
            0x11 => Self::Timestamp,
            0x12 => Self::Int64,
            0x13 => Self::Decimal128,
            0xFF => Self::MinKey,
            0x7F => Self::MaxKey,
            other => Self::Unknown(other),
        }
    }

    /// True for the two container types whose value is itself a document.
    pub fn is_container(self) -> bool {
        matches!(self, Self::EmbeddedDocument | Self::Array)
    }

    /// Width of the value when it is fixed, `None` for variable-width types.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Undefined | Self::Null | Self::MinKey | Self::MaxKey => Some(0),
            Self::Boolean => Some(1),
            Self::Int32 => Some(4),
            Self::Double | Self::DateTime | Self::Timestamp | Self::Int64 => Some(8),
            Self::ObjectId => Some(12),
            Self::Decimal128 => Some(16),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_tags() {
        for tag in (0x01..=0x13).chain([0x7F, 0xFF]) {
            let ty = ElementType::from_wire_id(tag);
            assert!(
                !matches!(ty, ElementType::Unknown(_)),
                "tag {tag:#04X} should be known"
            );
        }
    }

    #[test]
    fn unknown_tag_preserved() {
        assert_eq!(ElementType::from_wire_id(0x42), ElementType::Unknown(0x42));
        assert_eq!(ElementType::from_wire_id(0x00), ElementType::Unknown(0x00));
    }

    #[test]
    fn only_documents_and_arrays_are_containers() {
        assert!(ElementType::EmbeddedDocument.is_container());
        assert!(ElementType::Array.is_container());
        assert!(!ElementType::CodeWithScope.is_container());
        assert!(!ElementType::String.is_container());
    }

    #[test]
    fn fixed_widths() {
        assert_eq!(ElementType::Int32.fixed_width(), Some(4));
        assert_eq!(ElementType::ObjectId.fixed_width(), Some(12));
        assert_eq!(ElementType::MinKey.fixed_width(), Some(0));
        assert_eq!(ElementType::String.fixed_width(), None);
        assert_eq!(ElementType::Unknown(0x42).fixed_width(), None);
    }
}
