use bson::{Bson, Document};

/// Which extended JSON flavour decoded values are rendered in.
///
/// The conversion itself belongs to the `bson` crate; this only picks the
/// entry point.
///
/// ```text
/// ┌───────────┬──────────────────────────┬────────────────────────────────┐
/// │ Mode      │ {"n": Int32(1)}          │ {"d": DateTime}                │
/// ├───────────┼──────────────────────────┼────────────────────────────────┤
/// │ Relaxed   │ {"n":1}                  │ {"d":{"$date":"1970-01-..."}}  │
/// │ Canonical │ {"n":{"$numberInt":"1"}} │ {"d":{"$date":{"$numberLong"…  │
/// └───────────┴──────────────────────────┴────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExtJsonMode {
    #[default]
    Relaxed,
    Canonical,
}

impl ExtJsonMode {
    pub fn convert(self, doc: Document) -> serde_json::Value {
        let value = Bson::Document(doc);
        match self {
            Self::Relaxed => value.into_relaxed_extjson(),
            Self::Canonical => value.into_canonical_extjson(),
        }
    }
}
