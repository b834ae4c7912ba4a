use thiserror::Error;

/// Faults reported by the common structure decoders.
///
/// Decoders return these as data instead of aborting, so a caller can inspect
/// every field that did decode next to the list of problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("error parsing {structure}: no data")]
    EmptyInput { structure: &'static str },

    #[error("error parsing {field}: expected {expected} bytes, found {available}")]
    FieldTooShort {
        field: &'static str,
        expected: usize,
        available: usize,
    },

    #[error("error parsing mapping: {0}")]
    MalformedMapping(MappingFault),

    #[error("string payload of {len} bytes does not fit a 1 byte length prefix")]
    StringTooLong { len: usize },

    #[error("string has no length prefix")]
    MissingPayload,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingFault {
    #[error("declared size {declared} exceeds provided data {available}")]
    LengthExceedsData { declared: usize, available: usize },

    #[error("expected '=' after key at offset {offset}")]
    MissingEquals { offset: usize },

    #[error("expected ';' after value at offset {offset}")]
    MissingSemicolon { offset: usize },

    #[error("unreadable entry at offset {offset}: {source}")]
    BadEntry {
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("duplicate key {key:?}")]
    DuplicateKey { key: String },

    #[error("{len} bytes of entries do not fit a 2 byte size prefix")]
    TooLarge { len: usize },
}

impl From<MappingFault> for Error {
    fn from(fault: MappingFault) -> Self {
        Error::MalformedMapping(fault)
    }
}
