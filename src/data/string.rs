use serde::ser::{Error as _, SerializeTuple};
use serde::{Serialize, Serializer};
use std::fmt;

use super::Error;

pub const STRING_MAX_PAYLOAD: usize = u8::MAX as usize;

/// A string with a 1 byte length prefix, kept as its raw wire bytes.
///
/// The default value has no bytes at all, which is what a field looks like
/// when it was never decoded. Such a string has no payload and cannot be
/// encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct I2PString(Vec<u8>);

impl I2PString {
    pub fn new(s: &str) -> Result<Self, Error> {
        Self::from_payload(s.as_bytes())
    }

    pub fn from_payload(payload: &[u8]) -> Result<Self, Error> {
        if payload.len() > STRING_MAX_PAYLOAD {
            return Err(Error::StringTooLong { len: payload.len() });
        }

        let mut raw = Vec::with_capacity(payload.len() + 1);
        raw.push(payload.len() as u8);
        raw.extend_from_slice(payload);

        Ok(Self(raw))
    }

    pub fn payload(&self) -> Result<&[u8], Error> {
        match self.0.split_first() {
            Some((_, payload)) => Ok(payload),
            None => Err(Error::MissingPayload),
        }
    }

    pub fn to_string_lossy(&self) -> Option<String> {
        self.payload()
            .ok()
            .map(|payload| String::from_utf8_lossy(payload).into_owned())
    }

    /// Wire bytes including the length prefix.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Reads a length prefixed string from the front of `data`.
///
/// Nothing is consumed on failure.
pub fn read_string(data: &[u8]) -> Result<(I2PString, &[u8]), Error> {
    let Some(&len) = data.first() else {
        return Err(Error::EmptyInput {
            structure: "string",
        });
    };

    let total = len as usize + 1;
    if data.len() < total {
        return Err(Error::FieldTooShort {
            field: "string",
            expected: total,
            available: data.len(),
        });
    }

    let (raw, remainder) = data.split_at(total);

    Ok((I2PString(raw.to_vec()), remainder))
}

impl fmt::Display for I2PString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.payload() {
            Ok(payload) => f.write_str(&String::from_utf8_lossy(payload)),
            Err(_) => Ok(()),
        }
    }
}

impl Serialize for I2PString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.0.is_empty() {
            return Err(S::Error::custom(Error::MissingPayload));
        }

        let mut tup = serializer.serialize_tuple(self.0.len())?;
        for byte in self.0.iter() {
            tup.serialize_element(byte)?;
        }
        tup.end()
    }
}
