use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};

use super::Error;

pub const MAX_INTEGER_SIZE: usize = 8;

/// Big-endian unsigned integer stored in a fixed number of bytes (1 to 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Integer {
    value: u64,
    size: usize,
}

impl Integer {
    /// `None` when `size` is out of range or `value` needs more than `size` bytes.
    pub fn new(value: u64, size: usize) -> Option<Self> {
        if size == 0 || size > MAX_INTEGER_SIZE {
            return None;
        }

        if size < MAX_INTEGER_SIZE && value >> (size * 8) != 0 {
            return None;
        }

        Some(Self { value, size })
    }

    pub fn int(&self) -> u64 {
        self.value
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.value.to_be_bytes()[MAX_INTEGER_SIZE - self.size..].to_vec()
    }
}

impl From<u8> for Integer {
    fn from(value: u8) -> Self {
        Self {
            value: value.into(),
            size: 1,
        }
    }
}

impl From<u16> for Integer {
    fn from(value: u16) -> Self {
        Self {
            value: value.into(),
            size: 2,
        }
    }
}

/// Reads a `size` byte integer from the front of `data`.
///
/// Nothing is consumed on failure.
pub fn read_integer(data: &[u8], size: usize) -> Result<(Integer, &[u8]), Error> {
    debug_assert!(size > 0 && size <= MAX_INTEGER_SIZE);

    if data.len() < size {
        return Err(Error::FieldTooShort {
            field: "integer",
            expected: size,
            available: data.len(),
        });
    }

    let (head, remainder) = data.split_at(size);
    let value = head
        .iter()
        .fold(0u64, |acc, byte| (acc << 8) | u64::from(*byte));

    Ok((Integer { value, size }, remainder))
}

impl Serialize for Integer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tup = serializer.serialize_tuple(self.size)?;
        for byte in self.bytes() {
            tup.serialize_element(&byte)?;
        }
        tup.end()
    }
}
