//! Common structures a router address is built from.

mod date;
mod error;
mod hash;
mod integer;
mod mapping;
mod string;

pub use date::{read_date, Date, DATE_SIZE};
pub use error::{Error, MappingFault};
pub use hash::{hash_data, hash_reader, Hash, HASH_LEN};
pub use integer::{read_integer, Integer, MAX_INTEGER_SIZE};
pub use mapping::{read_mapping, Mapping, MAPPING_SIZE_LEN};
pub use string::{read_string, I2PString, STRING_MAX_PAYLOAD};

use bincode::Options;
use serde::Serialize;

/// Serializes `value` the way the structures go on the wire: big-endian,
/// fixed width integers, no length prefixes added by the encoder.
pub fn to_wire<T>(value: &T) -> bincode::Result<Vec<u8>>
where
    T: Serialize + ?Sized,
{
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .serialize(value)
}
