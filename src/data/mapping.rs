use serde::ser::{Error as _, SerializeTuple};
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use super::{read_integer, read_string, Error, I2PString, MappingFault};

pub const MAPPING_SIZE_LEN: usize = 2;

const EQUALS: u8 = b'=';
const SEMICOLON: u8 = b';';

/// Ordered `key=value;` table behind a 2 byte size prefix.
///
/// Entries keep the order they were read or built in. Keys are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mapping {
    pairs: Vec<(I2PString, I2PString)>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut mapping = Self::new();

        for (key, value) in pairs {
            let key = key.as_ref();
            if mapping.get(key).is_some() {
                return Err(MappingFault::DuplicateKey {
                    key: key.to_owned(),
                }
                .into());
            }

            mapping
                .pairs
                .push((I2PString::new(key)?, I2PString::new(value.as_ref())?));
        }

        let len = mapping.content_len();
        if len > u16::MAX as usize {
            return Err(MappingFault::TooLarge { len }.into());
        }

        Ok(mapping)
    }

    pub fn get(&self, key: &str) -> Option<&I2PString> {
        self.pairs
            .iter()
            .find(|(k, _)| k.payload().ok() == Some(key.as_bytes()))
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&I2PString, &I2PString)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    fn content_len(&self) -> usize {
        self.pairs
            .iter()
            .map(|(k, v)| k.bytes().len() + v.bytes().len() + 2)
            .sum()
    }
}

/// Reads a mapping from the front of `data`.
///
/// Entry faults do not stop the read: every entry before the first broken one
/// is kept, and the remainder always starts after the declared size. When the
/// declared size runs past the data, whatever is there is parsed and consumed.
/// Without a full size prefix the stray bytes are consumed and no entry is read.
pub fn read_mapping(data: &[u8]) -> (Mapping, &[u8], Vec<Error>) {
    let (size, rest) = match read_integer(data, MAPPING_SIZE_LEN) {
        Ok(read) => read,
        Err(_) => {
            warn!(available = data.len(), "mapping has no size prefix");
            let err = Error::FieldTooShort {
                field: "mapping",
                expected: MAPPING_SIZE_LEN,
                available: data.len(),
            };
            return (Mapping::default(), &data[data.len()..], vec![err]);
        }
    };

    let mut faults = Vec::new();
    let declared = size.int() as usize;

    let (content, remainder) = if rest.len() < declared {
        warn!(declared, available = rest.len(), "mapping size exceeds data");
        faults.push(
            MappingFault::LengthExceedsData {
                declared,
                available: rest.len(),
            }
            .into(),
        );
        rest.split_at(rest.len())
    } else {
        rest.split_at(declared)
    };

    let (mapping, entry_faults) = read_mapping_values(content);
    faults.extend(entry_faults);

    debug!(entries = mapping.len(), faults = faults.len(), "read mapping");

    (mapping, remainder, faults)
}

fn read_mapping_values(content: &[u8]) -> (Mapping, Vec<Error>) {
    let mut mapping = Mapping::new();
    let mut faults: Vec<Error> = Vec::new();
    let offset_of = |rest: &[u8]| content.len() - rest.len();

    let mut rest = content;
    while !rest.is_empty() {
        let (key, after_key) = match read_string(rest) {
            Ok(read) => read,
            Err(source) => {
                faults.push(
                    MappingFault::BadEntry {
                        offset: offset_of(rest),
                        source: Box::new(source),
                    }
                    .into(),
                );
                break;
            }
        };

        let Some((&EQUALS, after_equals)) = after_key.split_first() else {
            faults.push(
                MappingFault::MissingEquals {
                    offset: offset_of(after_key),
                }
                .into(),
            );
            break;
        };

        let (value, after_value) = match read_string(after_equals) {
            Ok(read) => read,
            Err(source) => {
                faults.push(
                    MappingFault::BadEntry {
                        offset: offset_of(after_equals),
                        source: Box::new(source),
                    }
                    .into(),
                );
                break;
            }
        };

        let Some((&SEMICOLON, next)) = after_value.split_first() else {
            faults.push(
                MappingFault::MissingSemicolon {
                    offset: offset_of(after_value),
                }
                .into(),
            );
            break;
        };

        if mapping.pairs.iter().any(|(k, _)| k == &key) {
            warn!(key = %key, "duplicate key in mapping, keeping the first value");
            faults.push(
                MappingFault::DuplicateKey {
                    key: key.to_string(),
                }
                .into(),
            );
        } else {
            mapping.pairs.push((key, value));
        }

        rest = next;
    }

    (mapping, faults)
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = self.content_len();
        let size = u16::try_from(len)
            .map_err(|_| S::Error::custom(MappingFault::TooLarge { len }))?;

        let mut tup = serializer.serialize_tuple(1 + self.pairs.len() * 4)?;
        tup.serialize_element(&size)?;
        for (key, value) in self.pairs.iter() {
            tup.serialize_element(key)?;
            tup.serialize_element(&EQUALS)?;
            tup.serialize_element(value)?;
            tup.serialize_element(&SEMICOLON)?;
        }
        tup.end()
    }
}

#[cfg(test)]
mod tests {
    use super::{read_mapping, Mapping};
    use crate::data::{to_wire, Error, MappingFault};
    use tracing_test::traced_test;

    fn entry(key: &str, value: &str) -> Vec<u8> {
        let mut raw = vec![key.len() as u8];
        raw.extend_from_slice(key.as_bytes());
        raw.push(b'=');
        raw.push(value.len() as u8);
        raw.extend_from_slice(value.as_bytes());
        raw.push(b';');
        raw
    }

    fn mapping_bytes(entries: &[Vec<u8>]) -> Vec<u8> {
        let content = entries.concat();
        let mut raw = (content.len() as u16).to_be_bytes().to_vec();
        raw.extend(content);
        raw
    }

    #[test]
    fn read_keeps_order() {
        let mut raw = mapping_bytes(&[entry("port", "9000"), entry("host", "127.0.0.1")]);
        raw.push(0xee);

        let (mapping, remainder, faults) = read_mapping(&raw);

        assert!(faults.is_empty());
        assert_eq!(&[0xeeu8], remainder);

        let keys: Vec<String> = mapping.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(vec!["port", "host"], keys);
        assert_eq!("127.0.0.1", mapping.get("host").unwrap().to_string());
    }

    #[test]
    fn read_empty() {
        let (mapping, remainder, faults) = read_mapping(&[0, 0, 1]);

        assert!(mapping.is_empty());
        assert!(faults.is_empty());
        assert_eq!(&[1u8], remainder);
    }

    #[test]
    #[traced_test]
    fn read_without_size() {
        let (mapping, remainder, faults) = read_mapping(&[7]);

        assert!(mapping.is_empty());
        assert!(remainder.is_empty());
        assert_eq!(
            vec![Error::FieldTooShort {
                field: "mapping",
                expected: 2,
                available: 1
            }],
            faults
        );
        assert!(logs_contain("mapping has no size prefix"));
    }

    #[test]
    fn read_size_past_data() {
        let mut raw = mapping_bytes(&[entry("a", "b")]);
        raw[1] += 10;

        let (mapping, remainder, faults) = read_mapping(&raw);

        assert_eq!(1, mapping.len());
        assert!(remainder.is_empty());
        assert_eq!(
            vec![Error::MalformedMapping(MappingFault::LengthExceedsData {
                declared: 16,
                available: 6
            })],
            faults
        );
    }

    #[test]
    fn read_missing_separator() {
        let mut broken = entry("b", "2");
        broken[2] = b':';
        let mut raw = mapping_bytes(&[entry("a", "1"), broken]);
        raw.extend_from_slice(&[9, 9]);

        let (mapping, remainder, faults) = read_mapping(&raw);

        assert_eq!(1, mapping.len());
        assert_eq!("1", mapping.get("a").unwrap().to_string());
        assert_eq!(&[9u8, 9], remainder);
        assert_eq!(
            vec![Error::MalformedMapping(MappingFault::MissingEquals {
                offset: 8
            })],
            faults
        );
    }

    #[test]
    fn read_truncated_value() {
        let mut raw = mapping_bytes(&[entry("key", "value")]);
        let declared = raw.len() - 2;
        raw.truncate(raw.len() - 3);
        raw[1] = (declared - 3) as u8;

        let (mapping, remainder, faults) = read_mapping(&raw);

        assert!(mapping.is_empty());
        assert!(remainder.is_empty());
        assert!(matches!(
            faults.as_slice(),
            [Error::MalformedMapping(MappingFault::BadEntry { offset: 5, .. })]
        ));
    }

    #[test]
    #[traced_test]
    fn read_duplicate_key() {
        let raw = mapping_bytes(&[entry("a", "1"), entry("a", "2"), entry("c", "3")]);

        let (mapping, _, faults) = read_mapping(&raw);

        assert_eq!(2, mapping.len());
        assert_eq!("1", mapping.get("a").unwrap().to_string());
        assert_eq!(
            vec![Error::MalformedMapping(MappingFault::DuplicateKey {
                key: "a".to_owned()
            })],
            faults
        );
        assert!(logs_contain("duplicate key in mapping"));
    }

    #[test]
    fn from_pairs_rejects_duplicates() {
        let err = Mapping::from_pairs([("host", "a"), ("host", "b")]).unwrap_err();

        assert_eq!(
            Error::MalformedMapping(MappingFault::DuplicateKey {
                key: "host".to_owned()
            }),
            err
        );
    }

    #[test]
    fn from_pairs_rejects_oversized() {
        let value = "v".repeat(255);
        let keys: Vec<String> = (0..300).map(|i| format!("k{i}")).collect();

        let err = Mapping::from_pairs(keys.iter().map(|k| (k.as_str(), value.as_str())))
            .unwrap_err();

        assert!(matches!(
            err,
            Error::MalformedMapping(MappingFault::TooLarge { .. })
        ));
    }

    #[test]
    fn wire_bytes() {
        let mapping = Mapping::from_pairs([("port", "9000"), ("host", "127.0.0.1")]).unwrap();

        assert_eq!(
            mapping_bytes(&[entry("port", "9000"), entry("host", "127.0.0.1")]),
            to_wire(&mapping).unwrap()
        );
        assert_eq!(vec![0, 0], to_wire(&Mapping::new()).unwrap());
    }
}
