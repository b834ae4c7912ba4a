use openssl::sha;
use std::{fmt, io::Read};

pub const HASH_LEN: usize = 32;

/// SHA-256 digest of some data.
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    pub fn as_byte_ref(&self) -> &[u8] {
        self.0.as_ref()
    }
}

pub fn hash_data(data: &[u8]) -> Hash {
    Hash(sha::sha256(data))
}

pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<Hash> {
    let mut hasher = sha::Sha256::new();
    let mut buf = [0u8; 1 << 12];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(Hash(hasher.finish()))
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::{hash_data, hash_reader};

    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn known_digest() {
        assert_eq!(ABC_SHA256, hash_data(b"abc").to_string());
    }

    #[test]
    fn reader_matches_data() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        let from_reader = hash_reader(data.as_slice()).unwrap();

        assert_eq!(hash_data(&data), from_reader);
        assert_eq!(32, from_reader.as_byte_ref().len());
    }
}
