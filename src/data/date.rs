use serde::{Serialize, Serializer};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::Error;

pub const DATE_SIZE: usize = 8;

/// Milliseconds since the Unix epoch in 8 big-endian bytes.
///
/// All zero bytes is not the epoch: it marks a date that never comes, which is
/// how a router address says it does not expire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Date([u8; DATE_SIZE]);

impl Date {
    pub fn never() -> Self {
        Self([0; DATE_SIZE])
    }

    pub fn from_millis(millis: u64) -> Self {
        Self(millis.to_be_bytes())
    }

    /// Times before the epoch saturate to zero, which reads back as [`Date::never`].
    pub fn from_system_time(time: SystemTime) -> Self {
        let millis = time
            .duration_since(UNIX_EPOCH)
            .map(|since| since.as_millis().min(u64::MAX as u128) as u64)
            .unwrap_or_default();

        Self::from_millis(millis)
    }

    pub fn millis(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    pub fn is_never(&self) -> bool {
        self.0 == [0; DATE_SIZE]
    }

    pub fn time(&self) -> Option<SystemTime> {
        if self.is_never() {
            return None;
        }

        UNIX_EPOCH.checked_add(Duration::from_millis(self.millis()))
    }

    pub fn expired_at(&self, now: SystemTime) -> bool {
        match self.time() {
            Some(expiration) => expiration <= now,
            None => false,
        }
    }

    pub fn bytes(&self) -> [u8; DATE_SIZE] {
        self.0
    }
}

/// Reads an 8 byte date from the front of `data`. Nothing is consumed on failure.
pub fn read_date(data: &[u8]) -> Result<(Date, &[u8]), Error> {
    if data.len() < DATE_SIZE {
        return Err(Error::FieldTooShort {
            field: "date",
            expected: DATE_SIZE,
            available: data.len(),
        });
    }

    let (head, remainder) = data.split_at(DATE_SIZE);
    let mut date = [0; DATE_SIZE];
    date.copy_from_slice(head);

    Ok((Date(date), remainder))
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(self.millis())
    }
}

#[cfg(test)]
mod tests {
    use super::{read_date, Date, DATE_SIZE};
    use crate::data::{to_wire, Error};
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    #[test]
    fn never_expires() {
        let (date, remainder) = read_date(&[0; 10]).unwrap();

        assert!(date.is_never());
        assert_eq!(None, date.time());
        assert!(!date.expired_at(SystemTime::now()));
        assert_eq!(&[0u8, 0], remainder);
    }

    #[test]
    fn millis_since_epoch() {
        let raw = 1_700_000_000_123u64.to_be_bytes();

        let (date, remainder) = read_date(&raw).unwrap();

        assert!(remainder.is_empty());
        assert_eq!(1_700_000_000_123, date.millis());
        assert_eq!(
            Some(UNIX_EPOCH + Duration::from_millis(1_700_000_000_123)),
            date.time()
        );
        assert!(date.expired_at(UNIX_EPOCH + Duration::from_secs(1_800_000_000)));
        assert!(!date.expired_at(UNIX_EPOCH + Duration::from_secs(1_600_000_000)));
    }

    #[test]
    fn too_short_consumes_nothing() {
        let err = read_date(&[1, 2, 3]).unwrap_err();

        assert_eq!(
            Error::FieldTooShort {
                field: "date",
                expected: DATE_SIZE,
                available: 3
            },
            err
        );
    }

    #[test]
    fn system_time() {
        let now = UNIX_EPOCH + Duration::from_millis(1_234_567);

        assert_eq!(Some(now), Date::from_system_time(now).time());
        assert!(Date::from_system_time(UNIX_EPOCH - Duration::from_secs(1)).is_never());
    }

    #[test]
    fn wire_bytes() {
        let date = Date::from_millis(0x0102_0304_0506_0708);

        assert_eq!(vec![1, 2, 3, 4, 5, 6, 7, 8], to_wire(&date).unwrap());
        assert_eq!(vec![0; DATE_SIZE], to_wire(&Date::never()).unwrap());
    }
}
