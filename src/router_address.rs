//! The RouterAddress structure: how to contact a router over one transport.
//!
//! ```text
//! +----+----+----+----+----+----+----+----+
//! |cost|           expiration
//! +----+----+----+----+----+----+----+----+
//!      |        transport_style           |
//! +----+----+----+----+-//-+----+----+----+
//! |                                       |
//! +                                       +
//! |               options                 |
//! ~                                       ~
//! |                                       |
//! +----+----+----+----+----+----+----+----+
//! ```
//!
//! `cost` is a 1 byte integer, 0 is free and 255 expensive. `expiration` is a
//! date, all zeros meaning the address never expires. `transport_style` is a
//! length prefixed string naming the transport and `options` is a mapping of
//! transport specific parameters such as host and port.

use serde::ser::SerializeTuple;
use serde::{Serialize, Serializer};
use std::net::{IpAddr, SocketAddr};
use tracing::{debug, error};

use crate::data::{
    read_date, read_integer, read_mapping, read_string, to_wire, Date, Error, I2PString, Integer,
    Mapping,
};

const COST_SIZE: usize = 1;

const HOST_OPTION: &str = "host";
const PORT_OPTION: &str = "port";

/// A field left as `None` was never decoded. That is different from an
/// expiration of [`Date::never`], which is a value read off the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterAddress {
    cost: Option<Integer>,
    expiration: Option<Date>,
    transport_style: I2PString,
    options: Mapping,
    faults: Vec<Error>,
}

impl RouterAddress {
    pub fn new(
        cost: u8,
        expiration: Date,
        transport_style: &str,
        options: Mapping,
    ) -> Result<Self, Error> {
        Ok(Self {
            cost: Some(Integer::from(cost)),
            expiration: Some(expiration),
            transport_style: I2PString::new(transport_style)?,
            options,
            faults: Vec::new(),
        })
    }

    /// Reads a router address from the front of `data` and returns it with the
    /// unread remainder.
    ///
    /// A field that fails to decode does not stop the read, but it takes the
    /// rest of the buffer with it: the bytes after it can no longer be placed.
    /// Every later field is still attempted on the empty remainder, so it stays
    /// unset and records its own fault. The returned fault is the last one
    /// recorded; [`RouterAddress::faults`] has all of them.
    pub fn read(data: &[u8]) -> (Self, &[u8], Option<Error>) {
        let mut router_address = Self::blank();

        if data.is_empty() {
            error!(at = "RouterAddress::read", "no data");
            let err = Error::EmptyInput {
                structure: "router address",
            };
            router_address.faults.push(err.clone());
            return (router_address, data, Some(err));
        }

        let mut remainder = data;

        router_address.cost =
            router_address.read_field("cost", &mut remainder, |d| read_integer(d, COST_SIZE));
        router_address.expiration =
            router_address.read_field("expiration", &mut remainder, read_date);
        router_address.transport_style = router_address
            .read_field("transport_style", &mut remainder, read_string)
            .unwrap_or_default();

        let (options, rest, faults) = read_mapping(remainder);
        router_address.options = options;
        remainder = rest;
        for err in faults {
            router_address.record_fault("options", err);
        }

        debug!(
            cost = router_address.cost(),
            transport_style = %router_address.transport_style,
            options = router_address.options.len(),
            faults = router_address.faults.len(),
            remainder = remainder.len(),
            "read router address"
        );

        let fault = router_address.parse_fault().cloned();
        (router_address, remainder, fault)
    }

    fn blank() -> Self {
        Self {
            cost: None,
            expiration: None,
            transport_style: I2PString::default(),
            options: Mapping::default(),
            faults: Vec::new(),
        }
    }

    fn read_field<'a, T, F>(
        &mut self,
        field: &'static str,
        remainder: &mut &'a [u8],
        read: F,
    ) -> Option<T>
    where
        F: FnOnce(&'a [u8]) -> Result<(T, &'a [u8]), Error>,
    {
        match read(*remainder) {
            Ok((value, rest)) => {
                *remainder = rest;
                Some(value)
            }
            Err(err) => {
                self.record_fault(field, err);
                *remainder = &remainder[remainder.len()..];
                None
            }
        }
    }

    fn record_fault(&mut self, field: &'static str, err: Error) {
        error!(
            at = "RouterAddress::read",
            reason = field,
            error = %err,
            "error parsing router address"
        );
        self.faults.push(err);
    }

    /// Wire bytes of this address.
    ///
    /// The first field that is missing (never decoded, or a transport style
    /// without payload) is logged and ends the encoding early: the bytes of the
    /// fields before it are still returned. Recorded parse faults are not
    /// looked at.
    pub fn bytes(&self) -> Vec<u8> {
        match to_wire(self) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(error = %err, "RouterAddress::bytes: encoding failed");
                Vec::new()
            }
        }
    }

    pub fn cost(&self) -> Option<u8> {
        self.cost.map(|cost| cost.int() as u8)
    }

    pub fn expiration(&self) -> Option<Date> {
        self.expiration
    }

    pub fn transport_style(&self) -> I2PString {
        self.transport_style.clone()
    }

    pub fn options(&self) -> Mapping {
        self.options.clone()
    }

    pub fn option(&self, key: &str) -> Option<String> {
        self.options.get(key).map(ToString::to_string)
    }

    pub fn host(&self) -> Option<IpAddr> {
        self.option(HOST_OPTION)?.parse().ok()
    }

    pub fn port(&self) -> Option<u16> {
        self.option(PORT_OPTION)?.parse().ok()
    }

    pub fn socket_addr(&self) -> Option<SocketAddr> {
        Some(SocketAddr::new(self.host()?, self.port()?))
    }

    pub fn parse_fault(&self) -> Option<&Error> {
        self.faults.last()
    }

    pub fn faults(&self) -> &[Error] {
        &self.faults
    }

    /// Returns the parse fault, and whether it makes the address unusable.
    ///
    /// Any fault recorded while reading is fatal. There is no size based check:
    /// a record too short to hold every field already carries a fault.
    pub fn check_valid(&self) -> (Option<Error>, bool) {
        match self.parse_fault() {
            Some(err) => (Some(err.clone()), true),
            None => (None, false),
        }
    }
}

/// The zero value: free, never expiring, no transport style and no options.
impl Default for RouterAddress {
    fn default() -> Self {
        Self {
            cost: Some(Integer::from(0u8)),
            expiration: Some(Date::never()),
            ..Self::blank()
        }
    }
}

impl Serialize for RouterAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tup = serializer.serialize_tuple(4)?;

        let Some(cost) = &self.cost else {
            error!("RouterAddress::bytes: cost was never decoded");
            return tup.end();
        };
        tup.serialize_element(cost)?;

        let Some(expiration) = &self.expiration else {
            error!("RouterAddress::bytes: expiration was never decoded");
            return tup.end();
        };
        tup.serialize_element(expiration)?;

        if let Err(err) = self.transport_style.payload() {
            error!(
                error = %err,
                "RouterAddress::bytes: error getting transport_style bytes"
            );
            return tup.end();
        }

        tup.serialize_element(&self.transport_style)?;
        tup.serialize_element(&self.options)?;
        tup.end()
    }
}
