pub mod data;
pub mod router_address;

pub use router_address::RouterAddress;
