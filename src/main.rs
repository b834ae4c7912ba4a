mod config;

use anyhow::{bail, Context, Result};
use router_address::{data::hash_data, RouterAddress};
use tracing::{warn, Level};

fn main() -> Result<()> {
    let config = config::Config::new();

    tracing_subscriber::fmt()
        .with_max_level(if config.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .init();

    let data = match (&config.hex, &config.file) {
        (Some(hex), _) => hex::decode(hex.trim()).context("--hex is not a hex string")?,
        (None, Some(path)) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("no input given"),
    };

    let (address, remainder, _) = RouterAddress::read(&data);

    match address.cost() {
        Some(cost) => println!("cost            {cost}"),
        None => println!("cost            not decoded"),
    }
    match address.expiration() {
        Some(date) if date.is_never() => println!("expiration      never"),
        Some(date) => println!("expiration      {} ms", date.millis()),
        None => println!("expiration      not decoded"),
    }
    println!("transport_style {}", address.transport_style());
    for (key, value) in address.options().iter() {
        println!("  {key} = {value}");
    }
    if let Some(addr) = address.socket_addr() {
        println!("socket address  {addr}");
    }
    println!("sha256          {}", hash_data(&address.bytes()));

    if !remainder.is_empty() {
        warn!(remainder = remainder.len(), "trailing bytes after router address");
    }

    let (fault, fatal) = address.check_valid();
    for err in address.faults() {
        println!("fault           {err}");
    }
    if let (Some(err), true) = (fault, fatal) {
        return Err(err).context("router address is unusable");
    }

    Ok(())
}
