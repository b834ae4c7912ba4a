use clap::{ArgGroup, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[clap(group(ArgGroup::new("input").required(true).args(["hex", "file"])))]
pub struct Config {
    /// router address bytes as a hex string
    #[clap(long, value_parser)]
    pub hex: Option<String>,

    /// file holding the raw router address bytes
    #[clap(short, long, value_parser)]
    pub file: Option<PathBuf>,

    /// log every decoding step
    #[clap(short, long)]
    pub verbose: bool,
}

impl Config {
    pub fn new() -> Config {
        Config::parse()
    }
}
