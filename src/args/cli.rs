use clap::Parser;

use super::defaults::{
    DEFAULT_HEIGHT, DEFAULT_HOST, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, DEFAULT_WIDTH,
};
use super::parsers::{parse_body_limit, parse_dimension, parse_host};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Small HTTP service that renders bar charts and date histograms as PNG images."
)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long = "host", default_value = DEFAULT_HOST, value_parser = parse_host)]
    pub host: String,

    /// Port to listen on
    #[arg(
        long = "port",
        short = 'p',
        env = "EASYCHART_PORT",
        default_value_t = DEFAULT_PORT
    )]
    pub port: u16,

    /// Path to config file (TOML or JSON). Defaults to ./easychart.toml or ./easychart.json
    #[arg(long = "config", short = 'c')]
    pub config: Option<String>,

    /// Chart width in pixels
    #[arg(long = "width", default_value_t = DEFAULT_WIDTH, value_parser = parse_dimension)]
    pub width: u32,

    /// Chart height in pixels
    #[arg(long = "height", default_value_t = DEFAULT_HEIGHT, value_parser = parse_dimension)]
    pub height: u32,

    /// Largest accepted request body, in bytes
    #[arg(
        long = "max-body-bytes",
        default_value_t = DEFAULT_MAX_BODY_BYTES,
        value_parser = parse_body_limit
    )]
    pub max_body_bytes: usize,

    /// Enable debug logging
    #[arg(long = "verbose", short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
