use crate::cli::{Commands, HELP_TEMPLATE};
use crate::pickle_engine::constants::DEFAULT_MAX_PICKLE_SIZE;
use crate::utils::parse_buffer_size;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    // Obtain during build time, not runtime
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
#[command(
    after_help = HELP_TEMPLATE.replace("%BINARY_NAME%", env!("CARGO_PKG_NAME"))
)]
pub struct Cli {
    /// The pickle file (created automatically by `append`).
    #[arg(
        value_name = "pickle-file",
        help = "Path to a file of back-to-back pickles. `append` creates it if it does not exist."
    )]
    pub file: PathBuf,

    /// Largest pickle accepted when writing or scanning (e.g. 64k, 16mb)
    #[arg(
        long = "max-size",
        value_name = "SIZE",
        global = true,
        value_parser = parse_buffer_size,
        default_value_t = DEFAULT_MAX_PICKLE_SIZE
    )]
    pub max_size: usize,

    #[command(subcommand)]
    pub command: Commands,
}
