pub mod format;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use dotenv::dotenv;
use std::{path::PathBuf, time::Duration};

pub use format::Format;

pub const DEFAULT_ENDPOINT: &str = "https://graphql.datocms.com/";

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Your DatoCMS read-only API token
    #[arg(long, env = "DATOCMS_API_TOKEN", hide_env_values = true)]
    token: String,
    /// GraphQL endpoint of the content service
    #[arg(long, env = "DATOCMS_API_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,
    /// Retries for transient request failures, none by default
    #[arg(long, default_value = "0")]
    retries: u32,
    #[command(subcommand)]
    pub command: Command,
    #[command(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List published posts, newest first
    List,
    /// Print a single published post
    Show {
        slug: String,
        #[arg(short, long, default_value = "html")]
        format: Format,
    },
    /// Write every published post and an index to a directory
    Export {
        #[arg(short, long, default_value = "./blog", env = "OUTPUT")]
        output: PathBuf,
        #[arg(short, long, default_value = "html")]
        format: Format,
    },
    /// Dump the unprocessed response of the content service
    Raw,
}

impl Config {
    /// Parse the configuration from the environment and command line arguments
    pub fn parse() -> Self {
        dotenv().ok();
        <Self as Parser>::parse()
    }
    /// Create a logger with the configured verbosity level
    pub fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbose.log_level_filter())
            .format_target(false)
            .init();
    }
    /// Value for the `Authorization` header
    pub fn authorization(&self) -> String {
        if self.token.starts_with("Bearer ") {
            self.token.clone()
        } else {
            format!("Bearer {}", self.token)
        }
    }
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
    pub const fn retries(&self) -> u32 {
        self.retries
    }
}
