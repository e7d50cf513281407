pub mod sort_key;

pub use sort_key::SortKey;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use dotenv::dotenv;
use reqwest::Url;

use crate::post::PostId;

pub const DEFAULT_API: &str = "http://localhost:3000/blogs";

#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Base URL of the `blogs` resource
    #[arg(long, env = "BLOG_API", default_value = DEFAULT_API)]
    api: Url,
    /// Retry transient failures this many times
    #[arg(long, default_value = "0")]
    retries: u32,
    /// Request timeout in seconds
    #[arg(long, default_value = "10")]
    timeout: u64,
    /// Ordering of the post list
    #[arg(long, default_value = "date")]
    sort: SortKey,
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Browse posts interactively (default)
    Browse,
    /// Print one page of posts
    List {
        #[arg(short, long, default_value = "1")]
        page: usize,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show a single post
    Show { id: PostId },
    /// Create a post
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        content: String,
    },
    /// Update the title and/or content of a post
    Edit {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a post
    Delete { id: PostId },
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
    pub const fn api(&self) -> &Url {
        &self.api
    }
    pub const fn retries(&self) -> u32 {
        self.retries
    }
    pub const fn timeout(&self) -> u64 {
        self.timeout
    }
    pub const fn sort(&self) -> SortKey {
        self.sort
    }
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Browse)
    }
}
