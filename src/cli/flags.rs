use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "local-scout",
    version,
    about = "Local business search with a global search throttle"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to config file (TOML). Default: config/localscout.toml
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Increase verbosity (debug, trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log file path
    #[arg(long, default_value = "data/localscout.log", global = true)]
    pub log_file: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for local businesses
    Search {
        /// What to look for, e.g. "plumbers"
        query: String,
        /// Town, city or postcode
        #[arg(long)]
        location: Option<String>,
        /// Maximum results (defaults to search.default_limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Locale for user-facing messages
        #[arg(long)]
        locale: Option<String>,
        /// Issue the same search several times through one throttle
        #[arg(long, default_value_t = 1)]
        repeat: usize,
        /// Pause between repeated searches
        #[arg(long, default_value_t = 0)]
        pause_ms: u64,
    },
    /// Show the credits balance for a user
    Credits {
        #[arg(long)]
        user: Option<String>,
    },
    /// Print a translation dictionary, or a single key from it
    Dict {
        /// Locale code; unknown codes fall back to the default locale
        #[arg(long)]
        locale: Option<String>,
        /// Dotted key, e.g. nav.pricing
        #[arg(long)]
        key: Option<String>,
    },
    /// Generate sitemap.xml for every route and locale
    Sitemap {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}
