//! CLI module - Command-line interface for Marquee
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};

/// Marquee - find movies you'll enjoy without the hassle
#[derive(Parser)]
#[command(name = "marquee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    #[command(alias = "web")]
    Serve {
        /// Port to listen on (overrides server.port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Search the catalog and count the search toward trending
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List popular movies
    #[command(alias = "d")]
    Discover,

    /// Show the most searched terms
    #[command(alias = "t")]
    Trending {
        /// Number of entries to show (1-20)
        #[arg(long, short)]
        limit: Option<u32>,
    },

    /// Type queries line by line and watch results update
    #[command(alias = "i")]
    Interactive,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
