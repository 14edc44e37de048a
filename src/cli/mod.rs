// Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cookmate")]
#[command(about = "Cookmate - recipe matching with dietary safety checks", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long, env = "HOST")]
        host: Option<String>,
    },

    /// Run database migrations
    Migrate,

    /// Import recipes from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },

    /// Add missing "-free" dietary tags across the corpus
    Tag {
        /// Report planned changes without writing
        #[arg(long)]
        dry: bool,

        /// Write the changes (wins over --dry)
        #[arg(long, alias = "force")]
        write: bool,

        /// Recipes per page
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Show tag usage, optionally with recipes carrying one tag
    CheckTags {
        /// Tag to look up, e.g. gluten-free
        #[arg(long)]
        tag: Option<String>,
    },

    /// Ask the assistant for recipe ideas
    Ask {
        /// Free-text request
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Rank recipes against pantry ingredients
    Match {
        /// Ingredients on hand
        #[arg(required = true, num_args = 1..)]
        items: Vec<String>,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<i64>,
    },
}
