pub mod config;
pub mod db;
pub mod error;

// Recipe documents and import
pub mod corpus;

// Dietary lexicon, classifier and tagger
pub mod dietary;

// Request-time matching
pub mod assistant;
pub mod ranking;

// Interfaces
pub mod api;
pub mod cli;

// Utilities
pub mod utils;

// Re-exports
pub use config::Settings;
pub use error::{Error, Result};
