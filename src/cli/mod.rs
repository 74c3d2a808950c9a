//! CLI module for Course Library
//!
//! - `serve`: HTTP API for the chat adapter and the admin dashboard
//! - `seed`: replace taxonomy documents from a JSON file
//! - `resolve`: print the options a lookup key resolves to

pub mod resolve;
pub mod seed;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Course Library - taxonomy navigation and file curation backend
#[derive(Parser)]
#[command(name = "course-library")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Replace taxonomy documents from a JSON file
    Seed {
        /// File holding an object keyed by document id (programs, terms, subjects, lectures)
        file: PathBuf,
    },

    /// Print the options stored under a key of a taxonomy document
    Resolve {
        /// Document id: programs, terms, subjects or lectures
        doc_id: String,

        /// Lookup key, e.g. `cs_term1`; ignored for `programs`
        #[arg(default_value = "")]
        key: String,
    },
}

/// Loads `.env` and the layered configuration, then initializes logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    logging::init_logging(&config.logging);
    config
}
