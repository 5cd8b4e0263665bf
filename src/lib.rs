//! Game save-file inspection toolkit.
//!
//! The `saveinfo-utils` crate (library name `sav`) recovers structured
//! player-progression data from a save file whose encoding is unknown at
//! read time: plain JSON, gzip-compressed JSON, or a length/tag-prefixed
//! binary object-graph stream. The result is always a canonical
//! eight-bucket document (currencies, towers, cards, modules, labs,
//! relics, research, workshop upgrades) plus an `unmapped` bucket and
//! parse metadata; malformed input degrades to partial data with
//! diagnostics, never an error.
//!
//! # CLI Reference
//!
//! Install the `savi` binary and use its subcommands to work with save
//! files from the command line.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`savi parse`](cli::app::Commands::Parse) | Parse save file(s) and display the schema report |
//! | [`savi records`](cli::app::Commands::Records) | Trace the binary record stream record-by-record |
//! | [`savi export`](cli::app::Commands::Export) | Write the canonical and raw JSON documents to a directory |
//!
//! All subcommands accept `--color <auto|always|never>` and `--output <file>`.
//!
//! # Library API
//!
//! ```
//! let doc = sav::parse(br#"{"coins": 500, "towerLevel": 10}"#);
//! assert_eq!(doc.currencies["coins"], 500);
//! assert_eq!(doc.towers["towerLevel"], 10);
//! assert_eq!(doc.meta.method.as_str(), "json");
//! ```
//!
//! ## Module map
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`save::detect`] | Format detection (JSON / gzip+JSON / binary probes) |
//! | [`save::decoder`] | Binary record-stream decoder and string table |
//! | [`save::cursor`] | Bounds-checked byte cursor |
//! | [`save::record`] | Typed stream records and terminal states |
//! | [`save::schema`] | Canonical eight-bucket schema mapping |
//! | [`save::report`] | Per-parse summary report |
//! | [`save::constants`] | Record tags and decoder limits |

#[cfg(feature = "cli")]
pub mod cli;
pub mod save;
pub mod util;

pub use save::{parse, parse_file, parse_file_with_budget, parse_with_budget};

use thiserror::Error;

/// Errors returned by `sav` operations.
///
/// Parsing itself is total and never errors; these cover the I/O and
/// argument handling around it.
#[derive(Error, Debug)]
pub enum SavError {
    /// An I/O error occurred (file open, read, or write failure).
    #[error("I/O error: {0}")]
    Io(String),

    /// An invalid argument was supplied (bad option value, etc.).
    #[error("Invalid argument: {0}")]
    Argument(String),
}
