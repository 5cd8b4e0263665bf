//! CLI subcommand implementations for the `savi` binary.
//!
//! CLI argument parsing uses clap derive macros, with the top-level
//! [`app::Cli`] struct and [`app::Commands`] enum defined in [`app`].
//!
//! Each subcommand module follows the same pattern: an `Options` struct
//! holding the parsed arguments and a `pub fn execute(opts, writer) ->
//! Result<(), SavError>` entry point. The `writer: &mut dyn Write`
//! parameter allows output to be captured in tests or redirected to a file
//! via the global `--output` flag.
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `savi parse` | [`parse`] | Parse save file(s) and print the schema report |
//! | `savi records` | [`records`] | Trace the binary record stream record-by-record |
//! | `savi export` | [`export`] | Write canonical and raw JSON documents to a directory |

pub mod app;
pub mod export;
pub mod parse;
pub mod records;

/// Write a line to the given writer, converting io::Error to SavError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::SavError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::SavError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;
