#[cfg(not(feature = "cli"))]
compile_error!("The `savi` binary requires the `cli` feature. Build with `--features cli`.");

use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::process;

use sav::cli;
use sav::cli::app::{Cli, ColorMode, Commands};
use sav::SavError;

fn main() {
    let cli = Cli::parse();

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {} // colored auto-detects tty
    }

    let writer_result: Result<Box<dyn Write>, SavError> = match &cli.output {
        Some(path) => File::create(path)
            .map(|f| Box::new(f) as Box<dyn Write>)
            .map_err(|e| SavError::Io(format!("Cannot create {}: {}", path, e))),
        None => Ok(Box::new(std::io::stdout()) as Box<dyn Write>),
    };

    let mut writer = match writer_result {
        Ok(w) => w,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Parse {
            files,
            json,
            max_records,
        } => cli::parse::execute(
            &cli::parse::ParseOptions {
                files,
                json,
                max_records,
            },
            &mut writer,
        ),

        Commands::Records {
            file,
            limit,
            json,
            max_records,
        } => cli::records::execute(
            &cli::records::RecordsOptions {
                file,
                limit,
                json,
                max_records,
            },
            &mut writer,
        ),

        Commands::Export { file, out, pretty } => {
            cli::export::execute(&cli::export::ExportOptions { file, out, pretty }, &mut writer)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
