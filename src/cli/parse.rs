use std::io::Write;

use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;

use crate::cli::wprintln;
use crate::save::constants::DEFAULT_MAX_RECORDS;
use crate::save::report::ParseReport;
use crate::SavError;

/// Options for the parse subcommand.
pub struct ParseOptions {
    pub files: Vec<String>,
    pub json: bool,
    pub max_records: Option<usize>,
}

/// JSON-serializable per-file report.
#[derive(Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    report: ParseReport,
}

/// Parse one or more save files and print the schema report for each.
///
/// Files are parsed in parallel: each parse invocation owns its own
/// buffers, so the only shared work is collecting the results back into
/// command-line order. The report shows which probe recognized the file
/// (`json`, `gzip_json`, `binary`, or `unknown`), the binary decoder's
/// terminal state when it ran, per-bucket field counts, and any
/// diagnostics raised during decoding. With `--json`, one report object
/// per file is emitted as a JSON array.
pub fn execute(opts: &ParseOptions, writer: &mut dyn Write) -> Result<(), SavError> {
    let budget = opts.max_records.unwrap_or(DEFAULT_MAX_RECORDS);

    let results: Vec<(String, Result<ParseReport, SavError>)> = opts
        .files
        .par_iter()
        .map(|file| {
            let report = crate::save::parse_file_with_budget(file, budget)
                .map(|doc| ParseReport::from_document(&doc));
            (file.clone(), report)
        })
        .collect();

    if opts.json {
        let mut reports = Vec::new();
        for (file, result) in results {
            reports.push(FileReport {
                file,
                report: result?,
            });
        }
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| SavError::Io(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    let mut first = true;
    for (file, result) in results {
        if !first {
            wprintln!(writer)?;
        }
        first = false;
        print_report(writer, &file, result?)?;
    }
    Ok(())
}

fn print_report(writer: &mut dyn Write, file: &str, report: ParseReport) -> Result<(), SavError> {
    wprintln!(writer, "{}", file.bold())?;
    wprintln!(writer, "{}", "-".repeat(50))?;
    wprintln!(writer, "  {:20} {}", "method", report.method)?;
    if let Some(state) = report.terminal_state {
        wprintln!(writer, "  {:20} {}", "terminal state", state)?;
    }

    wprintln!(writer)?;
    wprintln!(writer, "{}", "Schema Summary".bold())?;
    for bucket in &report.buckets {
        let label = if bucket.fields == 1 { "field" } else { "fields" };
        wprintln!(writer, "  {:20} {:>6} {}", bucket.bucket, bucket.fields, label)?;
    }
    let label = if report.unmapped_fields == 1 {
        "field"
    } else {
        "fields"
    };
    wprintln!(
        writer,
        "  {:20} {:>6} {}",
        "unmapped",
        report.unmapped_fields,
        label
    )?;

    if !report.diagnostics.is_empty() {
        wprintln!(writer)?;
        wprintln!(writer, "{}", "Diagnostics".yellow().bold())?;
        for diag in &report.diagnostics {
            wprintln!(writer, "  {}", diag)?;
        }
    }
    Ok(())
}
