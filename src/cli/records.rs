use std::io::Write;

use colored::Colorize;

use crate::cli::wprintln;
use crate::save::constants::DEFAULT_MAX_RECORDS;
use crate::save::decoder;
use crate::save::record::{PrimitiveValue, Record};
use crate::util::hex::{format_offset, hex_line};
use crate::SavError;

/// Options for the records subcommand.
pub struct RecordsOptions {
    pub file: String,
    pub limit: Option<usize>,
    pub json: bool,
    pub max_records: Option<usize>,
}

/// Trace the binary record stream of a save file record-by-record.
///
/// The file is fed straight to the binary decoder regardless of what the
/// format probes would say, which makes this the tool for inspecting
/// streams the JSON probes reject. Each line shows the record's byte
/// offset, type, and decoded detail; unknown tags include a hex preview of
/// the following bytes. The trace ends with the terminal state and a
/// per-tag frequency summary.
pub fn execute(opts: &RecordsOptions, writer: &mut dyn Write) -> Result<(), SavError> {
    let data = std::fs::read(&opts.file)
        .map_err(|e| SavError::Io(format!("Cannot read {}: {}", opts.file, e)))?;

    let budget = opts.max_records.unwrap_or(DEFAULT_MAX_RECORDS);
    let decoded = decoder::decode_with_budget(&data, budget);

    if opts.json {
        let json = serde_json::to_string_pretty(&decoded)
            .map_err(|e| SavError::Io(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "Records in {} ({} bytes, budget {}):",
        opts.file,
        data.len(),
        budget
    )?;
    wprintln!(writer, "{}", "-".repeat(50))?;

    let limit = opts.limit.unwrap_or(usize::MAX);
    for rec in decoded.records.iter().take(limit) {
        print_record(writer, rec)?;
    }
    if decoded.records.len() > limit {
        wprintln!(writer, "  ... {} more records", decoded.records.len() - limit)?;
    }

    wprintln!(writer)?;
    wprintln!(
        writer,
        "Terminal state: {}",
        decoded.terminal_state.to_string().bold()
    )?;

    wprintln!(writer)?;
    wprintln!(writer, "{}", "Record Type Summary".bold())?;
    for (tag, count) in &decoded.record_type_counts {
        let label = if *count == 1 { "record" } else { "records" };
        wprintln!(writer, "  tag {:3} {:>8} {}", tag, count, label)?;
    }

    if !decoded.diagnostics.is_empty() {
        wprintln!(writer)?;
        wprintln!(writer, "{}", "Diagnostics".yellow().bold())?;
        for diag in &decoded.diagnostics {
            wprintln!(writer, "  {}", diag)?;
        }
    }
    Ok(())
}

fn print_record(writer: &mut dyn Write, rec: &Record) -> Result<(), SavError> {
    let offset = format_offset(rec.offset());
    match rec {
        Record::StreamHeader {
            root_id,
            header_id,
            version,
            ..
        } => wprintln!(
            writer,
            "  {:16} {:16} root={} header={} version={}",
            offset,
            rec.type_name(),
            root_id,
            header_id,
            version
        ),
        Record::LibraryString { id, text, .. } => wprintln!(
            writer,
            "  {:16} {:16} id={} {:?}",
            offset,
            rec.type_name(),
            id,
            text
        ),
        Record::Primitive { value, .. } => {
            let detail = match value {
                PrimitiveValue::Int32(v) => format!("i32 {}", v),
                PrimitiveValue::Bool(v) => format!("bool {}", v),
                PrimitiveValue::Other(sel) => format!("selector {} (no known body)", sel),
            };
            wprintln!(writer, "  {:16} {:16} {}", offset, rec.type_name(), detail)
        }
        Record::ObjectWithMap {
            object_id,
            class_name,
            field_names,
            truncated_fields,
            ..
        } => {
            let suffix = if *truncated_fields {
                " (field list truncated)"
            } else {
                ""
            };
            wprintln!(
                writer,
                "  {:16} {:16} id={} class={} fields=[{}]{}",
                offset,
                rec.type_name(),
                object_id,
                class_name,
                field_names.join(", "),
                suffix
            )
        }
        Record::MemberReference {
            ref_id,
            resolved_name,
            ..
        } => wprintln!(
            writer,
            "  {:16} {:16} id={} -> {}",
            offset,
            rec.type_name(),
            ref_id,
            resolved_name
        ),
        Record::MessageEnd { .. } => {
            wprintln!(writer, "  {:16} {:16}", offset, rec.type_name())
        }
        Record::Unknown { tag, preview, .. } => wprintln!(
            writer,
            "  {:16} {:16} tag={} {}",
            offset,
            rec.type_name(),
            tag,
            hex_line(preview)
        ),
    }
}
