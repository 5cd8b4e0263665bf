use std::io::Write;
use std::path::Path;

use crate::cli::wprintln;
use crate::save::report::ParseReport;
use crate::SavError;

/// Options for the export subcommand.
pub struct ExportOptions {
    pub file: String,
    pub out: String,
    pub pretty: bool,
}

/// Parse a save file and write two JSON documents to the output directory:
/// `playerInfo.json` (the canonical eight-bucket schema) and
/// `playerInfo_raw.json` (the unmapped leftovers). The parse report is
/// printed to the writer; `meta` stays out of the exported schema file so
/// downstream consumers see only save data.
pub fn execute(opts: &ExportOptions, writer: &mut dyn Write) -> Result<(), SavError> {
    let doc = crate::save::parse_file(&opts.file)?;

    std::fs::create_dir_all(&opts.out)
        .map_err(|e| SavError::Io(format!("Cannot create {}: {}", opts.out, e)))?;

    let mut schema = serde_json::to_value(&doc)
        .map_err(|e| SavError::Io(format!("JSON serialization error: {}", e)))?;
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("meta");
    }
    let raw = serde_json::Value::Object(doc.unmapped.clone());

    let schema_path = Path::new(&opts.out).join("playerInfo.json");
    let raw_path = Path::new(&opts.out).join("playerInfo_raw.json");
    write_json(&schema_path, &schema, opts.pretty)?;
    write_json(&raw_path, &raw, opts.pretty)?;

    wprintln!(writer, "Wrote {}", schema_path.display())?;
    wprintln!(writer, "Wrote {}", raw_path.display())?;

    let report = ParseReport::from_document(&doc);
    wprintln!(
        writer,
        "Parsed {} via {}: {} mapped, {} unmapped",
        opts.file,
        report.method,
        report.mapped_fields(),
        report.unmapped_fields
    )?;
    for diag in &report.diagnostics {
        wprintln!(writer, "  {}", diag)?;
    }
    Ok(())
}

fn write_json(path: &Path, value: &serde_json::Value, pretty: bool) -> Result<(), SavError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| SavError::Io(format!("JSON serialization error: {}", e)))?;
    std::fs::write(path, text)
        .map_err(|e| SavError::Io(format!("Cannot write {}: {}", path.display(), e)))
}
