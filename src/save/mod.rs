//! Save-file recovery pipeline.
//!
//! Raw bytes flow strictly one way: format detection ([`detect`]) picks the
//! first probe that recognizes the input (JSON, gzip+JSON, or the binary
//! record stream in [`decoder`]), the schema mapper ([`schema`]) normalizes
//! the result into the canonical eight-bucket document, and [`report`]
//! summarizes the run. [`parse`] ties the pipeline together and is total:
//! any byte sequence, including empty input, yields a document.
//!
//! Each call owns its own cursor, string table, and result buffers, so
//! separate buffers can be parsed on separate threads with no
//! synchronization.

pub mod constants;
pub mod cursor;
pub mod decoder;
pub mod detect;
pub mod record;
pub mod report;
pub mod schema;

use crate::SavError;
use self::constants::DEFAULT_MAX_RECORDS;
use self::schema::CanonicalDocument;

/// Parse a raw save buffer into the canonical document. Never fails.
pub fn parse(data: &[u8]) -> CanonicalDocument {
    parse_with_budget(data, DEFAULT_MAX_RECORDS)
}

/// [`parse`] with an explicit record budget for the binary decoder.
pub fn parse_with_budget(data: &[u8], max_records: usize) -> CanonicalDocument {
    let (doc, method) =
        detect::detect_with_budget(data, |bytes| decoder::decode_with_budget(bytes, max_records));
    schema::map_document(doc, method)
}

/// Read a whole file into memory and parse it. I/O is the only failure.
pub fn parse_file<P: AsRef<std::path::Path>>(path: P) -> Result<CanonicalDocument, SavError> {
    parse_file_with_budget(path, DEFAULT_MAX_RECORDS)
}

/// [`parse_file`] with an explicit record budget.
pub fn parse_file_with_budget<P: AsRef<std::path::Path>>(
    path: P,
    max_records: usize,
) -> Result<CanonicalDocument, SavError> {
    let path = path.as_ref();
    let data = std::fs::read(path)
        .map_err(|e| SavError::Io(format!("Cannot read {}: {}", path.display(), e)))?;
    Ok(parse_with_budget(&data, max_records))
}
