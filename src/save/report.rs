//! Parse report aggregation.
//!
//! Summarizes one parse run for the caller: which probe recognized the
//! input, how the binary decode ended (if it ran), how many fields landed
//! in each canonical bucket, and any diagnostics raised along the way.

use serde::Serialize;

use crate::save::detect::Method;
use crate::save::record::TerminalState;
use crate::save::schema::CanonicalDocument;

/// Field count for one canonical bucket.
#[derive(Debug, Clone, Serialize)]
pub struct BucketCount {
    pub bucket: &'static str,
    pub fields: usize,
}

/// Summary of a single parse invocation.
#[derive(Debug, Clone, Serialize)]
pub struct ParseReport {
    pub method: Method,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_state: Option<TerminalState>,
    pub buckets: Vec<BucketCount>,
    pub unmapped_fields: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl ParseReport {
    /// Build a report from a mapped document.
    pub fn from_document(doc: &CanonicalDocument) -> Self {
        ParseReport {
            method: doc.meta.method,
            terminal_state: doc.meta.terminal_state,
            buckets: doc
                .bucket_counts()
                .iter()
                .map(|&(bucket, fields)| BucketCount { bucket, fields })
                .collect(),
            unmapped_fields: doc.unmapped.len(),
            diagnostics: doc.meta.diagnostics.clone(),
        }
    }

    /// Total fields mapped into the eight canonical buckets.
    pub fn mapped_fields(&self) -> usize {
        self.buckets.iter().map(|b| b.fields).sum()
    }
}
