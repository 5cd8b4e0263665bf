//! Typed records of the binary save stream.
//!
//! Each record is one self-describing unit of the stream, beginning with a
//! one-byte type tag. [`Record`] preserves the byte offset at which the
//! record began so traces and diagnostics can point back into the file.
//! Records are append-only within one decode and never mutated afterwards.

use serde::Serialize;

use crate::util::hex::format_bytes;

/// Value carried by a tag-9 typed primitive record.
///
/// Only selectors 8 (i32) and 1 (bool) have a known body layout. Other
/// selectors are not length-prefixed in this format, so the decoder records
/// the selector and moves on without consuming a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum PrimitiveValue {
    Int32(i32),
    Bool(bool),
    /// Unrecognized type selector; no value bytes were consumed.
    Other(u8),
}

/// One decoded record of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Record {
    /// Tag 0: stream header with root/header object ids and a version pair.
    StreamHeader {
        offset: usize,
        root_id: i32,
        header_id: i32,
        version: String,
    },
    /// Tag 6: library or string record; registers `text` in the string table.
    LibraryString { offset: usize, id: i32, text: String },
    /// Tag 9: typed primitive value.
    Primitive { offset: usize, value: PrimitiveValue },
    /// Tag 12: composite object with a class name and named fields.
    ObjectWithMap {
        offset: usize,
        object_id: i32,
        class_name: String,
        field_names: Vec<String>,
        /// Set when the declared field count exceeded the remaining buffer
        /// and the field-id reads were capped.
        truncated_fields: bool,
    },
    /// Tags 13/14: reference to a previously registered object or string.
    MemberReference {
        offset: usize,
        ref_id: i32,
        resolved_name: String,
    },
    /// Tag 17: explicit end-of-stream marker.
    MessageEnd { offset: usize },
    /// Any other tag: recorded with up to 16 bytes of unconsumed context.
    Unknown {
        offset: usize,
        tag: u8,
        #[serde(serialize_with = "hex_preview")]
        preview: Vec<u8>,
    },
}

impl Record {
    /// Byte offset at which this record's tag byte sits.
    pub fn offset(&self) -> usize {
        match self {
            Record::StreamHeader { offset, .. }
            | Record::LibraryString { offset, .. }
            | Record::Primitive { offset, .. }
            | Record::ObjectWithMap { offset, .. }
            | Record::MemberReference { offset, .. }
            | Record::MessageEnd { offset }
            | Record::Unknown { offset, .. } => *offset,
        }
    }

    /// Short human-readable name for trace output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Record::StreamHeader { .. } => "StreamHeader",
            Record::LibraryString { .. } => "String",
            Record::Primitive { .. } => "Primitive",
            Record::ObjectWithMap { .. } => "ObjectWithMap",
            Record::MemberReference { .. } => "MemberReference",
            Record::MessageEnd { .. } => "MessageEnd",
            Record::Unknown { .. } => "Unknown",
        }
    }
}

/// One reconstructed composite object: id, class name, and field names in
/// declaration order. Field values are not part of this format's header
/// stream and are never attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectEntry {
    pub object_id: i32,
    pub class_name: String,
    pub field_names: Vec<String>,
}

/// How a single decode run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalState {
    /// Explicit end marker, or the buffer was fully consumed with no
    /// dangling partial record.
    Completed,
    /// The buffer ended inside a record body.
    Truncated,
    /// The record budget was exceeded before the buffer ended.
    Aborted,
}

impl TerminalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TerminalState::Completed => "completed",
            TerminalState::Truncated => "truncated",
            TerminalState::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for TerminalState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn hex_preview<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_and_type_name() {
        let rec = Record::MessageEnd { offset: 3 };
        assert_eq!(rec.offset(), 3);
        assert_eq!(rec.type_name(), "MessageEnd");
    }

    #[test]
    fn test_unknown_preview_serializes_as_hex() {
        let rec = Record::Unknown {
            offset: 0,
            tag: 0xFF,
            preview: vec![0xDE, 0xAD],
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["preview"], "dead");
        assert_eq!(json["type"], "Unknown");
    }

    #[test]
    fn test_terminal_state_display() {
        assert_eq!(TerminalState::Completed.to_string(), "completed");
        assert_eq!(TerminalState::Aborted.as_str(), "aborted");
    }
}
