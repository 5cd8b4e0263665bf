//! Binary record-stream decoder.
//!
//! Walks a tagged record stream one record at a time, maintaining a
//! forward-reference string table and reconstructing the object graph from
//! id-based references. The decoder is total: malformed input degrades to a
//! partial [`BinaryDecode`] with a `Truncated` or `Aborted` terminal state,
//! never an error. Termination is guaranteed for any finite input because
//! every step advances the cursor by at least the tag byte and the record
//! budget caps the step count.
//!
//! Composite object field *values* are not decoded here. Only field names
//! are resolved into the object graph; the header stream does not describe
//! a value layout this decoder could safely align to.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::save::constants::*;
use crate::save::cursor::Cursor;
use crate::save::record::{ObjectEntry, PrimitiveValue, Record, TerminalState};

/// Id-indexed cache of decoded strings.
///
/// Populated only by tag-6 records and never pruned. Lookups for ids that
/// were never registered synthesize a placeholder name rather than failing,
/// since a malformed stream may reference strings it never carried.
#[derive(Debug, Default)]
pub struct StringTable {
    entries: HashMap<i32, String>,
}

impl StringTable {
    pub fn insert(&mut self, id: i32, text: String) {
        self.entries.insert(id, text);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a field-name id, or `field_<id>` if unregistered.
    pub fn field(&self, id: i32) -> String {
        self.resolve(id, "field")
    }

    /// Resolve a class-name id, or `class_<id>` if unregistered.
    pub fn class(&self, id: i32) -> String {
        self.resolve(id, "class")
    }

    /// Resolve a member-reference id, or `ref_<id>` if unregistered.
    pub fn reference(&self, id: i32) -> String {
        self.resolve(id, "ref")
    }

    fn resolve(&self, id: i32, placeholder: &str) -> String {
        match self.entries.get(&id) {
            Some(s) => s.clone(),
            None => format!("{}_{}", placeholder, id),
        }
    }
}

/// Result of one binary decode run.
#[derive(Debug, Clone, Serialize)]
pub struct BinaryDecode {
    /// Every record decoded, in stream order.
    pub records: Vec<Record>,
    /// Frequency of each raw tag byte seen.
    pub record_type_counts: BTreeMap<u8, u32>,
    /// Reconstructed composite objects, in first-seen order. A duplicate
    /// object id replaces the earlier entry in place.
    pub objects: Vec<ObjectEntry>,
    /// How the run ended.
    pub terminal_state: TerminalState,
    /// Human-readable notes raised during decoding (capped field lists,
    /// truncation point, budget exhaustion).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Decode a record stream with the default record budget.
pub fn decode(data: &[u8]) -> BinaryDecode {
    decode_with_budget(data, DEFAULT_MAX_RECORDS)
}

/// Decode a record stream, emitting at most `max_records + 1` records
/// before giving up with an `Aborted` terminal state.
pub fn decode_with_budget(data: &[u8], max_records: usize) -> BinaryDecode {
    let mut cur = Cursor::new(data);
    let mut strings = StringTable::default();
    let mut out = BinaryDecode {
        records: Vec::new(),
        record_type_counts: BTreeMap::new(),
        objects: Vec::new(),
        terminal_state: TerminalState::Completed,
        diagnostics: Vec::new(),
    };

    loop {
        let offset = cur.position();
        let tag = match cur.read_u8() {
            Some(t) => t,
            // Fully consumed with no dangling partial record. The format
            // does not require an explicit terminator.
            None => break,
        };
        *out.record_type_counts.entry(tag).or_insert(0) += 1;

        match tag {
            TAG_STREAM_HEADER => {
                let (root_id, header_id, major, minor) = match (
                    cur.read_i32(),
                    cur.read_i32(),
                    cur.read_i32(),
                    cur.read_i32(),
                ) {
                    (Some(a), Some(b), Some(c), Some(d)) => (a, b, c, d),
                    _ => {
                        out.truncate_at(offset, "stream header");
                        break;
                    }
                };
                out.records.push(Record::StreamHeader {
                    offset,
                    root_id,
                    header_id,
                    version: format!("{}.{}", major, minor),
                });
            }
            TAG_STRING => {
                let (id, len) = match (cur.read_i32(), cur.read_i32()) {
                    (Some(id), Some(len)) => (id, len),
                    _ => {
                        out.truncate_at(offset, "string header");
                        break;
                    }
                };
                // A negative declared length is as unusable as one past
                // the end of the buffer.
                let bytes = match usize::try_from(len).ok().and_then(|n| cur.read_bytes(n)) {
                    Some(b) => b,
                    None => {
                        out.truncate_at(offset, "string body");
                        break;
                    }
                };
                let text = String::from_utf8_lossy(bytes).into_owned();
                strings.insert(id, text.clone());
                out.records.push(Record::LibraryString { offset, id, text });
            }
            TAG_PRIMITIVE => {
                let selector = match cur.read_u8() {
                    Some(s) => s,
                    None => {
                        out.truncate_at(offset, "primitive selector");
                        break;
                    }
                };
                let value = match selector {
                    PRIM_INT32 => match cur.read_i32() {
                        Some(v) => PrimitiveValue::Int32(v),
                        None => {
                            out.truncate_at(offset, "i32 primitive");
                            break;
                        }
                    },
                    PRIM_BOOL => match cur.read_u8() {
                        Some(v) => PrimitiveValue::Bool(v != 0),
                        None => {
                            out.truncate_at(offset, "bool primitive");
                            break;
                        }
                    },
                    // Unknown selectors are not length-prefixed, so there
                    // is no safe skip; record the selector and move on.
                    other => PrimitiveValue::Other(other),
                };
                out.records.push(Record::Primitive { offset, value });
            }
            TAG_OBJECT_WITH_MAP => {
                let (object_id, class_id, field_count) =
                    match (cur.read_i32(), cur.read_i32(), cur.read_i32()) {
                        (Some(a), Some(b), Some(c)) => (a, b, c),
                        _ => {
                            out.truncate_at(offset, "object header");
                            break;
                        }
                    };
                let declared = usize::try_from(field_count).unwrap_or(0);
                let capacity = cur.remaining() / 4;
                let take = declared.min(capacity);
                let truncated_fields = take < declared;
                if truncated_fields {
                    out.diagnostics.push(format!(
                        "object {} declared {} fields, only {} fit in the remaining buffer",
                        object_id, declared, take
                    ));
                }
                let mut field_names = Vec::with_capacity(take);
                for _ in 0..take {
                    match cur.read_i32() {
                        Some(fid) => field_names.push(strings.field(fid)),
                        None => break,
                    }
                }
                let class_name = strings.class(class_id);
                out.upsert_object(ObjectEntry {
                    object_id,
                    class_name: class_name.clone(),
                    field_names: field_names.clone(),
                });
                out.records.push(Record::ObjectWithMap {
                    offset,
                    object_id,
                    class_name,
                    field_names,
                    truncated_fields,
                });
            }
            TAG_MEMBER_REF | TAG_MEMBER_REF_ALT => {
                let ref_id = match cur.read_i32() {
                    Some(v) => v,
                    None => {
                        out.truncate_at(offset, "member reference");
                        break;
                    }
                };
                out.records.push(Record::MemberReference {
                    offset,
                    ref_id,
                    resolved_name: strings.reference(ref_id),
                });
            }
            TAG_MESSAGE_END => {
                out.records.push(Record::MessageEnd { offset });
                break;
            }
            other => {
                // Resynchronization: keep only the tag byte consumed and
                // try the next byte as a fresh tag. Forward progress is
                // one byte per step in the worst case.
                out.records.push(Record::Unknown {
                    offset,
                    tag: other,
                    preview: cur.peek(UNKNOWN_PREVIEW_LEN).to_vec(),
                });
            }
        }

        if out.records.len() > max_records {
            out.terminal_state = TerminalState::Aborted;
            out.diagnostics.push(format!(
                "record budget of {} exceeded at offset {}",
                max_records,
                cur.position()
            ));
            break;
        }
    }

    out
}

impl BinaryDecode {
    fn truncate_at(&mut self, offset: usize, what: &str) {
        self.terminal_state = TerminalState::Truncated;
        self.diagnostics
            .push(format!("buffer ended inside {} at offset {}", what, offset));
    }

    fn upsert_object(&mut self, entry: ObjectEntry) {
        match self
            .objects
            .iter_mut()
            .find(|o| o.object_id == entry.object_id)
        {
            Some(slot) => *slot = entry,
            None => self.objects.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le32(v: i32) -> [u8; 4] {
        v.to_le_bytes()
    }

    fn string_record(id: i32, text: &str) -> Vec<u8> {
        let mut buf = vec![TAG_STRING];
        buf.extend_from_slice(&le32(id));
        buf.extend_from_slice(&le32(text.len() as i32));
        buf.extend_from_slice(text.as_bytes());
        buf
    }

    #[test]
    fn test_string_table_placeholders() {
        let mut table = StringTable::default();
        assert!(table.is_empty());
        table.insert(1, "Coins".to_string());
        assert_eq!(table.len(), 1);
        assert_eq!(table.field(1), "Coins");
        assert_eq!(table.class(2), "class_2");
        assert_eq!(table.reference(3), "ref_3");
    }

    #[test]
    fn test_header_then_end() {
        let mut buf = vec![TAG_STREAM_HEADER];
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(2));
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(0));
        buf.push(TAG_MESSAGE_END);

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        assert_eq!(out.records.len(), 2);
        assert_eq!(
            out.records[0],
            Record::StreamHeader {
                offset: 0,
                root_id: 1,
                header_id: 2,
                version: "1.0".to_string(),
            }
        );
        assert_eq!(out.records[1], Record::MessageEnd { offset: 17 });
    }

    #[test]
    fn test_lone_header_tag_truncates() {
        let out = decode(&[TAG_STREAM_HEADER]);
        assert_eq!(out.terminal_state, TerminalState::Truncated);
        assert!(out.records.is_empty());
        assert_eq!(out.record_type_counts[&TAG_STREAM_HEADER], 1);
    }

    #[test]
    fn test_string_registration_resolves_fields() {
        let mut buf = string_record(5, "Health");
        // Object 1, class id 5 ("Health"), one field also id 5.
        buf.push(TAG_OBJECT_WITH_MAP);
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(5));
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(5));

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        assert_eq!(out.objects.len(), 1);
        assert_eq!(out.objects[0].class_name, "Health");
        assert_eq!(out.objects[0].field_names, vec!["Health".to_string()]);
    }

    #[test]
    fn test_unresolved_field_gets_placeholder() {
        let mut buf = vec![TAG_OBJECT_WITH_MAP];
        buf.extend_from_slice(&le32(7));
        buf.extend_from_slice(&le32(99));
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(42));

        let out = decode(&buf);
        assert_eq!(out.objects[0].class_name, "class_99");
        assert_eq!(out.objects[0].field_names, vec!["field_42".to_string()]);
    }

    #[test]
    fn test_every_unknown_byte_is_one_record() {
        let buf = vec![0xFFu8; 200];
        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        assert_eq!(out.records.len(), 200);
        assert_eq!(out.record_type_counts[&0xFF], 200);
        for rec in &out.records {
            assert!(matches!(rec, Record::Unknown { tag: 0xFF, .. }));
        }
    }

    #[test]
    fn test_unknown_preview_is_not_consumed() {
        let buf = [0xAB, 0x01, 0x02, 0x03];
        let out = decode(&buf);
        // 0xAB unknown with preview of the rest, then 0x01/0x02/0x03 each
        // decode as their own (unknown or primitive-shaped) records.
        match &out.records[0] {
            Record::Unknown { tag, preview, .. } => {
                assert_eq!(*tag, 0xAB);
                assert_eq!(preview, &vec![0x01, 0x02, 0x03]);
            }
            other => panic!("expected Unknown, got {:?}", other),
        }
        assert_eq!(out.records[0].offset(), 0);
        assert_eq!(out.records[1].offset(), 1);
    }

    #[test]
    fn test_budget_aborts() {
        let buf = vec![0xEEu8; 50];
        let out = decode_with_budget(&buf, 10);
        assert_eq!(out.terminal_state, TerminalState::Aborted);
        assert_eq!(out.records.len(), 11);
        assert!(out.diagnostics.iter().any(|d| d.contains("budget")));
    }

    #[test]
    fn test_string_length_past_end_truncates() {
        let mut buf = vec![TAG_STRING];
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(1000));
        buf.extend_from_slice(b"short");

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Truncated);
        assert!(out.records.is_empty());
    }

    #[test]
    fn test_negative_string_length_truncates() {
        let mut buf = vec![TAG_STRING];
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(-4));

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Truncated);
    }

    #[test]
    fn test_invalid_utf8_is_replaced_not_fatal() {
        let mut buf = vec![TAG_STRING];
        buf.extend_from_slice(&le32(3));
        buf.extend_from_slice(&le32(2));
        buf.extend_from_slice(&[0xFF, 0xFE]);

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        match &out.records[0] {
            Record::LibraryString { text, .. } => {
                assert_eq!(text, "\u{FFFD}\u{FFFD}");
            }
            other => panic!("expected LibraryString, got {:?}", other),
        }
    }

    #[test]
    fn test_primitives() {
        let mut buf = vec![TAG_PRIMITIVE, PRIM_INT32];
        buf.extend_from_slice(&le32(1234));
        buf.extend_from_slice(&[TAG_PRIMITIVE, PRIM_BOOL, 1]);
        buf.extend_from_slice(&[TAG_PRIMITIVE, 0x21]);

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        assert_eq!(
            out.records[0],
            Record::Primitive {
                offset: 0,
                value: PrimitiveValue::Int32(1234)
            }
        );
        assert_eq!(
            out.records[1],
            Record::Primitive {
                offset: 6,
                value: PrimitiveValue::Bool(true)
            }
        );
        // Unknown selector consumes no body bytes.
        assert_eq!(
            out.records[2],
            Record::Primitive {
                offset: 9,
                value: PrimitiveValue::Other(0x21)
            }
        );
    }

    #[test]
    fn test_field_count_capped_by_remaining_bytes() {
        let mut buf = vec![TAG_OBJECT_WITH_MAP];
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(2));
        buf.extend_from_slice(&le32(100)); // declares 100 fields
        buf.extend_from_slice(&le32(10)); // only one fits
        let out = decode(&buf);

        match &out.records[0] {
            Record::ObjectWithMap {
                field_names,
                truncated_fields,
                ..
            } => {
                assert_eq!(field_names.len(), 1);
                assert!(truncated_fields);
            }
            other => panic!("expected ObjectWithMap, got {:?}", other),
        }
        assert!(!out.diagnostics.is_empty());
    }

    #[test]
    fn test_negative_field_count_reads_nothing() {
        let mut buf = vec![TAG_OBJECT_WITH_MAP];
        buf.extend_from_slice(&le32(1));
        buf.extend_from_slice(&le32(2));
        buf.extend_from_slice(&le32(-5));
        buf.push(TAG_MESSAGE_END);

        let out = decode(&buf);
        assert_eq!(out.terminal_state, TerminalState::Completed);
        assert_eq!(out.objects[0].field_names.len(), 0);
    }

    #[test]
    fn test_duplicate_object_id_overwrites_in_place() {
        let mut buf = string_record(1, "Alpha");
        buf.extend_from_slice(&string_record(2, "Beta"));
        for class_id in [1i32, 2] {
            buf.push(TAG_OBJECT_WITH_MAP);
            buf.extend_from_slice(&le32(9));
            buf.extend_from_slice(&le32(class_id));
            buf.extend_from_slice(&le32(0));
        }

        let out = decode(&buf);
        assert_eq!(out.objects.len(), 1);
        assert_eq!(out.objects[0].class_name, "Beta");
    }

    #[test]
    fn test_member_reference_tags() {
        let mut buf = string_record(4, "Coins");
        buf.push(TAG_MEMBER_REF);
        buf.extend_from_slice(&le32(4));
        buf.push(TAG_MEMBER_REF_ALT);
        buf.extend_from_slice(&le32(8));

        let out = decode(&buf);
        assert_eq!(
            out.records[1],
            Record::MemberReference {
                offset: buf.len() - 10,
                ref_id: 4,
                resolved_name: "Coins".to_string()
            }
        );
        assert_eq!(
            out.records[2],
            Record::MemberReference {
                offset: buf.len() - 5,
                ref_id: 8,
                resolved_name: "ref_8".to_string()
            }
        );
    }

    #[test]
    fn test_decode_is_deterministic() {
        let buf: Vec<u8> = (0..=255).collect();
        let a = decode(&buf);
        let b = decode(&buf);
        assert_eq!(a.records, b.records);
        assert_eq!(a.record_type_counts, b.record_type_counts);
        assert_eq!(a.terminal_state, b.terminal_state);
    }
}
