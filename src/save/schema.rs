//! Canonical eight-bucket schema normalization.
//!
//! Whatever document the format detector produced is normalized into the
//! canonical progression schema: eight named buckets, an `unmapped` bucket
//! for everything else, and a `meta` section describing how the parse went.
//!
//! Bucket-shaped top-level keys (a `currencies` object, or a `towers`
//! object carrying a `list` of named records) are mapped structurally.
//! Every other top-level key is classified by a precedence-ordered rule
//! table, first match wins, falling back to `unmapped` with its original
//! casing and value intact.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::save::decoder::BinaryDecode;
use crate::save::detect::{Document, Method};
use crate::save::record::TerminalState;

/// The eight canonical bucket names, in schema order.
pub const BUCKET_NAMES: [&str; 8] = [
    "currencies",
    "towers",
    "cards",
    "modules",
    "labs",
    "relics",
    "research",
    "workshop_upgrades",
];

/// One canonical bucket: item name to attributes, insertion-ordered.
pub type Bucket = Map<String, Value>;

/// Parse metadata surfaced alongside the mapped buckets.
#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub method: Method,
    /// Present only when the binary decoder ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminal_state: Option<TerminalState>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// The normalized save document. Created fresh per parse call.
#[derive(Debug, Clone, Serialize)]
pub struct CanonicalDocument {
    pub currencies: Bucket,
    pub towers: Bucket,
    pub cards: Bucket,
    pub modules: Bucket,
    pub labs: Bucket,
    pub relics: Bucket,
    pub research: Bucket,
    pub workshop_upgrades: Bucket,
    /// Top-level keys no rule claimed, plus the raw binary decode when the
    /// save was not key/value shaped.
    pub unmapped: Bucket,
    pub meta: Meta,
}

impl CanonicalDocument {
    fn empty(method: Method) -> Self {
        CanonicalDocument {
            currencies: Bucket::new(),
            towers: Bucket::new(),
            cards: Bucket::new(),
            modules: Bucket::new(),
            labs: Bucket::new(),
            relics: Bucket::new(),
            research: Bucket::new(),
            workshop_upgrades: Bucket::new(),
            unmapped: Bucket::new(),
            meta: Meta {
                method,
                terminal_state: None,
                diagnostics: Vec::new(),
            },
        }
    }

    fn bucket_mut(&mut self, name: &str) -> Option<&mut Bucket> {
        match name {
            "currencies" => Some(&mut self.currencies),
            "towers" => Some(&mut self.towers),
            "cards" => Some(&mut self.cards),
            "modules" => Some(&mut self.modules),
            "labs" => Some(&mut self.labs),
            "relics" => Some(&mut self.relics),
            "research" => Some(&mut self.research),
            "workshop_upgrades" => Some(&mut self.workshop_upgrades),
            _ => None,
        }
    }

    /// Field count per canonical bucket, in schema order.
    pub fn bucket_counts(&self) -> [(&'static str, usize); 8] {
        [
            ("currencies", self.currencies.len()),
            ("towers", self.towers.len()),
            ("cards", self.cards.len()),
            ("modules", self.modules.len()),
            ("labs", self.labs.len()),
            ("relics", self.relics.len()),
            ("research", self.research.len()),
            ("workshop_upgrades", self.workshop_upgrades.len()),
        ]
    }
}

/// Extra attributes copied for each entry of a list-shaped bucket, beyond
/// the `level` every bucket carries, with their defaults.
fn list_attributes(bucket: &str) -> Vec<(&'static str, Value)> {
    match bucket {
        "towers" => vec![("damage", json!(0))],
        "cards" | "modules" => vec![("bonus", json!(0))],
        "relics" => vec![("effect", json!(""))],
        "research" => vec![("progress", json!(0))],
        _ => Vec::new(),
    }
}

/// Classify a non-structural top-level key into a bucket name.
///
/// Precedence-ordered, first match wins: the currency name set, then the
/// substring rules. Case-insensitive; `None` means the key stays unmapped.
fn classify(key: &str) -> Option<&'static str> {
    let k = key.to_ascii_lowercase();
    match k.as_str() {
        "coins" | "gold" | "xp" | "gems" | "shards" => Some("currencies"),
        _ if k.contains("tower") => Some("towers"),
        _ if k.contains("card") => Some("cards"),
        _ if k.contains("module") => Some("modules"),
        _ if k.contains("lab") => Some("labs"),
        _ if k.contains("relic") => Some("relics"),
        _ if k.contains("research") => Some("research"),
        _ if k.contains("workshop") => Some("workshop_upgrades"),
        _ => None,
    }
}

/// Normalize a detected document into the canonical schema. Pure, total.
pub fn map_document(doc: Document, method: Method) -> CanonicalDocument {
    let mut out = CanonicalDocument::empty(method);

    match doc {
        Document::Json(Value::Object(map)) => {
            for (key, value) in map {
                if map_structural(&mut out, &key, &value) {
                    continue;
                }
                match classify(&key) {
                    Some(bucket) => {
                        // bucket_mut cannot miss for a classify() result
                        if let Some(b) = out.bucket_mut(bucket) {
                            b.insert(key, value);
                        }
                    }
                    None => {
                        out.unmapped.insert(key, value);
                    }
                }
            }
        }
        Document::Json(other) => {
            out.meta.diagnostics.push(format!(
                "top-level JSON value is {}, not an object; nothing to map",
                json_type_name(&other)
            ));
        }
        Document::Binary(bin) => {
            map_binary(&mut out, bin);
        }
        Document::Unrecognized { bytes } => {
            out.unmapped.insert("bytes".to_string(), json!(bytes));
        }
    }

    out
}

/// Structural mapping for bucket-shaped top-level keys. Returns true if
/// the key was consumed.
fn map_structural(out: &mut CanonicalDocument, key: &str, value: &Value) -> bool {
    let name = key.to_ascii_lowercase();
    if !BUCKET_NAMES.contains(&name.as_str()) {
        return false;
    }
    let obj = match value.as_object() {
        Some(o) => o,
        // A bucket-named scalar goes through key classification instead.
        None => return false,
    };

    if name == "currencies" {
        for field in ["coins", "gems", "shards"] {
            let v = obj.get(field).cloned().unwrap_or_else(|| json!(0));
            out.currencies.insert(field.to_string(), v);
        }
        return true;
    }

    let attrs = list_attributes(&name);
    let entries = obj.get("list").and_then(Value::as_array);
    if let Some(bucket) = out.bucket_mut(&name) {
        for entry in entries.into_iter().flatten() {
            let item_name = entry
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unknown")
                .to_string();
            let mut mapped = Map::new();
            mapped.insert(
                "level".to_string(),
                entry.get("level").cloned().unwrap_or_else(|| json!(0)),
            );
            for (attr, default) in &attrs {
                mapped.insert(
                    attr.to_string(),
                    entry.get(*attr).cloned().unwrap_or_else(|| default.clone()),
                );
            }
            bucket.insert(item_name, Value::Object(mapped));
        }
    }
    true
}

/// Binary decodes carry no key names, so no bucket classification is
/// attempted; the whole result lands under `unmapped` for downstream
/// tooling, and the terminal state and diagnostics move into `meta`.
fn map_binary(out: &mut CanonicalDocument, bin: BinaryDecode) {
    out.meta.terminal_state = Some(bin.terminal_state);
    out.meta.diagnostics.extend(bin.diagnostics.iter().cloned());

    out.unmapped.insert(
        "records".to_string(),
        serde_json::to_value(&bin.records).unwrap_or(Value::Null),
    );
    out.unmapped.insert(
        "objects".to_string(),
        serde_json::to_value(&bin.objects).unwrap_or(Value::Null),
    );
    out.unmapped.insert(
        "record_type_counts".to_string(),
        serde_json::to_value(&bin.record_type_counts).unwrap_or(Value::Null),
    );
    out.unmapped.insert(
        "terminal_state".to_string(),
        json!(bin.terminal_state.as_str()),
    );
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
