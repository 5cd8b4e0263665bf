#![cfg(feature = "cli")]
//! Integration tests for `savi export`.

use std::io::Write;

use tempfile::{tempdir, NamedTempFile};

use sav::cli::export::{execute, ExportOptions};

fn save_file(contents: &[u8]) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(contents).unwrap();
    tmp
}

#[test]
fn test_export_writes_both_documents() {
    let tmp = save_file(br#"{"coins": 9, "cardSlots": 2, "playerName": "dax"}"#);
    let out = tempdir().unwrap();
    let opts = ExportOptions {
        file: tmp.path().to_string_lossy().into_owned(),
        out: out.path().to_string_lossy().into_owned(),
        pretty: true,
    };

    let mut output = Vec::new();
    execute(&opts, &mut output).unwrap();

    let schema: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.path().join("playerInfo.json")).unwrap())
            .unwrap();
    for bucket in sav::save::schema::BUCKET_NAMES {
        assert!(schema.get(bucket).is_some(), "missing {}", bucket);
    }
    assert_eq!(schema["currencies"]["coins"], 9);
    assert_eq!(schema["cards"]["cardSlots"], 2);
    // meta stays out of the exported schema document
    assert!(schema.get("meta").is_none());

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join("playerInfo_raw.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw["playerName"], "dax");

    let printed = String::from_utf8(output).unwrap();
    assert!(printed.contains("playerInfo.json"));
    assert!(printed.contains("via json"));
}

#[test]
fn test_export_creates_missing_output_dir() {
    let tmp = save_file(b"{}");
    let out = tempdir().unwrap();
    let nested = out.path().join("a").join("b");
    let opts = ExportOptions {
        file: tmp.path().to_string_lossy().into_owned(),
        out: nested.to_string_lossy().into_owned(),
        pretty: false,
    };

    let mut output = Vec::new();
    execute(&opts, &mut output).unwrap();
    assert!(nested.join("playerInfo.json").exists());
    assert!(nested.join("playerInfo_raw.json").exists());
}

#[test]
fn test_export_binary_raw_document() {
    let tmp = save_file(&[0xFF, 0xFE, 0x11]);
    let out = tempdir().unwrap();
    let opts = ExportOptions {
        file: tmp.path().to_string_lossy().into_owned(),
        out: out.path().to_string_lossy().into_owned(),
        pretty: false,
    };

    let mut output = Vec::new();
    execute(&opts, &mut output).unwrap();

    let raw: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(out.path().join("playerInfo_raw.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(raw["terminal_state"], "completed");
    assert!(raw["records"].is_array());
}

#[test]
fn test_export_missing_file_errors() {
    let out = tempdir().unwrap();
    let opts = ExportOptions {
        file: "no/such/playerInfo.dat".to_string(),
        out: out.path().to_string_lossy().into_owned(),
        pretty: false,
    };
    let mut output = Vec::new();
    assert!(execute(&opts, &mut output).is_err());
}
