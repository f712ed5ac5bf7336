// 📤 JSON Output - The extracted document, verbatim
//
// The serialized form is the entity graph itself: re-reading it gives back the same
// counts and the same totals.

use crate::entities::BillDocument;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub fn to_json_string(document: &BillDocument) -> Result<String> {
    serde_json::to_string_pretty(document).context("Failed to serialize bill document")
}

pub fn from_json_str(json: &str) -> Result<BillDocument> {
    serde_json::from_str(json).context("Failed to parse bill document JSON")
}

pub fn write_json(document: &BillDocument, path: &Path) -> Result<()> {
    let json = to_json_string(document)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn read_json(path: &Path) -> Result<BillDocument> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    from_json_str(&json)
}
