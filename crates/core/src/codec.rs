//! JSON blob format for the catalog and favorites keys.
//!
//! The catalog is stored as an array of `{"id", "uri"}` records in display
//! order; favorites as a sorted array of id strings.

use std::collections::BTreeSet;

use crate::domain::ImageEntry;
use crate::error::{Error, Result};

pub fn encode_entries(entries: &[ImageEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Decode a catalog blob. A blank blob decodes to an empty catalog.
pub fn decode_entries(key: &str, blob: &str) -> Result<Vec<ImageEntry>> {
    if blob.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(blob).map_err(|e| corrupt(key, e))
}

pub fn encode_favorites(ids: &BTreeSet<String>) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Decode a favorites blob. Repeated ids collapse into one.
pub fn decode_favorites(key: &str, blob: &str) -> Result<BTreeSet<String>> {
    if blob.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    serde_json::from_str(blob).map_err(|e| corrupt(key, e))
}

fn corrupt(key: &str, err: serde_json::Error) -> Error {
    Error::CorruptData {
        key: key.to_string(),
        message: err.to_string(),
    }
}
