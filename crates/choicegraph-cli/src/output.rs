//! JSON output files
//!
//! Downstream tooling diffs these files, so objects serialize with sorted
//! keys and a four-space indent.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Serialize with sorted object keys and four-space indentation.
pub fn to_sorted_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    // Round-trip through Value: its object map iterates keys in order.
    let value = serde_json::to_value(value)?;
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(out)?)
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create {}", parent.display()))?;
    }
    let json = to_sorted_pretty_json(value)?;
    fs::write(path, &json).with_context(|| format!("could not write {}", path.display()))?;
    Ok(())
}
