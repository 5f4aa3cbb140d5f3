//! Minimal `.properties` reader.
//!
//! Supports `key=value` and `key: value`, `#` and `!` comment lines, blank
//! lines, and trailing-backslash line continuation. Later keys win.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

pub fn read_properties<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, String>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read properties file {}", path.display()))?;
    parse_properties(&raw).with_context(|| format!("invalid properties file {}", path.display()))
}

pub fn parse_properties(raw: &str) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    let mut pending = String::new();

    for (idx, line) in raw.lines().enumerate() {
        let line = line.trim_start();
        if pending.is_empty() && (line.is_empty() || line.starts_with('#') || line.starts_with('!')) {
            continue;
        }

        if let Some(head) = line.strip_suffix('\\') {
            pending.push_str(head);
            continue;
        }
        pending.push_str(line);

        let entry = std::mem::take(&mut pending);
        let Some(split) = entry.find(['=', ':']) else {
            return Err(anyhow!("line {}: expected key=value", idx + 1));
        };
        let key = entry[..split].trim();
        if key.is_empty() {
            return Err(anyhow!("line {}: empty key", idx + 1));
        }
        out.insert(key.to_string(), entry[split + 1..].trim().to_string());
    }

    if !pending.is_empty() {
        return Err(anyhow!("unterminated line continuation at end of file"));
    }
    Ok(out)
}
