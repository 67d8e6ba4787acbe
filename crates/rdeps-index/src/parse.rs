//! Record and field splitting for normalized index text.
//!
//! Records are separated by blank lines. Each line of a record is a
//! `Key: value` field, split at the first `:` so values may contain colons
//! (URLs, for instance).
//!
//! Lines without a `:` or with an empty key carry no usable field. They are
//! skipped with a warning rather than being glued onto a neighbouring field.
//!
//! A key repeated within one record is merged into its first occurrence,
//! values joined with `", "`, so a second `Depends:` line still contributes
//! dependencies. A repeated `Package` keeps its first value.

use crate::{FormatError, Index, Record};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Split normalized text into blocks of non-empty lines.
fn blocks(text: &str) -> Vec<Vec<&str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(line);
    }

    if !current.is_empty() {
        blocks.push(current);
    }

    blocks
}

fn append_value(existing: &mut String, value: &str) {
    if value.is_empty() {
        return;
    }
    if !existing.is_empty() {
        existing.push_str(", ");
    }
    existing.push_str(value);
}

/// Parse one block into a record. `record` is the 1-based block number.
fn parse_record(lines: &[&str], record: usize) -> Result<Record, FormatError> {
    let mut fields: Vec<(String, String)> = Vec::with_capacity(lines.len());

    for line in lines {
        let Some((key, value)) = line.split_once(':') else {
            warn!(record, line = %line, "skipping index line without a field separator");
            continue;
        };

        let key = key.trim();
        if key.is_empty() {
            warn!(record, line = %line, "skipping index line with an empty field name");
            continue;
        }

        let value = value.trim();
        if let Some((_, existing)) = fields.iter_mut().find(|(k, _)| k == key) {
            if key == "Package" {
                warn!(record, value, "ignoring repeated `Package` field");
            } else {
                debug!(record, field = key, "merging repeated field");
                append_value(existing, value);
            }
            continue;
        }

        fields.push((key.to_string(), value.to_string()));
    }

    let name = fields
        .iter()
        .find(|(k, _)| k == "Package")
        .map(|(_, v)| v.clone())
        .ok_or(FormatError::MissingPackage { record })?;

    if name.is_empty() {
        return Err(FormatError::EmptyPackage { record });
    }

    Ok(Record::new(name, fields))
}

/// Parse normalized index text (see [`crate::normalize()`]) into an [`Index`].
///
/// Fails on the first malformed record; no partial index is returned.
pub fn parse(normalized: &str) -> Result<Index, FormatError> {
    let mut index = Index::default();
    let mut defined_at: HashMap<String, usize> = HashMap::new();

    for (i, lines) in blocks(normalized).iter().enumerate() {
        let record = i + 1;
        let parsed = parse_record(lines, record)?;

        if let Some(&first) = defined_at.get(parsed.name()) {
            return Err(FormatError::DuplicatePackage {
                name: parsed.name().to_string(),
                record,
                first,
            });
        }

        defined_at.insert(parsed.name().to_string(), record);
        index.insert(parsed);
    }

    debug!(packages = index.len(), "parsed package index");
    Ok(index)
}
