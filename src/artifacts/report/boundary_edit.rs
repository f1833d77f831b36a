//! Bulk boundary edits
//!
//! The textual edit surface: a JSON object mapping source names to
//! ordered offset lists, e.g. `{"a.bin": [4, 10], "b.bin": [7]}`.
//! A payload that does not parse is rejected as a whole; nothing is
//! applied. Offsets are accepted as signed integers so that a negative
//! value is an out-of-range boundary (dropped at this edge, the same
//! sanitization the validator applies to too-large ones), not a parse
//! error that would reject the rest of the payload.

use anyhow::Context;
use std::collections::BTreeMap;

/// A parsed boundary mapping, keyed by source display name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryEdit(BTreeMap<String, Vec<i64>>);

impl BoundaryEdit {
    /// Parse a JSON payload; atomic — a malformed payload yields an
    /// error and no mapping.
    pub fn parse(payload: &str) -> anyhow::Result<Self> {
        let mapping = serde_json::from_str::<BTreeMap<String, Vec<i64>>>(payload)
            .with_context(|| format!("Malformed boundary mapping: {payload:?}"))?;

        Ok(BoundaryEdit(mapping))
    }

    /// Replacement boundary list for a named source, if the mapping has
    /// one. Non-positive offsets can never validate and are filtered
    /// here; too-large ones are left for validation against the
    /// source's length.
    pub fn boundaries_for(&self, name: &str) -> Option<Vec<usize>> {
        self.0.get(name).map(|offsets| {
            offsets
                .iter()
                .copied()
                .filter(|&offset| offset > 0)
                .map(|offset| offset as usize)
                .collect()
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}
