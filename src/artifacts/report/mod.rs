//! Consumable comparison output
//!
//! A `DiffReport` is the renderer-facing snapshot of one rebuild:
//! per-source summaries, the aligned segment lengths, the mismatch sets
//! and a derived lines-per-segment count for a given pane width. It is
//! a plain value; the controller produces a fresh one on demand and a
//! rendering layer (this crate's CLI, or anything else) consumes it.

pub mod boundary_edit;

use serde::Serialize;
use std::collections::BTreeSet;

/// Render-ready description of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub boundaries: Vec<usize>,
    pub ready: bool,
    pub visible: bool,
    pub truncated: bool,
}

/// Snapshot of the comparison state after a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub sources: Vec<SourceSummary>,
    /// Per-segment-index scan width (max segment length across sources).
    pub segment_lengths: Vec<usize>,
    /// Per-segment-index offsets where the eligible sources disagree.
    pub mismatches: Vec<BTreeSet<usize>>,
    /// Current length cap applied to every source.
    pub max_length: usize,
}

impl DiffReport {
    /// Rows needed to render each segment at `pane_width` bytes per row.
    pub fn lines_per_segment(&self, pane_width: usize) -> Vec<usize> {
        let pane_width = pane_width.max(1);
        self.segment_lengths
            .iter()
            .map(|&length| length.div_ceil(pane_width))
            .collect()
    }

    pub fn any_truncated(&self) -> bool {
        self.sources.iter().any(|source| source.truncated)
    }

    pub fn mismatch_count(&self) -> usize {
        self.mismatches.iter().map(BTreeSet::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::DiffReport;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn report(segment_lengths: Vec<usize>) -> DiffReport {
        let mismatches = segment_lengths.iter().map(|_| BTreeSet::new()).collect();
        DiffReport {
            sources: Vec::new(),
            segment_lengths,
            mismatches,
            max_length: 1024,
        }
    }

    #[rstest]
    #[case(vec![16, 17, 1, 0], 16, vec![1, 2, 1, 0])]
    #[case(vec![32], 16, vec![2])]
    #[case(vec![5], 1, vec![5])]
    fn lines_per_segment_rounds_up(
        #[case] lengths: Vec<usize>,
        #[case] pane_width: usize,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(report(lengths).lines_per_segment(pane_width), expected);
    }

    #[rstest]
    fn zero_pane_width_is_clamped() {
        assert_eq!(report(vec![4]).lines_per_segment(0), vec![4]);
    }
}
