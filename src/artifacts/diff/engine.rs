//! Positional byte comparison
//!
//! For every aligned segment index the engine scans intra-segment
//! offsets and records the ones where the active sources disagree.
//! Strictly positional: no insertion/deletion realignment, no
//! edit-distance machinery. The engine keeps no state between rebuilds;
//! every mutation of the source set triggers a full recomputation.

use crate::artifacts::source::ByteSource;
use std::collections::BTreeSet;

/// Per-segment-index sets of mismatching intra-segment offsets.
///
/// At each offset the active sources are those whose segment at this
/// index still contains the offset. Fewer than two active sources end
/// the scan of the whole segment: segments are contiguous from offset 0,
/// so the active set only ever shrinks as the offset grows and a
/// comparison needs at least two participants.
pub fn diff_sets(eligible: &[&ByteSource], segment_lengths: &[usize]) -> Vec<BTreeSet<usize>> {
    segment_lengths
        .iter()
        .enumerate()
        .map(|(index, &length)| {
            let mut mismatches = BTreeSet::new();

            for pos in 0..length {
                let values = eligible
                    .iter()
                    .filter_map(|source| source.segment_byte(index, pos))
                    .collect::<Vec<_>>();

                if values.len() < 2 {
                    break;
                }

                if values.iter().any(|&value| value != values[0]) {
                    mismatches.insert(pos);
                }
            }

            mismatches
        })
        .collect()
}
