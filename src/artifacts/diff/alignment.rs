//! Segment alignment across sources
//!
//! Segments are aligned by index, not by content: segment `i` of one
//! source is compared against segment `i` of every other eligible
//! source. The alignment index is the per-index maximum segment length,
//! which fixes how many offsets the diff engine scans at each index.

use crate::artifacts::source::ByteSource;
use crate::artifacts::source::segment::Segment;

/// Per-segment-index maximum length over the eligible sources.
///
/// Sources with fewer segments than the longest one contribute nothing
/// at the indices they lack; that is expected, not an error. An empty
/// eligible set yields an empty vector (nothing to compare).
pub fn segment_lengths(eligible: &[&ByteSource]) -> Vec<usize> {
    let max_segments = eligible
        .iter()
        .map(|source| source.segments().len())
        .max()
        .unwrap_or(0);

    (0..max_segments)
        .map(|index| {
            eligible
                .iter()
                .filter_map(|source| source.segments().get(index))
                .map(Segment::len)
                .max()
                .unwrap_or(0)
        })
        .collect()
}
