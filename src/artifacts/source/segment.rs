//! Boundary validation and segment derivation
//!
//! A boundary is a user-chosen byte offset that splits a source into
//! segments. Validation is a sanitization step, not an error surface:
//! out-of-range boundaries are dropped silently, duplicates collapsed,
//! ordering restored. Derivation turns the validated list into an exact
//! partition of `[0, length)`.

use derive_new::new;

/// A contiguous byte range of a source, half-open: `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, new)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether the intra-segment offset `pos` still falls inside this segment.
    pub fn contains_offset(&self, pos: usize) -> bool {
        self.start + pos < self.end
    }
}

/// Sanitize a boundary list against a buffer length.
///
/// Drops every boundary at offset 0 or at/past `length`, sorts the rest
/// ascending and removes duplicates. Total: never fails, and for
/// `length == 0` the result is empty. Applying it twice gives the same
/// result as applying it once.
pub fn validate_boundaries(mut boundaries: Vec<usize>, length: usize) -> Vec<usize> {
    boundaries.retain(|&b| b > 0 && b < length);
    boundaries.sort_unstable();
    boundaries.dedup();
    boundaries
}

/// Derive the segment list for a validated boundary list.
///
/// The segments partition `[0, length)` exactly: the first starts at 0,
/// the last ends at `length`, consecutive segments share an endpoint,
/// and there is always exactly one segment more than there are
/// boundaries. An empty boundary list yields the single segment
/// `(0, length)`.
pub fn derive_segments(boundaries: &[usize], length: usize) -> Vec<Segment> {
    let mut segments = Vec::with_capacity(boundaries.len() + 1);

    let mut start = 0;
    for &boundary in boundaries {
        segments.push(Segment::new(start, boundary));
        start = boundary;
    }
    segments.push(Segment::new(start, length));

    segments
}

#[cfg(test)]
mod tests {
    use super::{Segment, derive_segments, validate_boundaries};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(vec![], 10, vec![])]
    #[case(vec![4, 7], 10, vec![4, 7])]
    #[case(vec![7, 4], 10, vec![4, 7])]
    #[case(vec![4, 4, 7], 10, vec![4, 7])]
    #[case(vec![0, 4], 10, vec![4])]
    #[case(vec![4, 10, 11], 10, vec![4])]
    #[case(vec![0, 3, 5], 0, vec![])]
    fn validate_sanitizes_boundaries(
        #[case] input: Vec<usize>,
        #[case] length: usize,
        #[case] expected: Vec<usize>,
    ) {
        assert_eq!(validate_boundaries(input, length), expected);
    }

    #[rstest]
    fn derive_without_boundaries_yields_single_segment() {
        assert_eq!(derive_segments(&[], 10), vec![Segment::new(0, 10)]);
    }

    #[rstest]
    fn derive_splits_at_each_boundary() {
        let segments = derive_segments(&[4, 7], 10);
        assert_eq!(
            segments,
            vec![
                Segment::new(0, 4),
                Segment::new(4, 7),
                Segment::new(7, 10),
            ]
        );
    }

    proptest! {
        #[test]
        fn derived_segments_partition_the_buffer(
            boundaries in proptest::collection::vec(0usize..2048, 0..16),
            length in 1usize..1024,
        ) {
            let validated = validate_boundaries(boundaries, length);
            let segments = derive_segments(&validated, length);

            prop_assert_eq!(segments.len(), validated.len() + 1);
            prop_assert_eq!(segments[0].start, 0);
            prop_assert_eq!(segments[segments.len() - 1].end, length);
            for window in segments.windows(2) {
                prop_assert_eq!(window[0].end, window[1].start);
            }
            for segment in &segments {
                prop_assert!(segment.start <= segment.end);
            }
        }

        #[test]
        fn validate_is_idempotent(
            boundaries in proptest::collection::vec(0usize..2048, 0..16),
            length in 0usize..1024,
        ) {
            let once = validate_boundaries(boundaries, length);
            let twice = validate_boundaries(once.clone(), length);
            prop_assert_eq!(once, twice);
        }
    }
}
