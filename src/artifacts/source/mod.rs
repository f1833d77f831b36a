//! Byte sources
//!
//! A `ByteSource` owns one file's raw bytes (capped at a maximum
//! length), its readiness and visibility flags, and its boundary list
//! with the derived segments. Bytes arrive asynchronously: a source is
//! created pending and becomes ready when its load completes. Each
//! (re)load request carries a generation number so that completions
//! racing a removal or a cap change can be told apart from current ones.

pub mod segment;

use crate::artifacts::source::segment::{Segment, derive_segments, validate_boundaries};
use bytes::Bytes;
use derive_new::new;
use std::fmt::Display;
use std::path::PathBuf;

/// Stable identity of a source within a comparison set.
///
/// Display names are not unique (two files may share a basename), so
/// programmatic edits address sources by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u64);

impl SourceId {
    pub fn new(id: u64) -> Self {
        SourceId(id)
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Load lifecycle of a source's byte buffer.
#[derive(Debug, Clone, Default)]
pub enum LoadState {
    /// Bytes not available yet; the source is excluded from comparison.
    #[default]
    Pending,
    /// Bytes loaded up to the length cap.
    Ready(Bytes),
}

/// A pending request to load (or re-load) a source's bytes.
///
/// Produced by the controller whenever a mutation needs bytes it does
/// not have; the driver fulfills it and reports back through
/// `complete_load` with the same id and generation.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct LoadRequest {
    pub id: SourceId,
    pub generation: u64,
    pub path: PathBuf,
    pub cap: usize,
}

/// One binary file participating in a comparison.
#[derive(Debug, Clone)]
pub struct ByteSource {
    id: SourceId,
    /// Display name, also the key of the bulk boundary-edit mapping.
    name: String,
    /// Origin path, re-read when the length cap grows.
    path: PathBuf,
    /// Bumped on every (re)load request; completions carrying an older
    /// generation are stale and must be discarded.
    generation: u64,
    state: LoadState,
    /// Whether the length cap clipped the underlying file.
    truncated: bool,
    /// Excluded from comparison when false; bytes and boundaries are kept.
    visible: bool,
    /// Sorted, deduplicated offsets strictly inside `(0, len)`.
    boundaries: Vec<usize>,
    /// Exact partition of `[0, len)`; empty while pending.
    segments: Vec<Segment>,
}

impl ByteSource {
    pub fn new(id: SourceId, name: String, path: PathBuf) -> Self {
        ByteSource {
            id,
            name,
            path,
            generation: 0,
            state: LoadState::Pending,
            truncated: false,
            visible: true,
            boundaries: Vec::new(),
            segments: Vec::new(),
        }
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, LoadState::Ready(_))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Ready and visible: participates in alignment and diffing.
    pub fn is_eligible(&self) -> bool {
        self.is_ready() && self.visible
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Loaded byte length; 0 while pending.
    pub fn len(&self) -> usize {
        match &self.state {
            LoadState::Pending => 0,
            LoadState::Ready(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn boundaries(&self) -> &[usize] {
        &self.boundaries
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Byte at intra-segment offset `pos` of the segment at `index`.
    ///
    /// `Some` exactly when the source is ready, has a segment at that
    /// index, and the offset still falls inside it. A source is "active"
    /// at an offset precisely when this returns `Some`; sources with
    /// fewer segments or shorter segments simply drop out.
    pub fn segment_byte(&self, index: usize, pos: usize) -> Option<u8> {
        let LoadState::Ready(bytes) = &self.state else {
            return None;
        };
        let segment = self.segments.get(index)?;
        if segment.contains_offset(pos) {
            Some(bytes[segment.start + pos])
        } else {
            None
        }
    }

    /// Mark bytes available and (re)derive segments against their length.
    ///
    /// Boundaries collected while the source was pending are validated
    /// here, against the real buffer length.
    pub fn complete_load(&mut self, bytes: Bytes, truncated: bool) {
        self.state = LoadState::Ready(bytes);
        self.truncated = truncated;
        self.recompute_segments();
    }

    /// Drop back to pending ahead of a re-read with a larger cap.
    ///
    /// Boundaries survive; they are re-validated against the new length
    /// when the fresh load completes. Returns the new load generation.
    pub fn begin_reload(&mut self) -> u64 {
        self.generation += 1;
        self.state = LoadState::Pending;
        self.truncated = false;
        self.segments.clear();
        self.generation
    }

    pub fn add_boundary(&mut self, offset: usize) {
        self.boundaries.push(offset);
        self.recompute_segments();
    }

    /// Remove every occurrence of `offset` from the boundary list.
    pub fn remove_boundary(&mut self, offset: usize) {
        self.boundaries.retain(|&b| b != offset);
        self.recompute_segments();
    }

    pub fn replace_boundaries(&mut self, boundaries: Vec<usize>) {
        self.boundaries = boundaries;
        self.recompute_segments();
    }

    /// Re-validate boundaries and re-derive segments.
    ///
    /// While pending the raw boundary list is kept as-is and no segments
    /// exist; validation needs the buffer length.
    fn recompute_segments(&mut self) {
        if !self.is_ready() {
            return;
        }
        self.boundaries = validate_boundaries(std::mem::take(&mut self.boundaries), self.len());
        self.segments = derive_segments(&self.boundaries, self.len());
    }
}
