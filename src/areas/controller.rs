//! Edit controller
//!
//! The controller exclusively owns the source set and is the only place
//! it is mutated. Every operation is a complete state transition
//! followed by an unconditional full rebuild of the alignment index and
//! the diff sets; readers only ever observe a consistent snapshot.
//!
//! Byte loading is the one asynchronous concern. The controller never
//! blocks for it: operations that need bytes hand back `LoadRequest`
//! tickets, and the driver reports fulfillment through `complete_load`.
//! A completion whose source was removed in the meantime, or whose
//! generation was superseded by a cap change, is stale and discarded
//! without a rebuild.

use crate::artifacts::diff::{alignment, engine};
use crate::artifacts::report::boundary_edit::BoundaryEdit;
use crate::artifacts::report::{DiffReport, SourceSummary};
use crate::artifacts::source::{ByteSource, LoadRequest, SourceId};
use bytes::Bytes;
use std::collections::BTreeSet;
use std::path::PathBuf;

pub const DEFAULT_MAX_LENGTH: usize = 1024;

pub struct EditController {
    /// Insertion-ordered; order fixes the report's column order.
    sources: Vec<ByteSource>,
    next_id: u64,
    max_length: usize,
    segment_lengths: Vec<usize>,
    diff_sets: Vec<BTreeSet<usize>>,
}

impl Default for EditController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LENGTH)
    }
}

impl EditController {
    pub fn new(max_length: usize) -> Self {
        EditController {
            sources: Vec::new(),
            next_id: 0,
            max_length,
            segment_lengths: Vec::new(),
            diff_sets: Vec::new(),
        }
    }

    pub fn sources(&self) -> &[ByteSource] {
        &self.sources
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn segment_lengths(&self) -> &[usize] {
        &self.segment_lengths
    }

    pub fn diff_sets(&self) -> &[BTreeSet<usize>] {
        &self.diff_sets
    }

    /// Register a new pending source and hand back the ticket for
    /// loading its bytes. The source stays ineligible until the ticket
    /// is fulfilled.
    pub fn add_source(&mut self, name: String, path: PathBuf) -> LoadRequest {
        let id = SourceId::new(self.next_id);
        self.next_id += 1;

        let source = ByteSource::new(id, name, path.clone());
        let request = LoadRequest::new(id, source.generation(), path, self.max_length);
        self.sources.push(source);
        self.rebuild();

        request
    }

    /// Remove a source from the set. A load still in flight for it will
    /// be discarded on arrival. Returns false for an unknown id.
    pub fn remove_source(&mut self, id: SourceId) -> bool {
        let before = self.sources.len();
        self.sources.retain(|source| source.id() != id);
        let removed = self.sources.len() < before;
        if removed {
            self.rebuild();
        }
        removed
    }

    /// Apply a load completion, unless it is stale.
    ///
    /// Stale means the source is gone or the generation does not match
    /// the latest load request; either way the bytes are dropped and no
    /// rebuild happens. Returns whether the completion was applied.
    pub fn complete_load(
        &mut self,
        id: SourceId,
        generation: u64,
        bytes: Bytes,
        truncated: bool,
    ) -> bool {
        let Some(source) = self.source_mut(id) else {
            log::debug!("discarding load completion for removed source {id}");
            return false;
        };
        if source.generation() != generation {
            log::debug!(
                "discarding stale load completion for source {id} \
                 (generation {generation}, current {})",
                source.generation()
            );
            return false;
        }

        source.complete_load(bytes, truncated);
        self.rebuild();
        true
    }

    pub fn set_visibility(&mut self, id: SourceId, visible: bool) -> bool {
        let Some(source) = self.source_mut(id) else {
            return false;
        };
        source.set_visible(visible);
        self.rebuild();
        true
    }

    pub fn add_boundary(&mut self, id: SourceId, offset: usize) -> bool {
        let Some(source) = self.source_mut(id) else {
            return false;
        };
        source.add_boundary(offset);
        self.rebuild();
        true
    }

    pub fn remove_boundary(&mut self, id: SourceId, offset: usize) -> bool {
        let Some(source) = self.source_mut(id) else {
            return false;
        };
        source.remove_boundary(offset);
        self.rebuild();
        true
    }

    /// Replace boundary lists wholesale from a serialized mapping.
    ///
    /// Atomic: a payload that fails to parse changes nothing and is
    /// reported to the caller. Names absent from the mapping keep their
    /// boundaries; mapping entries naming no source are ignored.
    /// Returns whether any source changed (and hence was rebuilt).
    pub fn replace_boundaries(&mut self, payload: &str) -> anyhow::Result<bool> {
        let edit = BoundaryEdit::parse(payload)?;

        let mut changed = false;
        for source in &mut self.sources {
            if let Some(boundaries) = edit.boundaries_for(source.name()) {
                let before = source.boundaries().to_vec();
                source.replace_boundaries(boundaries);
                changed |= source.boundaries() != before.as_slice();
            }
        }

        if changed {
            self.rebuild();
        }
        Ok(changed)
    }

    /// Raise the length cap and re-read every source up to it.
    ///
    /// Growth only: a cap at or below the current one is a no-op.
    /// Boundaries survive the reload — they were valid inside the old
    /// length, and the valid range only gets larger. Every source drops
    /// back to pending until its ticket is fulfilled.
    pub fn grow_length_cap(&mut self, new_cap: usize) -> Vec<LoadRequest> {
        if new_cap <= self.max_length {
            return Vec::new();
        }
        self.max_length = new_cap;

        let requests = self
            .sources
            .iter_mut()
            .map(|source| {
                let generation = source.begin_reload();
                LoadRequest::new(source.id(), generation, source.path().clone(), new_cap)
            })
            .collect();

        self.rebuild();
        requests
    }

    /// Current comparison snapshot for a renderer.
    pub fn report(&self) -> DiffReport {
        DiffReport {
            sources: self
                .sources
                .iter()
                .map(|source| SourceSummary {
                    name: source.name().to_string(),
                    boundaries: source.boundaries().to_vec(),
                    ready: source.is_ready(),
                    visible: source.is_visible(),
                    truncated: source.is_truncated(),
                })
                .collect(),
            segment_lengths: self.segment_lengths.clone(),
            mismatches: self.diff_sets.clone(),
            max_length: self.max_length,
        }
    }

    fn source_mut(&mut self, id: SourceId) -> Option<&mut ByteSource> {
        self.sources.iter_mut().find(|source| source.id() == id)
    }

    /// Full recompute of alignment and diff over the eligible sources.
    fn rebuild(&mut self) {
        let eligible = self
            .sources
            .iter()
            .filter(|source| source.is_eligible())
            .collect::<Vec<_>>();

        self.segment_lengths = alignment::segment_lengths(&eligible);
        self.diff_sets = engine::diff_sets(&eligible, &self.segment_lengths);

        log::debug!(
            "rebuilt diff: {} eligible sources, {} segment indices, {} mismatching offsets",
            eligible.len(),
            self.segment_lengths.len(),
            self.diff_sets.iter().map(BTreeSet::len).sum::<usize>()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::EditController;
    use crate::artifacts::source::LoadRequest;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    fn add_ready(controller: &mut EditController, name: &str, data: &[u8]) -> LoadRequest {
        let request = controller.add_source(name.to_string(), PathBuf::from(name));
        let applied = controller.complete_load(
            request.id,
            request.generation,
            Bytes::from(data.to_vec()),
            false,
        );
        assert!(applied);
        request
    }

    #[fixture]
    fn two_sources() -> EditController {
        let mut controller = EditController::default();
        add_ready(&mut controller, "a.bin", &[1, 2, 3, 4]);
        add_ready(&mut controller, "b.bin", &[1, 9, 3, 4]);
        controller
    }

    #[rstest]
    fn pending_sources_are_not_compared() {
        let mut controller = EditController::default();
        controller.add_source("a.bin".to_string(), PathBuf::from("a.bin"));
        add_ready(&mut controller, "b.bin", &[1, 2]);

        assert_eq!(controller.segment_lengths(), &[2]);
        assert_eq!(controller.diff_sets(), &[BTreeSet::new()]);
    }

    #[rstest]
    fn ready_transition_rebuilds_the_diff(two_sources: EditController) {
        assert_eq!(two_sources.diff_sets(), &[BTreeSet::from([1])]);
    }

    #[rstest]
    fn late_completion_for_removed_source_is_ignored() {
        let mut controller = EditController::default();
        add_ready(&mut controller, "a.bin", &[1, 2]);
        let request = controller.add_source("b.bin".to_string(), PathBuf::from("b.bin"));

        assert!(controller.remove_source(request.id));
        let applied = controller.complete_load(
            request.id,
            request.generation,
            Bytes::from_static(&[9, 9]),
            false,
        );

        assert!(!applied);
        assert_eq!(controller.sources().len(), 1);
        assert_eq!(controller.diff_sets(), &[BTreeSet::new()]);
    }

    #[rstest]
    fn completion_with_superseded_generation_is_ignored(two_sources: EditController) {
        let mut controller = two_sources;
        let requests = controller.grow_length_cap(2048);
        assert_eq!(requests.len(), 2);

        // completion from before the cap change
        let stale = controller.complete_load(
            requests[0].id,
            requests[0].generation - 1,
            Bytes::from_static(&[0; 4]),
            false,
        );
        assert!(!stale);

        for request in requests {
            controller.complete_load(
                request.id,
                request.generation,
                Bytes::from_static(&[1, 2, 3, 4]),
                false,
            );
        }
        assert_eq!(controller.diff_sets(), &[BTreeSet::new()]);
    }

    #[rstest]
    fn hiding_a_source_excludes_it(two_sources: EditController) {
        let mut controller = two_sources;
        let id = controller.sources()[1].id();

        controller.set_visibility(id, false);
        assert_eq!(controller.diff_sets(), &[BTreeSet::new()]);

        controller.set_visibility(id, true);
        assert_eq!(controller.diff_sets(), &[BTreeSet::from([1])]);
    }

    #[rstest]
    fn boundary_edits_rebuild(two_sources: EditController) {
        let mut controller = two_sources;
        let id = controller.sources()[0].id();

        controller.add_boundary(id, 2);
        assert_eq!(controller.segment_lengths(), &[4, 2]);
        // a: (0,2)/(2,4) vs b single (0,4): index 0 compares a[0..2]
        // against b[0..2], index 1 compares a[2..4] against nothing.
        assert_eq!(
            controller.diff_sets(),
            &[BTreeSet::from([1]), BTreeSet::new()]
        );

        controller.remove_boundary(id, 2);
        assert_eq!(controller.segment_lengths(), &[4]);
        assert_eq!(controller.diff_sets(), &[BTreeSet::from([1])]);
    }

    #[rstest]
    fn replace_boundaries_applies_by_name(two_sources: EditController) {
        let mut controller = two_sources;

        let changed = controller
            .replace_boundaries(r#"{"a.bin": [2], "b.bin": [2], "unknown.bin": [1]}"#)
            .unwrap();

        assert!(changed);
        assert_eq!(controller.sources()[0].boundaries(), &[2]);
        assert_eq!(controller.sources()[1].boundaries(), &[2]);
        assert_eq!(controller.segment_lengths(), &[2, 2]);
    }

    #[rstest]
    fn replace_boundaries_rejects_malformed_payload_atomically(two_sources: EditController) {
        let mut controller = two_sources;
        controller.add_boundary(controller.sources()[0].id(), 2);
        let before = controller.report();

        let result = controller.replace_boundaries(r#"{"a.bin": [2,"#);

        assert!(result.is_err());
        assert_eq!(controller.report(), before);
    }

    #[rstest]
    fn replace_boundaries_without_changes_reports_none(two_sources: EditController) {
        let mut controller = two_sources;

        let changed = controller.replace_boundaries(r#"{"unknown.bin": [1]}"#).unwrap();

        assert!(!changed);
    }

    #[rstest]
    fn grow_keeps_previously_valid_boundaries(two_sources: EditController) {
        let mut controller = two_sources;
        let id = controller.sources()[0].id();
        controller.add_boundary(id, 3);

        let requests = controller.grow_length_cap(4096);
        for request in requests {
            controller.complete_load(
                request.id,
                request.generation,
                Bytes::from(vec![0u8; 8]),
                false,
            );
        }

        assert_eq!(controller.max_length(), 4096);
        assert_eq!(controller.sources()[0].boundaries(), &[3]);
        assert_eq!(controller.segment_lengths(), &[8, 5]);
    }

    #[rstest]
    fn non_growing_cap_is_a_no_op(two_sources: EditController) {
        let mut controller = two_sources;

        assert!(controller.grow_length_cap(1024).is_empty());
        assert!(controller.grow_length_cap(512).is_empty());
        assert_eq!(controller.diff_sets(), &[BTreeSet::from([1])]);
    }
}
