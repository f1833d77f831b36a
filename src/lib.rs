//! segdiff — segmented multi-source binary diff engine
//!
//! Compares several binary files byte-by-byte under user-defined
//! segmentation: each file can be split at arbitrary offsets into
//! segments, segments are aligned across files by index (not content),
//! and corresponding offsets are compared positionally.

pub mod areas;
pub mod artifacts;
pub mod commands;
