//! Alignment and comparison
//!
//! - `alignment`: pairs segments across sources by index and fixes the
//!   scan width of each index
//! - `engine`: computes the per-index mismatch-offset sets
//!
//! Both operate on an immutable view of the eligible sources; neither
//! can fail. The controller rebuilds them wholesale after every
//! mutation of the source set.

pub mod alignment;
pub mod engine;
