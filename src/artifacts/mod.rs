//! Data structures and algorithms
//!
//! - `source`: byte sources, boundary validation and segmentation
//! - `diff`: index-based segment alignment and positional byte diffing
//! - `report`: renderer-facing snapshots and the bulk boundary-edit
//!   wire format

pub mod diff;
pub mod report;
pub mod source;
