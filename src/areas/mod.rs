//! Stateful coordination surfaces
//!
//! - `controller`: exclusive owner of the source set; every mutation
//!   goes through it and is followed by a full rebuild
//! - `workspace`: capped file system reads for source ingestion

pub mod controller;
pub mod workspace;
