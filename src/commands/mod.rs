//! Command implementations
//!
//! User-facing operations, implemented as `impl` blocks on the
//! `EditController` so the binary stays a thin argument-parsing shell.
//! Rendering lives here, outside the comparison core: the core hands
//! out reports, the command layer turns them into text.

pub mod compare;
