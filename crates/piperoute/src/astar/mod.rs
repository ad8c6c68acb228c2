//! Low-level router: diameter-parameterized A* for one pipe at a time.
//!
//! The router temporarily marks higher-priority pipes on the shared grid and
//! guarantees the marks are removed on every exit path, so callers observe
//! an unchanged environment. Timeout and unreachability both surface as
//! `None`; the caller decides what a missing path means.

mod router;

pub use router::route;
