#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Preflight bootstrap sequencer.
//!
//! Layout: `bootstrap.rs` (boot sequence state machine), `probe.rs`
//! (dependency-readiness retry), `storage.rs` (storage-path probe),
//! `handoff.rs` (server process handoff).

/// Boot sequence state machine and report.
pub mod bootstrap;
/// Application-level errors.
pub mod error;
/// Server process handoff.
pub mod handoff;
/// Dependency probing and bounded retry.
pub mod probe;
/// Storage-path provisioning and writability checks.
pub mod storage;

pub use bootstrap::{BootstrapPhase, BootstrapReport, Sequencer, run_app};
pub use error::{AppError, AppResult};
pub use probe::{DependencyProbe, DependencyStatus, PgProbe, ProbeError, await_dependency};
pub use storage::{StorageStatus, ensure_storage_path};
