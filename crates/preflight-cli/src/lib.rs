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

//! Command-line verification client for Preflight deployments.
//!
//! Layout: `cli.rs` (argument parsing, HTTP checks, output rendering).

pub mod cli;

pub use cli::run;
