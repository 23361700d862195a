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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint that validates the deployment environment and hands
//! control to the configured server process.

use preflight_app::{AppResult, run_app};

/// Runs the bootstrap sequence and execs the server on success.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
