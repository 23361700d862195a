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

//! Environment-driven configuration for the Preflight bootstrap sequencer.
//!
//! Layout: `env.rs` (immutable environment snapshot), `profile.rs` (hosting
//! platform detection), `settings.rs` (per-profile defaults + overrides),
//! `endpoint.rs` (connection-string decomposition and repair).

pub mod endpoint;
pub mod env;
pub mod error;
pub mod profile;
pub mod settings;

pub use endpoint::{ConnectionEndpoint, DEFAULT_POSTGRES_PORT};
pub use env::Environment;
pub use error::{ConfigError, ConfigResult};
pub use profile::RuntimeProfile;
pub use settings::{
    DEFAULT_WAIT_ATTEMPTS, DEFAULT_WAIT_DELAY, ProfileDefaults, Settings, defaults_for,
    repair_port,
};
