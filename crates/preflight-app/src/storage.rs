//! Storage-path provisioning and writability probing.

use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Marker file written and removed to verify directory writability.
const PROBE_MARKER: &str = ".preflight-probe";

/// Outcome of the storage-path check. Unavailability is non-fatal: the
/// server may still start and fail individual file operations later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageStatus {
    /// Directory exists and accepted a marker write.
    Writable,
    /// Directory could not be created or written.
    Unavailable,
    /// Check skipped (serverless profile without a persistent disk).
    Skipped,
}

impl StorageStatus {
    /// Whether the path accepted the marker write.
    #[must_use]
    pub const fn is_writable(self) -> bool {
        matches!(self, Self::Writable)
    }
}

/// Idempotently create `path` and verify it accepts writes via a
/// write-then-delete marker probe. Every failure is logged with the path and
/// OS error, then reported as [`StorageStatus::Unavailable`].
#[must_use]
pub fn ensure_storage_path(path: &Path) -> StorageStatus {
    if let Err(err) = fs::create_dir_all(path) {
        warn!(path = %path.display(), error = %err, "storage path could not be created");
        return StorageStatus::Unavailable;
    }

    let marker = path.join(PROBE_MARKER);
    if let Err(err) = fs::write(&marker, b"probe") {
        warn!(path = %path.display(), error = %err, "storage path is not writable");
        return StorageStatus::Unavailable;
    }
    if let Err(err) = fs::remove_file(&marker) {
        warn!(marker = %marker.display(), error = %err, "failed to remove storage probe marker");
        return StorageStatus::Unavailable;
    }

    info!(path = %path.display(), "storage path is writable");
    StorageStatus::Writable
}
