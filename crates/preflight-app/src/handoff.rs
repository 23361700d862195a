//! Handoff to the externally-defined server process.
//!
//! The sequencer's sole output is a validated environment plus a go/no-go
//! signal; the server command is started unconditionally, even after a
//! dependency failure.

use std::process::Command;

use tracing::info;

use crate::bootstrap::BootstrapReport;
use crate::error::{AppError, AppResult};

/// Process manager whose invocation the sequencer completes with bind and
/// worker flags. A custom `SERVER_CMD` is used verbatim.
const DEFAULT_MANAGER: &str = "gunicorn";

/// Build the server command for `report`. The child inherits the parent
/// environment plus the validated overrides from
/// [`BootstrapReport::child_env`].
#[must_use]
pub fn prepare_command(report: &BootstrapReport) -> Command {
    let argv = &report.settings.server_command;
    let program = argv.first().map_or(DEFAULT_MANAGER, String::as_str);
    let mut command = Command::new(program);
    command.args(argv.iter().skip(1));
    if program == DEFAULT_MANAGER {
        command
            .arg("--bind")
            .arg(format!("0.0.0.0:{}", report.settings.http_port))
            .arg("--workers")
            .arg(report.settings.workers.to_string());
    }
    command.envs(report.child_env());
    command
}

/// Hand control to the server by replacing the current process image.
/// Returns only on failure.
///
/// # Errors
///
/// Returns an error when the server command cannot be executed.
#[cfg(unix)]
pub fn launch(report: &BootstrapReport) -> AppResult<()> {
    use std::os::unix::process::CommandExt;

    let mut command = prepare_command(report);
    info!(program = ?command.get_program(), "executing server command");
    let source = command.exec();
    Err(AppError::Io {
        operation: "handoff.exec",
        path: None,
        source,
    })
}

/// Hand control to the server by spawning it and propagating its exit
/// status.
///
/// # Errors
///
/// Returns an error when the server command cannot be spawned.
#[cfg(not(unix))]
pub fn launch(report: &BootstrapReport) -> AppResult<()> {
    let mut command = prepare_command(report);
    info!(program = ?command.get_program(), "spawning server command");
    let status = command.status().map_err(|source| AppError::Io {
        operation: "handoff.spawn",
        path: None,
        source,
    })?;
    std::process::exit(status.code().unwrap_or(1));
}
