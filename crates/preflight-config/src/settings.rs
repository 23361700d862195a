//! Operational settings resolved from per-profile defaults and environment
//! overrides.
//!
//! # Design
//! - One defaults row per [`RuntimeProfile`]; adding a platform means adding
//!   one table entry, not scattering conditionals.
//! - Overrides that fail to parse are logged and replaced by the profile
//!   default. Selection is total and never aborts startup.

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::env::Environment;
use crate::profile::RuntimeProfile;

/// Canonical attempt budget for the dependency-readiness wait.
pub const DEFAULT_WAIT_ATTEMPTS: u32 = 30;
/// Canonical fixed delay between dependency-readiness attempts.
pub const DEFAULT_WAIT_DELAY: Duration = Duration::from_secs(2);

const DEFAULT_STORAGE_PATH: &str = "uploads";
const DEFAULT_SERVER_COMMAND: &[&str] = &["gunicorn", "app:app"];

/// Hard-coded defaults for a single runtime profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDefaults {
    /// Port the server binds when the platform does not supply one.
    pub http_port: u16,
    /// Database connection pool size.
    pub pool_size: u32,
    /// Connections allowed beyond the pool size under load.
    pub max_overflow: u32,
    /// Interval after which pooled connections are recycled.
    pub pool_recycle: Duration,
    /// Timeout for a single database connection attempt.
    pub connect_timeout: Duration,
    /// Server worker process count.
    pub workers: u32,
}

const RAILWAY_DEFAULTS: ProfileDefaults = ProfileDefaults {
    http_port: 5000,
    pool_size: 5,
    max_overflow: 10,
    pool_recycle: Duration::from_secs(1800),
    connect_timeout: Duration::from_secs(10),
    workers: 2,
};

const RENDER_DEFAULTS: ProfileDefaults = ProfileDefaults {
    http_port: 10_000,
    pool_size: 5,
    max_overflow: 10,
    pool_recycle: Duration::from_secs(1800),
    connect_timeout: Duration::from_secs(10),
    workers: 2,
};

// Serverless: one short-lived worker, minimal pool.
const VERCEL_DEFAULTS: ProfileDefaults = ProfileDefaults {
    http_port: 3000,
    pool_size: 1,
    max_overflow: 0,
    pool_recycle: Duration::from_secs(300),
    connect_timeout: Duration::from_secs(10),
    workers: 1,
};

const GENERIC_DEFAULTS: ProfileDefaults = ProfileDefaults {
    http_port: 8000,
    pool_size: 5,
    max_overflow: 10,
    pool_recycle: Duration::from_secs(1800),
    connect_timeout: Duration::from_secs(10),
    workers: 2,
};

/// Defaults row for `profile`.
#[must_use]
pub const fn defaults_for(profile: RuntimeProfile) -> &'static ProfileDefaults {
    match profile {
        RuntimeProfile::Railway => &RAILWAY_DEFAULTS,
        RuntimeProfile::Render => &RENDER_DEFAULTS,
        RuntimeProfile::Vercel => &VERCEL_DEFAULTS,
        RuntimeProfile::Generic => &GENERIC_DEFAULTS,
    }
}

/// Resolved operational parameters for the current run. Computed once and
/// only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Profile the settings were selected for.
    pub profile: RuntimeProfile,
    /// Port the server binds, after repair of the `PORT` variable.
    pub http_port: u16,
    /// Database connection pool size.
    pub pool_size: u32,
    /// Connections allowed beyond the pool size under load.
    pub max_overflow: u32,
    /// Interval after which pooled connections are recycled.
    pub pool_recycle: Duration,
    /// Timeout for a single database connection attempt.
    pub connect_timeout: Duration,
    /// Directory for uploaded file storage.
    pub storage_path: PathBuf,
    /// Server worker process count.
    pub workers: u32,
    /// Attempt budget for the dependency-readiness wait.
    pub wait_attempts: u32,
    /// Fixed delay between dependency-readiness attempts.
    pub wait_delay: Duration,
    /// Command the sequencer hands control to.
    pub server_command: Vec<String>,
}

impl Settings {
    /// Merge the profile defaults table with environment overrides. Every
    /// unparseable override is logged and replaced by its default.
    #[must_use]
    pub fn select(profile: RuntimeProfile, env: &Environment) -> Self {
        let defaults = defaults_for(profile);
        Self {
            profile,
            http_port: repair_port(env.get("PORT"), defaults.http_port),
            pool_size: override_u32(env, "DB_POOL_SIZE", defaults.pool_size),
            max_overflow: override_u32(env, "DB_MAX_OVERFLOW", defaults.max_overflow),
            pool_recycle: override_secs(env, "DB_POOL_RECYCLE", defaults.pool_recycle),
            connect_timeout: override_secs(env, "DB_CONNECT_TIMEOUT", defaults.connect_timeout),
            storage_path: PathBuf::from(env.get("UPLOAD_FOLDER").unwrap_or(DEFAULT_STORAGE_PATH)),
            workers: override_u32(env, "WEB_CONCURRENCY", defaults.workers),
            wait_attempts: override_u32(env, "DB_WAIT_ATTEMPTS", DEFAULT_WAIT_ATTEMPTS),
            wait_delay: override_secs(env, "DB_WAIT_DELAY", DEFAULT_WAIT_DELAY),
            server_command: server_command(env),
        }
    }
}

/// Coerce a raw `PORT` value to a usable port. Total: absent, blank,
/// non-numeric, out-of-range, and the literal `port` placeholder some
/// platforms inject all collapse to `default`, with the offending value
/// logged. Valid ports pass through unchanged.
#[must_use]
pub fn repair_port(raw: Option<&str>, default: u16) -> u16 {
    let Some(raw) = raw else {
        return default;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        warn!(default, "PORT is set but blank; substituting default");
        return default;
    }
    match trimmed.parse::<u16>() {
        Ok(port) if port > 0 => port,
        _ => {
            warn!(
                value = trimmed,
                default, "PORT is not a valid port number; substituting default"
            );
            default
        }
    }
}

fn override_u32(env: &Environment, name: &str, default: u32) -> u32 {
    let Some(raw) = env.get(name) else {
        return default;
    };
    match raw.trim().parse::<u32>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                variable = name,
                value = raw,
                default,
                "ignoring unparseable numeric override"
            );
            default
        }
    }
}

fn override_secs(env: &Environment, name: &str, default: Duration) -> Duration {
    let Some(raw) = env.get(name) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => {
            warn!(
                variable = name,
                value = raw,
                default_secs = default.as_secs(),
                "ignoring unparseable duration override"
            );
            default
        }
    }
}

fn server_command(env: &Environment) -> Vec<String> {
    match env.get("SERVER_CMD") {
        Some(raw) if !raw.trim().is_empty() => {
            raw.split_whitespace().map(str::to_string).collect()
        }
        _ => DEFAULT_SERVER_COMMAND
            .iter()
            .map(|part| (*part).to_string())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repair_port_passes_valid_values_through() {
        assert_eq!(repair_port(Some("8080"), 8000), 8080);
        assert_eq!(repair_port(Some(" 443 "), 8000), 443);
    }

    #[test]
    fn repair_port_substitutes_default_for_bad_input() {
        assert_eq!(repair_port(None, 8000), 8000);
        assert_eq!(repair_port(Some(""), 8000), 8000);
        assert_eq!(repair_port(Some("port"), 10_000), 10_000);
        assert_eq!(repair_port(Some("not-a-port"), 8000), 8000);
        assert_eq!(repair_port(Some("99999"), 8000), 8000);
        assert_eq!(repair_port(Some("0"), 8000), 8000);
        assert_eq!(repair_port(Some("-5"), 8000), 8000);
    }

    #[test]
    fn select_uses_profile_defaults_without_overrides() {
        let env = Environment::from_pairs::<&str, &str, _>([]);
        let settings = Settings::select(RuntimeProfile::Render, &env);
        assert_eq!(settings.http_port, 10_000);
        assert_eq!(settings.pool_size, 5);
        assert_eq!(settings.workers, 2);
        assert_eq!(settings.storage_path, PathBuf::from("uploads"));
        assert_eq!(settings.wait_attempts, DEFAULT_WAIT_ATTEMPTS);
        assert_eq!(settings.wait_delay, DEFAULT_WAIT_DELAY);
        assert_eq!(settings.server_command, vec!["gunicorn", "app:app"]);
    }

    #[test]
    fn select_applies_valid_overrides() {
        let env = Environment::from_pairs([
            ("PORT", "9001"),
            ("DB_POOL_SIZE", "20"),
            ("DB_POOL_RECYCLE", "600"),
            ("UPLOAD_FOLDER", "/srv/files"),
            ("WEB_CONCURRENCY", "8"),
            ("DB_WAIT_ATTEMPTS", "5"),
            ("DB_WAIT_DELAY", "1"),
        ]);
        let settings = Settings::select(RuntimeProfile::Railway, &env);
        assert_eq!(settings.http_port, 9001);
        assert_eq!(settings.pool_size, 20);
        assert_eq!(settings.pool_recycle, Duration::from_secs(600));
        assert_eq!(settings.storage_path, PathBuf::from("/srv/files"));
        assert_eq!(settings.workers, 8);
        assert_eq!(settings.wait_attempts, 5);
        assert_eq!(settings.wait_delay, Duration::from_secs(1));
    }

    #[test]
    fn select_replaces_unparseable_overrides_with_defaults() {
        let env = Environment::from_pairs([
            ("DB_POOL_SIZE", "lots"),
            ("DB_CONNECT_TIMEOUT", "soon"),
            ("WEB_CONCURRENCY", "-3"),
        ]);
        let settings = Settings::select(RuntimeProfile::Generic, &env);
        assert_eq!(settings.pool_size, 5);
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
        assert_eq!(settings.workers, 2);
    }

    #[test]
    fn select_honours_custom_server_command() {
        let env = Environment::from_pairs([("SERVER_CMD", "uwsgi --ini app.ini")]);
        let settings = Settings::select(RuntimeProfile::Generic, &env);
        assert_eq!(settings.server_command, vec!["uwsgi", "--ini", "app.ini"]);
    }

    #[test]
    fn blank_server_command_falls_back_to_default() {
        let env = Environment::from_pairs([("SERVER_CMD", "   ")]);
        let settings = Settings::select(RuntimeProfile::Generic, &env);
        assert_eq!(settings.server_command, vec!["gunicorn", "app:app"]);
    }

    #[test]
    fn vercel_defaults_shrink_the_pool() {
        let defaults = defaults_for(RuntimeProfile::Vercel);
        assert_eq!(defaults.pool_size, 1);
        assert_eq!(defaults.max_overflow, 0);
        assert_eq!(defaults.workers, 1);
    }
}
