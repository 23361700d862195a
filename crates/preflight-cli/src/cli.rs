//! Post-deploy verification commands for a Preflight-managed instance.

use std::time::Duration;

use anyhow::anyhow;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const HEADER_REQUEST_ID: &str = "x-request-id";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Parses CLI arguments, executes the requested command, and returns the
/// process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let client = match build_client(cli.timeout) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    match dispatch(cli, client).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli, client: Client) -> CliResult<()> {
    let base_url = cli.base_url.ok_or_else(|| {
        CliError::validation("base URL is required (pass --base-url or set PREFLIGHT_BASE_URL)")
    })?;

    let ctx = AppContext { client, base_url };

    match cli.command {
        Command::Health => handle_health(&ctx, cli.output).await,
        Command::Verify => handle_verify(&ctx, cli.output).await,
    }
}

fn build_client(timeout: u64) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(&Uuid::new_v4().to_string())
        .map_err(|_| CliError::failure(anyhow!("request identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    Client::builder()
        .timeout(Duration::from_secs(timeout))
        .default_headers(default_headers)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

#[derive(Parser)]
#[command(
    name = "preflight",
    about = "Deployment verification for Preflight-managed services"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "PREFLIGHT_BASE_URL",
        value_parser = parse_base_url,
        help = "Public URL of the deployed instance"
    )]
    base_url: Option<Url>,
    #[arg(
        long,
        global = true,
        env = "PREFLIGHT_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and render the instance health payload.
    Health,
    /// Run the full post-deploy check suite.
    Verify,
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

struct AppContext {
    client: Client,
    base_url: Url,
}

#[derive(Debug)]
enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

type CliResult<T> = Result<T, CliError>;

impl CliError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

/// Health payload served by the collaborator application.
#[derive(Debug, Serialize, Deserialize)]
struct HealthReport {
    status: String,
    database: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutcome {
    name: &'static str,
    passed: bool,
    critical: bool,
    detail: String,
}

#[derive(Debug, Serialize)]
struct VerifyReport {
    checks: Vec<CheckOutcome>,
    passed: usize,
    total: usize,
    checked_at: String,
}

fn parse_base_url(input: &str) -> Result<Url, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("base URL must not be empty".to_string());
    }
    // Mirror operator habit: a bare hostname means HTTPS.
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    candidate
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))
}

async fn handle_health(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let report = fetch_health(ctx).await?;
    match output {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            println!("status: {}", report.status);
            println!("database: {}", report.database);
            if let Some(platform) = &report.platform {
                println!("platform: {platform}");
            }
            if let Some(timestamp) = &report.timestamp {
                println!("timestamp: {timestamp}");
            }
            if let Some(error) = &report.error {
                println!("error: {error}");
            }
        }
    }
    Ok(())
}

async fn handle_verify(ctx: &AppContext, output: OutputFormat) -> CliResult<()> {
    let checks = vec![
        check_health(ctx).await,
        check_login_page(ctx).await,
        check_static_assets(ctx).await,
    ];
    let total = checks.len();
    let passed = checks.iter().filter(|check| check.passed).count();
    let report = VerifyReport {
        checks,
        passed,
        total,
        checked_at: Utc::now().to_rfc3339(),
    };

    match output {
        OutputFormat::Json => {
            let text = serde_json::to_string_pretty(&report)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
            println!("{text}");
        }
        OutputFormat::Table => {
            for check in &report.checks {
                let tag = if check.passed {
                    "ok  "
                } else if check.critical {
                    "FAIL"
                } else {
                    "warn"
                };
                println!("{tag} {}: {}", check.name, check.detail);
            }
            println!("{}/{} checks passed", report.passed, report.total);
        }
    }

    let critical_failures = report
        .checks
        .iter()
        .filter(|check| check.critical && !check.passed)
        .count();
    if critical_failures > 0 {
        return Err(CliError::failure(anyhow!(
            "{critical_failures} critical check(s) failed"
        )));
    }
    Ok(())
}

async fn fetch_health(ctx: &AppContext) -> CliResult<HealthReport> {
    let url = ctx
        .base_url
        .join("/health")
        .map_err(|err| CliError::failure(anyhow!("invalid base URL: {err}")))?;

    let response = ctx
        .client
        .get(url)
        .send()
        .await
        .map_err(|err| CliError::failure(anyhow!("request to /health failed: {err}")))?;

    if !response.status().is_success() {
        return Err(CliError::failure(anyhow!(
            "health check failed with status {}",
            response.status()
        )));
    }

    response
        .json::<HealthReport>()
        .await
        .map_err(|err| CliError::failure(anyhow!("failed to parse health payload: {err}")))
}

async fn check_health(ctx: &AppContext) -> CheckOutcome {
    match fetch_health(ctx).await {
        Ok(report) => CheckOutcome {
            name: "health",
            passed: true,
            critical: true,
            detail: format!("status {}, database {}", report.status, report.database),
        },
        Err(err) => CheckOutcome {
            name: "health",
            passed: false,
            critical: true,
            detail: err.display_message(),
        },
    }
}

async fn check_login_page(ctx: &AppContext) -> CheckOutcome {
    let (passed, detail) = match page_status(ctx, "/login").await {
        Ok(status) if status.is_success() => (true, "login page loads".to_string()),
        Ok(status) => (false, format!("login page returned status {status}")),
        Err(detail) => (false, detail),
    };
    CheckOutcome {
        name: "login",
        passed,
        critical: true,
        detail,
    }
}

// Advisory only: instances serving assets from a CDN legitimately 404 here.
async fn check_static_assets(ctx: &AppContext) -> CheckOutcome {
    let (passed, detail) = match ctx.base_url.join("/static/logo.png") {
        Ok(url) => match ctx.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                (true, "static assets reachable".to_string())
            }
            Ok(response) => (
                false,
                format!("static asset probe returned status {}", response.status()),
            ),
            Err(err) => (false, format!("static asset probe failed: {err}")),
        },
        Err(err) => (false, format!("invalid base URL: {err}")),
    };
    CheckOutcome {
        name: "static",
        passed,
        critical: false,
        detail,
    }
}

async fn page_status(ctx: &AppContext, path: &'static str) -> Result<StatusCode, String> {
    let url = ctx
        .base_url
        .join(path)
        .map_err(|err| format!("invalid base URL: {err}"))?;
    ctx.client
        .get(url)
        .send()
        .await
        .map(|response| response.status())
        .map_err(|err| format!("request to {path} failed: {err}"))
}
