//! gdrive-mcp server binary.
//!
//! Exposes Google Drive, Docs, Slides and Sheets to MCP clients over stdio.
//!
//! Usage:
//!   # Uses gcloud application default credentials
//!   gcloud auth application-default login \
//!     --scopes=openid,https://www.googleapis.com/auth/cloud-platform,https://www.googleapis.com/auth/drive,https://www.googleapis.com/auth/documents,https://www.googleapis.com/auth/presentations,https://www.googleapis.com/auth/spreadsheets
//!   cargo run -p gdrive-mcp -- --quota-project my-project
//!
//! Test with MCP inspector:
//!   npx @modelcontextprotocol/inspector cargo run -p gdrive-mcp

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gdrive_google::{Endpoints, GoogleClient, GoogleConfig};
use gdrive_mcp::GdriveMcp;

/// MCP server for Google Drive, Docs, Slides and Sheets.
#[derive(Parser, Debug)]
#[command(name = "gdrive-mcp")]
#[command(about = "MCP server for Google Drive, Docs, Slides and Sheets")]
struct Args {
    /// Project billed for API quota
    #[arg(long, env = "GOOGLE_CLOUD_QUOTA_PROJECT_ID")]
    quota_project: Option<String>,

    /// authorized_user credentials file (defaults to gcloud's ADC location)
    #[arg(long, env = "GOOGLE_APPLICATION_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "GDRIVE_MCP_TIMEOUT_SECS", default_value_t = 60)]
    timeout_secs: u64,

    /// Send every API call to this root instead of Google's hosts
    #[arg(long)]
    api_root: Option<String>,
}

impl Args {
    fn google_config(&self) -> GoogleConfig {
        let mut config = GoogleConfig::from_env().with_timeout(Duration::from_secs(self.timeout_secs));
        if let Some(project) = self.quota_project.as_deref().filter(|p| !p.trim().is_empty()) {
            config = config.with_quota_project(project);
        }
        if let Some(path) = &self.credentials {
            config = config.with_credentials_path(path);
        }
        if let Some(root) = &self.api_root {
            config = config.with_endpoints(Endpoints::single_root(root));
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Tracing goes to stderr; stdout carries the protocol
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false));

    #[cfg(feature = "telemetry")]
    let _otel_guard = if gdrive_telemetry::otel_enabled() {
        let (otel_layer, guard) = gdrive_telemetry::otel_layer("gdrive-mcp")?;
        registry.with(otel_layer).init();
        Some(guard)
    } else {
        registry.init();
        None
    };
    #[cfg(not(feature = "telemetry"))]
    {
        if gdrive_telemetry::otel_enabled() {
            eprintln!("OTel environment set but gdrive-mcp was built without the telemetry feature");
        }
        registry.init();
    }

    let args = Args::parse();
    let config = args.google_config();

    let client = GoogleClient::new(&config).context("failed to initialize Google client")?;
    tracing::info!(
        quota_project = client.quota_project().unwrap_or("-"),
        timeout_secs = args.timeout_secs,
        "Google client ready"
    );

    let mcp = GdriveMcp::new(Arc::new(client));

    let service = mcp
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("MCP server error: {:?}", e);
        })?;

    tracing::info!("gdrive-mcp server ready");

    service.waiting().await?;

    tracing::info!("gdrive-mcp server shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["gdrive-mcp"]).unwrap();
        assert!(args.api_root.is_none());
        assert_eq!(args.google_config().endpoints, Endpoints::default());
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "gdrive-mcp",
            "--quota-project",
            "proj",
            "--timeout-secs",
            "5",
            "--api-root",
            "http://127.0.0.1:9000",
        ])
        .unwrap();
        let config = args.google_config();
        assert_eq!(config.quota_project.as_deref(), Some("proj"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.endpoints.docs, "http://127.0.0.1:9000");
    }
}
