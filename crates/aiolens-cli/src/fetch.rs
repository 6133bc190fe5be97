//! Page retrieval

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) aiolens";

/// Download the page at `url`
pub fn fetch_html(url: &str) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .user_agent(USER_AGENT)
        .build()
        .context("failed to build HTTP client")?;

    info!(url, "fetching page");
    let body = client
        .get(url)
        .send()
        .with_context(|| format!("failed to fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("non-success status from {url}"))?
        .text()
        .with_context(|| format!("failed to read response body from {url}"))?;
    debug!(bytes = body.len(), "page fetched");
    Ok(body)
}

/// Read a saved page instead of fetching it
pub fn read_html(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read HTML file {}", path.display()))
}
