//! Shared blocking HTTP client.

use crate::errors::AppResult;
use reqwest::blocking::Client;
use std::time::Duration;

pub fn build_client(timeout_secs: u64) -> AppResult<Client> {
    let client = Client::builder()
        .user_agent(concat!("smilesensor/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// First part of a response body for log lines.
pub fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() > MAX {
        let mut s: String = trimmed.chars().take(MAX).collect();
        s.push_str("...");
        s
    } else {
        trimmed.to_string()
    }
}
