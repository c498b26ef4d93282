//! HTTP retrieval of manifest and export files.

mod client;
mod basic;

pub use client::HttpClient;
pub use basic::BasicClient;

use anyhow::{Context, Result};

/// Fetches a manifest or CSV export over HTTP.
///
/// Non-success statuses are load failures: the caller must treat the whole
/// dataset as unavailable rather than continue with partial files.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(
        reqwest::Method::GET,
        url.parse().with_context(|| format!("invalid source URL '{url}'"))?,
    );

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to '{url}' failed"))?
        .error_for_status()
        .with_context(|| format!("'{url}' returned an error status"))?;

    Ok(resp.bytes().await?.to_vec())
}
