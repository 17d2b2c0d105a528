//! Data source retrieval.
//!
//! Both inputs (station catalog, trip log) are plain documents that may
//! live on disk or behind a public URL; no authentication is involved.

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;
use tracing::debug;

/// Fetches a URL and returns the response body.
///
/// # Errors
///
/// Fails on connection errors or a non-success HTTP status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads a data source from a local file path or over HTTP.
pub async fn load_source<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        fetch_bytes(client, source).await?
    } else {
        std::fs::read(source)?
    };
    debug!(source, bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}
