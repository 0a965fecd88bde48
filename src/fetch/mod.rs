//! HTTP plumbing shared by the data providers.
//!
//! [`HttpClient`] abstracts request execution so auth schemes compose as
//! decorators: [`auth::UrlParam`] appends a query-parameter key (the air
//! pollution provider's `appid` scheme) and [`auth::ApiKey`] injects a
//! header key (the listings provider's `X-Api-Key` scheme).

mod basic;
mod client;

pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;

/// Executes a GET against `url` and returns the raw response body.
///
/// # Errors
///
/// Fails on an invalid URL, a transport error, or a non-success status.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    let resp = resp.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}
