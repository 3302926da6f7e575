use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::Outcome;
use crate::error::{ProviderError, ProviderKind};

const USER_AGENT: &str = concat!("TravelCompanion/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by all calls of one adapter
pub(crate) fn build_client(timeout_seconds: u32) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Send `request` and decode a JSON body, mapping every failure onto the
/// provider taxonomy. Error texts never include the request URL so API keys
/// passed as query parameters stay out of responses and logs.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderKind,
    request: RequestBuilder,
) -> Outcome<T> {
    if let Some(url) = redacted_url(&request) {
        debug!("{} API request to {}", provider, url);
    }

    let response = request.send().await.map_err(|e| {
        let e = e.without_url();
        warn!("{} API request failed: {}", provider, e);
        ProviderError::transport(provider, e)
    })?;

    let status = response.status();
    debug!("{} API responded with {}", provider, status);

    if !status.is_success() {
        warn!("{} API returned non-success status {}", provider, status);
        return Err(ProviderError::upstream_status(provider, status.as_u16()));
    }

    response.json::<T>().await.map_err(|e| {
        let e = e.without_url();
        warn!("Failed to parse {} API response: {}", provider, e);
        ProviderError::transport(provider, e)
    })
}

/// Request URL without its query string, safe to log
fn redacted_url(request: &RequestBuilder) -> Option<String> {
    let built = request.try_clone()?.build().ok()?;
    let mut url = built.url().clone();
    url.set_query(None);
    Some(url.to_string())
}
