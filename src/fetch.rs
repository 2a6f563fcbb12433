use reqwest::StatusCode;
use thiserror::Error;
use tracing::info;

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("listing request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("listing returned unexpected status {0}")]
    UnexpectedStatus(StatusCode),
}

/// Fetch the sold listing page. One GET, no retries; any failure is fatal
/// to the run since nothing has been ingested yet.
pub async fn fetch_listing(settings: &Settings) -> Result<String, FetchError> {
    let client = reqwest::Client::builder()
        .timeout(settings.fetch_timeout)
        .build()?;

    info!("Fetching listing: {}", settings.listing_url);
    let response = client
        .get(&settings.listing_url)
        .header(reqwest::header::USER_AGENT, settings.user_agent.as_str())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::UnexpectedStatus(status));
    }

    Ok(response.text().await?)
}
