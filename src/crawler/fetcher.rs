//! HTTP client construction and base-page fetching
//!
//! One client is built per engine and reused for the base-page GET and every
//! liveness probe. The base-page fetch distinguishes transport failures
//! (which fail the run) from responses with an error status (which are
//! recorded and do not fail the run).

use crate::config::{CrawlerConfig, UserAgentConfig};
use reqwest::Client;
use std::time::Duration;

/// Result of fetching the base page
#[derive(Debug)]
pub enum FetchOutcome {
    /// A response was obtained; error-range statuses are included here
    Response {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The request failed before any response arrived (DNS, connect, timeout)
    TransportError {
        /// Error description
        error: String,
    },
}

/// Builds the shared HTTP client
///
/// The user agent follows the `Name/Version (+ContactURL; ContactEmail)`
/// convention so crawled sites can identify and reach us.
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches the base page of a run
///
/// Never errors: transport failures are folded into the outcome so the
/// runner can map them onto the task's failure path.
pub async fn fetch_page(client: &Client, url: &str) -> FetchOutcome {
    match client.get(url).send().await {
        Ok(response) => {
            let status_code = response.status().as_u16();
            match response.text().await {
                Ok(body) => FetchOutcome::Response { status_code, body },
                Err(e) => FetchOutcome::TransportError {
                    error: format!("Failed to read body: {}", e),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection failed".to_string()
            } else {
                e.to_string()
            };
            FetchOutcome::TransportError { error }
        }
    }
}
