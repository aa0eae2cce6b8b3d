use crate::error::{Result, ScanError};
use crate::source::Source;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, warn};

pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; TourismBot/1.0)";

/// Single-request page fetcher. One GET per call, no retries; timeouts and
/// redirects are whatever reqwest does by default.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    /// Fetch the page body for `source`. Any non-2xx status is an error.
    pub async fn fetch(&self, source: &Source) -> Result<String> {
        debug!("Fetching {}", source.url);

        let start = Instant::now();
        let response = match self.client.get(&source.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Request to {} failed: {}", source.url, e);
                return Err(ScanError::HttpError(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to fetch {}: {}", source.url, status.as_u16());
            return Err(ScanError::HttpStatus {
                url: source.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(
            url = %source.url,
            bytes = body.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );

        Ok(body)
    }
}
