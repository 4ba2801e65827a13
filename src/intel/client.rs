use crate::config::ApiConfig;
use crate::errors::MonitorResult;
use crate::logger::{self, LogTag};
use reqwest::Client;
use std::time::Duration;

/// Desktop browser identification; the site rejects obvious bots
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// HTTP client for intelligence site pages
pub struct IntelClient {
    client: Client,
    base_url: String,
}

impl IntelClient {
    pub fn new(api: &ApiConfig) -> MonitorResult<Self> {
        let client = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(Duration::from_secs(api.request_timeout_secs.max(1)))
            .build()?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn entity_url(&self, entity_id: &str) -> String {
        format!("{}/explorer/entity/{}", self.base_url, entity_id)
    }

    /// Page body for `entity_id`, or `None` on transport failure or non-2xx status
    pub async fn fetch_entity_page(&self, entity_id: &str) -> Option<String> {
        let url = self.entity_url(entity_id);
        logger::debug(LogTag::Intel, &format!("GET {}", url));

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                logger::error(LogTag::Intel, &format!("Web scraping error: {}", e));
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            logger::error(
                LogTag::Intel,
                &format!("Web scraping error: {} returned HTTP {}", url, status),
            );
            return None;
        }

        match response.text().await {
            Ok(body) => Some(body),
            Err(e) => {
                logger::error(
                    LogTag::Intel,
                    &format!("Web scraping error: failed to read body: {}", e),
                );
                None
            }
        }
    }
}
