//! URL liveness validation
//!
//! Articles are only persisted when their link still resolves. Many
//! publishers reject HEAD with 403/405 but serve GET fine, so the check is
//! two-tier: HEAD first, then a full GET before declaring the link dead.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; MotorWatch/1.0)";

/// Liveness check seam so the collector can be exercised without a network
#[async_trait]
pub trait LinkValidator: Send + Sync {
    /// Whether the URL currently resolves to a live page
    async fn validate(&self, url: &str) -> bool;
}

/// HTTP validator with HEAD-then-GET fallback.
///
/// Each attempt carries a 5s timeout and follows redirects. Any transport
/// failure (timeout, DNS, TLS) counts as validation failure, never an error.
pub struct HttpUrlValidator {
    client: Client,
}

impl HttpUrlValidator {
    /// Create a validator with the default 5s per-attempt timeout
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(5))
                .user_agent(USER_AGENT)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpUrlValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkValidator for HttpUrlValidator {
    /// HEAD first; on non-success or transport error, retry with GET.
    /// Never raises: every failure mode maps to `false`.
    async fn validate(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("URL validated via HEAD: {}", url);
                return true;
            }
            Ok(response) => {
                debug!(
                    "HEAD returned {} for {}, retrying with GET",
                    response.status(),
                    url
                );
            }
            Err(e) => {
                debug!("HEAD failed for {} ({}), retrying with GET", url, e);
            }
        }

        match self.client.get(url).send().await {
            Ok(response) => {
                let valid = response.status().is_success();
                debug!(
                    "URL {} via GET: {}",
                    if valid { "validated" } else { "invalid" },
                    url
                );
                valid
            }
            Err(e) => {
                debug!("URL validation failed for {}: {}", url, e);
                false
            }
        }
    }
}
