//! Naver Papago NMT client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TranslateError;
use crate::provider::TranslateProvider;

/// Papago NMT REST client
pub struct PapagoClient {
    client: Client,
    client_id: String,
    client_secret: String,
    base_url: String,
}

impl PapagoClient {
    /// Create a new Papago client
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            client_id,
            client_secret,
            base_url: "https://openapi.naver.com/v1/papago/n2mt".to_string(),
        }
    }

    /// Override the endpoint (used against stub servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct PapagoRequest<'a> {
    source: &'a str,
    target: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PapagoResponse {
    message: PapagoMessage,
}

#[derive(Debug, Deserialize)]
struct PapagoMessage {
    result: PapagoResult,
}

#[derive(Debug, Deserialize)]
struct PapagoResult {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl TranslateProvider for PapagoClient {
    fn name(&self) -> &str {
        "Papago"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let request = PapagoRequest {
            source,
            target,
            text,
        };

        debug!("Papago: {} chars {}->{}", text.len(), source, target);

        let response = self
            .client
            .post(&self.base_url)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError { status, message });
        }

        let body: PapagoResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(e.to_string()))?;

        Ok(body.message.result.translated_text)
    }
}
