//! Google Cloud Translation v2 client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::TranslateError;
use crate::provider::TranslateProvider;

/// Google Translate v2 REST client
pub struct GoogleTranslateClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GoogleTranslateClient {
    /// Create a new Google Translate client
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_key,
            base_url: "https://translation.googleapis.com/language/translate/v2".to_string(),
        }
    }

    /// Override the endpoint (used against stub servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Serialize)]
struct GoogleTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateResponse {
    data: GoogleTranslateData,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslateData {
    translations: Vec<GoogleTranslation>,
}

#[derive(Debug, Deserialize)]
struct GoogleTranslation {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

#[async_trait]
impl TranslateProvider for GoogleTranslateClient {
    fn name(&self) -> &str {
        "Google Translate"
    }

    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, TranslateError> {
        let request = GoogleTranslateRequest {
            q: text,
            source,
            target,
            format: "text",
        };

        debug!("Google Translate: {} chars {}->{}", text.len(), source, target);

        let response = self
            .client
            .post(format!("{}?key={}", self.base_url, self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslateError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::ApiError { status, message });
        }

        let body: GoogleTranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(e.to_string()))?;

        body.data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| TranslateError::ParseError("empty translations array".to_string()))
    }
}
