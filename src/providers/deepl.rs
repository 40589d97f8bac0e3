use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ProviderUsage, TranslationProvider};
use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

/// DeepL client for interacting with the DeepL REST API
pub struct DeepL {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, without the `/v2` suffix
    endpoint: String,
}

impl std::fmt::Debug for DeepL {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeepL")
            .field("endpoint", &self.endpoint)
            .field("api_key", &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

/// DeepL translate request
#[derive(Debug, Serialize)]
pub struct DeepLRequest {
    /// Texts to translate
    pub text: Vec<String>,

    /// Target language code
    pub target_lang: String,
}

/// DeepL translate response
#[derive(Debug, Deserialize)]
pub struct DeepLResponse {
    /// One entry per submitted text
    pub translations: Vec<DeepLTranslation>,
}

/// Individual translation in a DeepL response
#[derive(Debug, Deserialize)]
pub struct DeepLTranslation {
    /// Source language detected by DeepL
    #[serde(default)]
    pub detected_source_language: Option<String>,

    /// The translated text
    pub text: String,
}

/// DeepL usage response
#[derive(Debug, Deserialize)]
pub struct DeepLUsageResponse {
    /// Characters translated so far in the current period
    pub character_count: u64,
    /// Character limit of the plan
    #[serde(default)]
    pub character_limit: Option<u64>,
}

impl DeepLRequest {
    /// Create a request for a single text
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: vec![text.into()],
            target_lang: target_lang.into(),
        }
    }
}

impl DeepL {
    /// Create a new DeepL client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from provider configuration
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(config.api_key.trim(), config.get_endpoint(), config.timeout())
    }

    /// Base URL requests are sent to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn auth_header(&self) -> String {
        format!("DeepL-Auth-Key {}", self.api_key)
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::rejected("DeepL API key is not configured"));
        }
        Ok(())
    }

    /// Send a translate request
    pub async fn complete(&self, request: &DeepLRequest) -> Result<DeepLResponse, ProviderError> {
        self.ensure_configured()?;

        let api_url = format!("{}/v2/translate", self.endpoint);

        let response = self
            .client
            .post(&api_url)
            .header("Authorization", self.auth_header())
            .json(request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("DeepL API error ({}): {}", status, error_text);
            return Err(classify_status(status, &error_text));
        }

        response
            .json::<DeepLResponse>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Failed to parse DeepL API response: {}", e)))
    }

    /// Query character usage for the account
    pub async fn get_usage(&self) -> Result<DeepLUsageResponse, ProviderError> {
        self.ensure_configured()?;

        let api_url = format!("{}/v2/usage", self.endpoint);

        let response = self
            .client
            .get(&api_url)
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("DeepL usage request failed ({}): {}", status, error_text);
            return Err(classify_status(status, &error_text));
        }

        response
            .json::<DeepLUsageResponse>()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("Failed to parse DeepL usage response: {}", e)))
    }

    /// Extract the first translated text from a response
    pub fn extract_text_from_response(response: &DeepLResponse) -> Option<String> {
        response.translations.first().map(|t| t.text.clone())
    }
}

/// Map a target code to one DeepL accepts as a target
///
/// DeepL requires a regional variant for English and Portuguese targets.
pub fn deepl_target_code(target_language: &str) -> &str {
    match target_language {
        "EN" => "EN-US",
        "PT" => "PT-PT",
        other => other,
    }
}

/// Classify a failed HTTP status into a provider error
pub fn classify_status(status: StatusCode, body: &str) -> ProviderError {
    let message = match status.as_u16() {
        403 => "DeepL rejected the API key".to_string(),
        456 => "DeepL character quota exceeded".to_string(),
        _ => format!("DeepL API responded with {}", status),
    };

    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        debug!("Treating DeepL status {} as transient: {}", status, body);
        ProviderError::Unavailable(message)
    } else {
        ProviderError::Rejected {
            status_code: Some(status.as_u16()),
            message,
        }
    }
}

fn classify_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Unavailable(format!("DeepL request timed out: {}", error))
    } else {
        ProviderError::Unavailable(format!("Failed to send request to DeepL API: {}", error))
    }
}

#[async_trait]
impl TranslationProvider for DeepL {
    fn name(&self) -> &'static str {
        "deepl"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let request = DeepLRequest::new(text, deepl_target_code(target_language));
        let response = self.complete(&request).await?;

        Self::extract_text_from_response(&response)
            .ok_or_else(|| ProviderError::rejected("DeepL returned no translation"))
    }

    async fn usage(&self) -> Result<Option<ProviderUsage>, ProviderError> {
        let usage = self.get_usage().await?;
        Ok(Some(ProviderUsage {
            character_count: usage.character_count,
            character_limit: usage.character_limit.filter(|limit| *limit > 0),
        }))
    }
}
