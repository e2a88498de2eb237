use std::time::Duration;

use async_trait::async_trait;
use eps_translator::{Language, TranslateError, Translation, Translator};
use serde::Deserialize;

const PROVIDER: &str = "google-translate";

/// Form-posting translation endpoint that answers with `translatedText`
#[derive(Clone)]
pub struct BanglaKoreanTranslator {
    client: reqwest::Client,
    api_url: String,
}

impl BanglaKoreanTranslator {
    /// Requests that take longer than `request_timeout` fail with a network error
    pub fn new(api_url: String, request_timeout: Duration) -> Result<Self, TranslateError> {
        let client = client_builder(request_timeout).build()?;
        Ok(Self::with_client(client, api_url))
    }

    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self { client, api_url }
    }
}

#[async_trait]
impl Translator for BanglaKoreanTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<Translation, TranslateError> {
        if self.api_url.is_empty() {
            return Err(TranslateError::NotConfigured);
        }

        if from == to {
            return Err(TranslateError::UnsupportedLanguagePair { from, to });
        }

        let params = [
            ("source_lang", from.code()),
            ("target_lang", to.code()),
            ("text", text),
        ];

        let response = self.client.post(&self.api_url).form(&params).send().await?;

        if response.status() == 429 {
            return Err(TranslateError::RateLimitExceeded);
        }

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!("Translate {} -> {} answered HTTP {}", from, to, status);

        let translated = interpret_response(&body).map_err(|e| {
            if status.is_success() {
                e
            } else {
                TranslateError::api(format!("HTTP {status}"))
            }
        })?;

        Ok(Translation {
            text: translated,
            from,
            to,
            provider: PROVIDER.to_string(),
        })
    }
}

fn client_builder(request_timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder().timeout(request_timeout)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    status: String,
    translated_text: Option<String>,
    message: Option<String>,
}

/// `{ "status": "success", "translatedText": .. }` or `{ "status": .., "message": .. }`
pub fn interpret_response(body: &str) -> Result<String, TranslateError> {
    let response: TranslateResponse = serde_json::from_str(body)
        .map_err(|e| TranslateError::api(format!("Failed to parse response: {}", e)))?;

    if response.status != "success" {
        return Err(TranslateError::api(
            response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        ));
    }

    response
        .translated_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| TranslateError::api("No translation in response"))
}
