use std::fmt;

use serde::{Deserialize, Serialize};

/// Languages the vocabulary catalog pairs together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "bn")]
    Bangla,
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// ISO 639-1 code sent to providers
    pub fn code(&self) -> &'static str {
        match self {
            Language::Bangla => "bn",
            Language::Korean => "ko",
        }
    }

    pub fn other(&self) -> Language {
        match self {
            Language::Bangla => Language::Korean,
            Language::Korean => Language::Bangla,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text from source to target language
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> Result<Translation, TranslateError>;
}

#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub from: Language,
    pub to: Language,
    pub provider: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Upstream answered but reported a failure
    #[error("Translation failed: {message}")]
    Api { message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedLanguagePair { from: Language, to: Language },

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Translation is not configured")]
    NotConfigured,
}

impl TranslateError {
    pub fn api(message: impl Into<String>) -> Self {
        TranslateError::Api {
            message: message.into(),
        }
    }
}
