use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    false
}

#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Fall back to machine translation when the catalog has no match
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub api_url: String,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let api_url = env::var("TRANSLATE_API_URL").unwrap_or_default();

        Self {
            enabled: !api_url.is_empty(),
            api_url,
        }
    }
}
