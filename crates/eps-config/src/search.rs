use eps_types::Field;
use serde::{Deserialize, Serialize};

fn default_debounce_ms() -> u64 {
    300
}

fn default_max_suggestions() -> usize {
    5
}

fn default_field() -> Field {
    Field::Korean
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// Quiet period before a typed query is evaluated
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    /// Field searched when a command does not name one
    #[serde(default = "default_field")]
    pub default_field: Field,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            max_suggestions: default_max_suggestions(),
            default_field: default_field(),
        }
    }
}
