use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_storage_key() -> String {
    "favorites".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FavoritesConfig {
    /// Directory holding the persisted key-value files
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl Default for FavoritesConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

impl FavoritesConfig {
    pub fn new() -> Self {
        Self {
            data_dir: env::var("EPS_DATA_DIR").unwrap_or_else(|_| default_data_dir()),
            storage_key: default_storage_key(),
        }
    }

    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }
}
