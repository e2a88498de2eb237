use std::env;

use serde::{Deserialize, Serialize};

use self::catalog::CatalogConfig;
use self::favorites::FavoritesConfig;
use self::network::NetworkConfig;
use self::search::SearchConfig;
use self::translator::TranslatorConfig;

pub mod catalog;
pub mod favorites;
pub mod network;
pub mod search;
pub mod translator;

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub search: SearchConfig,
    pub favorites: FavoritesConfig,
    pub translator: TranslatorConfig,
    pub network: NetworkConfig,

    /// Load the first catalog page as soon as the app starts
    pub load_on_start: bool,
    /// Skip the connectivity probe and treat the network as always up
    pub assume_online: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            search: SearchConfig::default(),
            favorites: FavoritesConfig::default(),
            translator: TranslatorConfig::default(),
            network: NetworkConfig::default(),
            load_on_start: true,
            assume_online: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let load_on_start = env::var("LOAD_ON_START")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        let assume_online = env::var("ASSUME_ONLINE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(false);

        Config {
            catalog: CatalogConfig::new(),
            search: SearchConfig::default(),
            favorites: FavoritesConfig::new(),
            translator: TranslatorConfig::new(),
            network: NetworkConfig::new(),

            load_on_start,
            assume_online,
        }
    }
}
