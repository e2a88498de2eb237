use std::fs;
use std::path::Path;

use anyhow::Context;
use eps_config::Config;
use serde_json::Value;

/// Environment configuration, with the JSON profile at `path` layered on top
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config = Config::new();

    let Some(path) = path else {
        return Ok(config);
    };

    tracing::info!("Loading profile {}", path.display());
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile {}", path.display()))?;
    apply_profile(config, &data).with_context(|| format!("Invalid profile {}", path.display()))
}

/// Overlay the keys present in `profile` onto `base`
pub fn apply_profile(base: Config, profile: &str) -> anyhow::Result<Config> {
    let overlay: Value = serde_json::from_str(profile)?;
    anyhow::ensure!(overlay.is_object(), "profile must be a JSON object");

    let mut merged = serde_json::to_value(base)?;
    merge(&mut merged, overlay);
    Ok(serde_json::from_value(merged)?)
}

fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eps_types::Field;

    fn base() -> Config {
        let mut config = Config::default();
        config.catalog.project_id = "from-env".to_string();
        config.catalog.database_id = "db".to_string();
        config
    }

    #[test]
    fn profile_overrides_only_listed_keys() {
        let config = apply_profile(
            base(),
            r#"{ "catalog": { "project_id": "from-profile" }, "search": { "default_field": "bangla" } }"#,
        )
        .unwrap();

        assert_eq!(config.catalog.project_id, "from-profile");
        assert_eq!(config.catalog.database_id, "db");
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.search.default_field, Field::Bangla);
        assert!(config.load_on_start);
    }

    #[test]
    fn non_object_profile_is_rejected() {
        assert!(apply_profile(base(), "[1, 2]").is_err());
        assert!(apply_profile(base(), "{ not json").is_err());
    }

    #[test]
    fn profile_is_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        fs::write(&path, r#"{ "load_on_start": false }"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert!(!config.load_on_start);

        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }
}
