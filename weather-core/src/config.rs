use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{County, UnitGroup};

/// Preferences stored on disk.
///
/// `counties` and `selected_county` hold serialized JSON so the file keeps
/// the same key/value shape regardless of how the county type evolves.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_key: Option<String>,

    /// JSON array of `{ "name": ..., "key": ... }`.
    pub counties: Option<String>,

    /// JSON object of the last selected county.
    pub selected_county: Option<String>,

    pub unit_group: Option<UnitGroup>,

    /// Where the county list is fetched from, if anywhere.
    pub counties_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "county-weather", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Take a key from the remote document unless it is blank or unchanged.
    ///
    /// Returns whether the stored key was replaced.
    pub fn adopt_remote_api_key(&mut self, remote: Option<&str>) -> bool {
        let Some(key) = remote.map(str::trim).filter(|key| !key.is_empty()) else {
            return false;
        };
        if self.api_key.as_deref() == Some(key) {
            return false;
        }

        tracing::info!("API key updated from remote config");
        self.api_key = Some(key.to_string());
        true
    }

    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No API key configured.\n\
                     Hint: run `weather configure` and enter your Visual Crossing API key."
                )
            })
    }

    /// The last selected county, or the default one when unset or unreadable.
    pub fn selected_county(&self) -> County {
        let Some(raw) = self.selected_county.as_deref() else {
            return County::default();
        };

        serde_json::from_str(raw).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "stored county is unreadable, using default");
            County::default()
        })
    }

    pub fn set_selected_county(&mut self, county: &County) -> Result<()> {
        let raw = serde_json::to_string(county).context("Failed to serialize county")?;
        self.selected_county = Some(raw);
        Ok(())
    }

    /// Previously cached county list, if present and readable.
    pub fn cached_counties(&self) -> Option<Vec<County>> {
        let raw = self.counties.as_deref()?;

        match serde_json::from_str::<Vec<County>>(raw) {
            Ok(list) if !list.is_empty() => Some(list),
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(error = %err, "cached county list is unreadable");
                None
            }
        }
    }

    pub fn set_cached_counties(&mut self, counties: &[County]) -> Result<()> {
        let raw = serde_json::to_string(counties).context("Failed to serialize county list")?;
        self.counties = Some(raw);
        Ok(())
    }

    pub fn unit_group(&self) -> UnitGroup {
        self.unit_group.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("weather configure"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());
        assert!(cfg.require_api_key().is_err());

        cfg.set_api_key("KEY".into());
        assert_eq!(cfg.require_api_key().unwrap(), "KEY");
    }

    #[test]
    fn blank_remote_key_keeps_stored_one() {
        let mut cfg = Config::default();
        cfg.set_api_key("LOCAL".into());

        assert!(!cfg.adopt_remote_api_key(None));
        assert!(!cfg.adopt_remote_api_key(Some("  ")));
        assert_eq!(cfg.require_api_key().unwrap(), "LOCAL");

        assert!(cfg.adopt_remote_api_key(Some("REMOTE")));
        assert!(!cfg.adopt_remote_api_key(Some("REMOTE")));
        assert_eq!(cfg.require_api_key().unwrap(), "REMOTE");
    }

    #[test]
    fn selected_county_falls_back_to_default() {
        let mut cfg = Config::default();
        assert_eq!(cfg.selected_county(), County::default());

        cfg.selected_county = Some("{broken".into());
        assert_eq!(cfg.selected_county(), County::default());
    }

    #[test]
    fn selected_county_is_stored_as_json() {
        let mut cfg = Config::default();
        let county = County::new("高雄市", "Kaohsiung City");

        cfg.set_selected_county(&county).unwrap();

        assert!(cfg.selected_county.as_deref().unwrap().contains("Kaohsiung City"));
        assert_eq!(cfg.selected_county(), county);
    }

    #[test]
    fn empty_cached_list_is_ignored() {
        let mut cfg = Config::default();
        cfg.set_cached_counties(&[]).unwrap();
        assert!(cfg.cached_counties().is_none());

        cfg.set_cached_counties(&[County::default()]).unwrap();
        assert_eq!(cfg.cached_counties().unwrap(), vec![County::default()]);
    }

    #[test]
    fn save_and_load_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_api_key("SECRET".into());
        cfg.unit_group = Some(UnitGroup::Us);
        cfg.set_selected_county(&County::new("花蓮縣", "Hualien County")).unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.require_api_key().unwrap(), "SECRET");
        assert_eq!(loaded.unit_group(), UnitGroup::Us);
        assert_eq!(loaded.selected_county().key, "Hualien County");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.unit_group(), UnitGroup::Metric);
    }
}
