use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::identity::BeaconIdentity;

pub const CONFIG_FILE_NAME: &str = "beacon.json";
pub const DEFAULT_RADIO_NAME: &str = "ibeacon";

/// Beacon settings as read from `beacon.json` or the command line.
///
/// Every field is optional so a file and a set of flags can be layered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub uuid: Option<String>,
    pub major: Option<u16>,
    pub minor: Option<u16>,
    pub tx_power: Option<i8>,
    pub radio_name: Option<String>,
}

impl BeaconConfig {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        debug!(path = %path.display(), "Loaded beacon config");
        Ok(config)
    }

    /// Load from `path` if given, else from the default location if a file
    /// exists there, else start empty.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => match default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Values set in `overrides` win over values in `self`.
    pub fn merge(self, overrides: BeaconConfig) -> Self {
        Self {
            uuid: overrides.uuid.or(self.uuid),
            major: overrides.major.or(self.major),
            minor: overrides.minor.or(self.minor),
            tx_power: overrides.tx_power.or(self.tx_power),
            radio_name: overrides.radio_name.or(self.radio_name),
        }
    }

    pub fn identity(&self) -> ConfigResult<BeaconIdentity> {
        let uuid = self.uuid.clone().ok_or(ConfigError::Missing("uuid"))?;
        let major = self.major.ok_or(ConfigError::Missing("major"))?;
        let minor = self.minor.ok_or(ConfigError::Missing("minor"))?;
        let tx_power = self.tx_power.ok_or(ConfigError::Missing("tx_power"))?;

        Ok(BeaconIdentity::new(uuid, major, minor, tx_power)?)
    }

    pub fn radio_name(&self) -> &str {
        self.radio_name.as_deref().unwrap_or(DEFAULT_RADIO_NAME)
    }
}

pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "ibeacon", "ibeacond")
        .map(|d| d.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn full() -> BeaconConfig {
        BeaconConfig {
            uuid: Some("E2C56DB5DFFB48D2B060D0F5A71096E0".into()),
            major: Some(1),
            minor: Some(1),
            tx_power: Some(-59),
            radio_name: None,
        }
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let overrides = BeaconConfig {
            major: Some(42),
            radio_name: Some("lab".into()),
            ..Default::default()
        };
        let merged = full().merge(overrides);

        assert_eq!(merged.major, Some(42));
        assert_eq!(merged.minor, Some(1));
        assert_eq!(merged.radio_name(), "lab");
    }

    #[test]
    fn test_identity_missing_field() {
        let config = BeaconConfig {
            tx_power: None,
            ..full()
        };
        assert!(matches!(
            config.identity(),
            Err(ConfigError::Missing("tx_power"))
        ));
    }

    #[test]
    fn test_identity_bad_uuid() {
        let config = BeaconConfig {
            uuid: Some("E2C56DB5".into()),
            ..full()
        };
        assert!(matches!(config.identity(), Err(ConfigError::Beacon(_))));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{ "uuid": "E2C56DB5DFFB48D2B060D0F5A71096E0", "tx_power": -59 }"#)
            .unwrap();

        let config = BeaconConfig::load(&path).unwrap();

        assert_eq!(config.tx_power, Some(-59));
        assert_eq!(config.major, None);
        assert_eq!(config.radio_name(), DEFAULT_RADIO_NAME);
    }

    #[test]
    fn test_load_or_default_explicit_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, serde_json::to_string(&full()).unwrap()).unwrap();

        let config = BeaconConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config, full());
        assert_eq!(config.identity().unwrap().major, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(matches!(BeaconConfig::load(&path), Err(ConfigError::Io(_))));
    }
}
