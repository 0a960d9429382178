// Application settings
// Loaded from <config_dir>/vincheck/settings.toml unless a path is given

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://vpic.nhtsa.dot.gov";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("cannot read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("cannot parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid setting {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("cannot serialize settings: {0}")]
    Serialize(String),
}

/// Remote decode service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteSettings {
    pub base_url: String,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    /// Timeout retries; attempts = max_retries + 1
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
            max_retries: 2,
            retry_delay_ms: 2000,
        }
    }
}

impl RemoteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingSettings {
    pub displacement_tolerance_l: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            displacement_tolerance_l: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Courtesy pause between VINs
    pub inter_vin_delay_ms: u64,
    pub output_dir: PathBuf,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            inter_vin_delay_ms: 1500,
            output_dir: PathBuf::from("."),
        }
    }
}

impl BatchSettings {
    pub fn inter_vin_delay(&self) -> Duration {
        Duration::from_millis(self.inter_vin_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub remote: RemoteSettings,
    pub matching: MatchingSettings,
    pub batch: BatchSettings,
}

/// Where the effective settings came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Defaults => write!(f, "built-in defaults"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedSettings {
    pub settings: Settings,
    pub source: SettingsSource,
}

impl Settings {
    /// Default settings file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vincheck").join("settings.toml"))
    }

    /// Load settings.
    ///
    /// An explicit path must exist. Without one, the per-user file is used if
    /// present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<LoadedSettings, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_file(path);
        }

        match Self::config_path() {
            Some(path) if path.exists() => Self::load_file(&path),
            _ => {
                tracing::debug!("no settings file, using defaults");
                Ok(LoadedSettings {
                    settings: Self::default(),
                    source: SettingsSource::Defaults,
                })
            }
        }
    }

    fn load_file(path: &Path) -> Result<LoadedSettings, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let settings = Self::from_toml(&contents).map_err(|e| match e {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "settings loaded");
        Ok(LoadedSettings {
            settings,
            source: SettingsSource::File(path.to_path_buf()),
        })
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(input).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<input>"),
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "remote.base_url",
                message: "must not be empty".into(),
            });
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "remote.timeout_secs",
                message: "must be at least 1".into(),
            });
        }
        let tol = self.matching.displacement_tolerance_l;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::Invalid {
                key: "matching.displacement_tolerance_l",
                message: format!("must be a finite, non-negative number (got {tol})"),
            });
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.remote.base_url, DEFAULT_BASE_URL);
        assert_eq!(s.remote.timeout(), Duration::from_secs(15));
        assert_eq!(s.remote.max_retries, 2);
        assert_eq!(s.remote.retry_delay(), Duration::from_millis(2000));
        assert_eq!(s.matching.displacement_tolerance_l, 0.2);
        assert_eq!(s.batch.inter_vin_delay(), Duration::from_millis(1500));
        assert_eq!(s.batch.output_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = Settings::from_toml(
            r#"
[remote]
timeout_secs = 5

[matching]
displacement_tolerance_l = 0.3
"#,
        )
        .unwrap();
        assert_eq!(s.remote.timeout_secs, 5);
        assert_eq!(s.remote.max_retries, 2);
        assert_eq!(s.matching.displacement_tolerance_l, 0.3);
        assert_eq!(s.batch.inter_vin_delay_ms, 1500);
    }

    #[test]
    fn reject_zero_timeout() {
        let err = Settings::from_toml("[remote]\ntimeout_secs = 0\n").unwrap_err();
        assert!(err.to_string().contains("remote.timeout_secs"));
    }

    #[test]
    fn reject_negative_tolerance() {
        let err = Settings::from_toml("[matching]\ndisplacement_tolerance_l = -0.5\n").unwrap_err();
        assert!(err.to_string().contains("displacement_tolerance_l"));
    }

    #[test]
    fn reject_bad_toml() {
        let err = Settings::from_toml("[remote\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Settings::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[batch]\ninter_vin_delay_ms = 0\noutput_dir = \"out\"").unwrap();

        let loaded = Settings::load(Some(file.path())).unwrap();
        assert_eq!(loaded.settings.batch.inter_vin_delay_ms, 0);
        assert_eq!(loaded.settings.batch.output_dir, PathBuf::from("out"));
        assert_eq!(loaded.source, SettingsSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn parse_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "remote = 3").unwrap();
        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn toml_round_trip() {
        let s = Settings::default();
        let text = s.to_toml().unwrap();
        assert!(text.contains("[remote]"));
        assert!(text.contains("displacement_tolerance_l = 0.2"));
        assert_eq!(Settings::from_toml(&text).unwrap(), s);
    }
}
