// Configuration loading

pub mod settings;

pub use settings::{
    BatchSettings, ConfigError, LoadedSettings, MatchingSettings, RemoteSettings, Settings,
    SettingsSource,
};
