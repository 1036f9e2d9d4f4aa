use bevy::prelude::Entity;
use thiserror::Error;

/// Raised once on activation when the owner reference of a controller resolves to nothing.
///
/// This is a normal "finished" outcome for the controller, not a fault of the application.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("orbit controller {controller:?} has no target transform to drive")]
pub struct TargetUnresolved {
    pub controller: Entity,
}

/// Failures while reading one of the TOML files in the config folder.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}
