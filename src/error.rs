use thiserror::Error;

use crate::assets::AssetError;
use crate::config::ConfigError;

/// Anything that stops the game from starting.  Nothing after startup is
/// fallible, so this is the only error the binary reports.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("failed to open log file: {0}")]
    Logging(#[source] std::io::Error),
    #[error("terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}
