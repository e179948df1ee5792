//! # Bootstrap
//!
//! Startup sequence for a wallet node:
//!
//! 1. **Load settings** from the environment or a YAML file.
//! 2. **Build the context** over in-memory repositories.
//! 3. **Ensure the authority wallet** exists; an existing one is left
//!    untouched.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{ConfigError, MiwSettings};
use crate::context::WalletContext;
use crate::error::WalletError;
use crate::model::Wallet;
use crate::service::WalletService;

/// Errors during bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// The settings file does not exist.
    #[error("settings file not found: {path}")]
    SettingsNotFound {
        /// The path that was tried.
        path: String,
    },

    /// Settings failed validation.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The authority wallet could not be loaded or minted.
    #[error("authority wallet error: {0}")]
    AuthorityWallet(#[from] WalletError),

    /// Reading the settings file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A bootstrapped node.
#[derive(Debug, Clone)]
pub struct Bootstrapped {
    /// Shared services context.
    pub context: WalletContext,
    /// The authority wallet, existing or freshly minted.
    pub authority_wallet: Wallet,
}

/// Load settings from `path` (YAML) or, if `None`, from the environment.
pub fn load_settings(path: Option<&Path>) -> Result<MiwSettings, BootstrapError> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(BootstrapError::SettingsNotFound {
                    path: path.display().to_string(),
                });
            }
            let yaml = std::fs::read_to_string(path)?;
            Ok(MiwSettings::from_yaml_str(&yaml)?)
        }
        None => Ok(MiwSettings::from_env()?),
    }
}

/// Run the startup sequence against in-memory storage.
pub fn bootstrap(settings: MiwSettings) -> Result<Bootstrapped, BootstrapError> {
    info!(
        host = %settings.host,
        authority_bpn = %settings.authority_wallet_bpn,
        "bootstrapping wallet node"
    );
    let context = WalletContext::in_memory(settings)?;
    let authority_wallet = WalletService::new(context.clone()).create_authority_wallet()?;
    Ok(Bootstrapped {
        context,
        authority_wallet,
    })
}

/// [`load_settings`] then [`bootstrap`].
pub fn bootstrap_from(path: Option<PathBuf>) -> Result<Bootstrapped, BootstrapError> {
    bootstrap(load_settings(path.as_deref())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_settings_file() {
        let err = load_settings(Some(Path::new("/nonexistent/miw.yaml"))).unwrap_err();
        assert!(matches!(err, BootstrapError::SettingsNotFound { .. }));
    }
}
