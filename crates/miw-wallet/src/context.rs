//! # Wallet Context
//!
//! Everything the workflow services share: settings, the key-material
//! encryptor, and the four repositories. Cloning is cheap (all `Arc`).

use std::sync::Arc;

use miw_crypto::Encryptor;

use crate::config::{ConfigError, MiwSettings};
use crate::repository::{
    HoldersCredentialRepository, InMemoryHoldersCredentialRepository,
    InMemoryIssuersCredentialRepository, InMemoryWalletKeyRepository, InMemoryWalletRepository,
    IssuersCredentialRepository, WalletKeyRepository, WalletRepository,
};

/// Settings, encryptor and repositories shared by every service.
#[derive(Clone)]
pub struct WalletContext {
    /// Validated settings.
    pub settings: Arc<MiwSettings>,
    /// Encrypts key material at rest.
    pub encryptor: Arc<dyn Encryptor>,
    /// Wallet records.
    pub wallets: Arc<dyn WalletRepository>,
    /// Encrypted wallet keys.
    pub wallet_keys: Arc<dyn WalletKeyRepository>,
    /// Holder-side credential copies.
    pub holders_credentials: Arc<dyn HoldersCredentialRepository>,
    /// Issuer-side credential copies.
    pub issuers_credentials: Arc<dyn IssuersCredentialRepository>,
}

impl std::fmt::Debug for WalletContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletContext")
            .field("settings", &self.settings)
            .field("encryptor", &"[configured]")
            .finish_non_exhaustive()
    }
}

impl WalletContext {
    /// A context over in-memory repositories, encrypting with the key from
    /// `settings`.
    pub fn in_memory(settings: MiwSettings) -> Result<Self, ConfigError> {
        let encryptor = settings.encryptor()?;
        Ok(Self {
            settings: Arc::new(settings),
            encryptor: Arc::new(encryptor),
            wallets: Arc::new(InMemoryWalletRepository::default()),
            wallet_keys: Arc::new(InMemoryWalletKeyRepository::default()),
            holders_credentials: Arc::new(InMemoryHoldersCredentialRepository::default()),
            issuers_credentials: Arc::new(InMemoryIssuersCredentialRepository::default()),
        })
    }
}
