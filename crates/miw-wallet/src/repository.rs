//! # Persistence Contracts
//!
//! Storage engines are external. The workflows depend only on the traits
//! below; [`InMemoryWalletRepository`] and its siblings implement them over
//! a shared [`Store`] so every workflow runs without a database.
//!
//! Wallet uniqueness per BPN is enforced here: the in-memory wallet
//! repository checks and inserts under one write lock, and a duplicate
//! surfaces as [`WalletError::Conflict`] with the same message the
//! workflow uses for its own pre-check.
//!
//! Each contract also carries the deletions wallet creation needs to undo
//! a partially persisted wallet.

use std::collections::HashMap;
use std::sync::Arc;

use miw_core::Bpn;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::WalletError;
use crate::model::{HoldersCredential, IssuersCredential, Wallet, WalletKey};

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Wallet records.
pub trait WalletRepository: Send + Sync {
    /// The wallet owned by `bpn`.
    fn find_by_bpn(&self, bpn: &Bpn) -> Result<Option<Wallet>, WalletError>;

    /// The wallet whose DID is `did`.
    fn find_by_did(&self, did: &str) -> Result<Option<Wallet>, WalletError>;

    /// Whether `bpn` already has a wallet.
    fn exists_by_bpn(&self, bpn: &Bpn) -> Result<bool, WalletError>;

    /// Insert a new wallet.
    ///
    /// # Errors
    ///
    /// [`WalletError::Conflict`] if a wallet for the BPN already exists.
    fn save_wallet(&self, wallet: Wallet) -> Result<Wallet, WalletError>;

    /// Every wallet, unordered.
    fn list_wallets(&self) -> Result<Vec<Wallet>, WalletError>;

    /// Remove a wallet record. Removing an unknown id is not an error.
    fn delete_wallet(&self, wallet_id: Uuid) -> Result<(), WalletError>;
}

/// Wallet key records.
pub trait WalletKeyRepository: Send + Sync {
    /// Persist a wallet's key material.
    fn save_key(&self, key: WalletKey) -> Result<WalletKey, WalletError>;

    /// Key material of a wallet.
    fn find_by_wallet_id(&self, wallet_id: Uuid) -> Result<Option<WalletKey>, WalletError>;

    /// Remove every key of a wallet.
    fn delete_by_wallet_id(&self, wallet_id: Uuid) -> Result<(), WalletError>;
}

/// Holder-side credential records.
pub trait HoldersCredentialRepository: Send + Sync {
    /// Persist a holder-side credential.
    fn save_holders_credential(
        &self,
        credential: HoldersCredential,
    ) -> Result<HoldersCredential, WalletError>;

    /// Every credential held by `holder_did`.
    fn find_by_holder(&self, holder_did: &str) -> Result<Vec<HoldersCredential>, WalletError>;

    /// Remove every credential held by `holder_did`.
    fn delete_by_holder(&self, holder_did: &str) -> Result<(), WalletError>;
}

/// Issuer-side credential records.
pub trait IssuersCredentialRepository: Send + Sync {
    /// Persist an issuer-side credential copy.
    fn save_issuers_credential(
        &self,
        credential: IssuersCredential,
    ) -> Result<IssuersCredential, WalletError>;

    /// Every credential issued by `issuer_did`.
    fn find_by_issuer(&self, issuer_did: &str) -> Result<Vec<IssuersCredential>, WalletError>;

    /// Remove every issuer-side copy held by `holder_did`.
    fn delete_by_holder(&self, holder_did: &str) -> Result<(), WalletError>;
}

/// Message of the duplicate-wallet conflict.
pub fn wallet_exists_message(bpn: &Bpn) -> String {
    format!("Wallet is already exists for bpn {bpn}")
}

// ---------------------------------------------------------------------------
// Generic in-memory store
// ---------------------------------------------------------------------------

/// Thread-safe, cloneable map from record id to record.
///
/// Synchronous `parking_lot` locks; no lock is held across calls into
/// other stores.
#[derive(Debug)]
pub struct Store<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Clone + Send + Sync> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: Clone + Send + Sync> Store<T> {
    /// An empty store.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert or replace a record.
    pub fn insert(&self, id: Uuid, value: T) -> Option<T> {
        self.data.write().insert(id, value)
    }

    /// Insert `value` unless an existing record satisfies `conflicts`.
    /// Check and insert run under one write lock.
    ///
    /// Returns `false` (and drops `value`) on conflict.
    pub fn insert_unless(&self, id: Uuid, value: T, conflicts: impl Fn(&T) -> bool) -> bool {
        let mut guard = self.data.write();
        if guard.values().any(conflicts) {
            return false;
        }
        guard.insert(id, value);
        true
    }

    /// Remove a record by id.
    pub fn remove(&self, id: &Uuid) -> Option<T> {
        self.data.write().remove(id)
    }

    /// Drop every record matching `pred`. Returns how many were removed.
    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> usize {
        let mut guard = self.data.write();
        let before = guard.len();
        guard.retain(|_, v| !pred(v));
        before - guard.len()
    }

    /// A clone of the record with `id`.
    pub fn get(&self, id: &Uuid) -> Option<T> {
        self.data.read().get(id).cloned()
    }

    /// First record matching `pred`.
    pub fn find(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.data.read().values().find(|v| pred(v)).cloned()
    }

    /// All records matching `pred`.
    pub fn filter(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.data
            .read()
            .values()
            .filter(|v| pred(v))
            .cloned()
            .collect()
    }

    /// Clones of every record, unordered.
    pub fn list(&self) -> Vec<T> {
        self.data.read().values().cloned().collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone + Send + Sync> Default for Store<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// In-memory implementations
// ---------------------------------------------------------------------------

/// In-memory [`WalletRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryWalletRepository {
    store: Store<Wallet>,
}

impl WalletRepository for InMemoryWalletRepository {
    fn find_by_bpn(&self, bpn: &Bpn) -> Result<Option<Wallet>, WalletError> {
        Ok(self.store.find(|w| &w.bpn == bpn))
    }

    fn find_by_did(&self, did: &str) -> Result<Option<Wallet>, WalletError> {
        Ok(self.store.find(|w| w.did == did))
    }

    fn exists_by_bpn(&self, bpn: &Bpn) -> Result<bool, WalletError> {
        Ok(self.store.find(|w| &w.bpn == bpn).is_some())
    }

    fn save_wallet(&self, mut wallet: Wallet) -> Result<Wallet, WalletError> {
        // Held credentials are attached on read only.
        wallet.verifiable_credentials.clear();
        let bpn = wallet.bpn.clone();
        if self
            .store
            .insert_unless(wallet.id, wallet.clone(), |w| w.bpn == bpn)
        {
            Ok(wallet)
        } else {
            Err(WalletError::Conflict(wallet_exists_message(&bpn)))
        }
    }

    fn list_wallets(&self) -> Result<Vec<Wallet>, WalletError> {
        Ok(self.store.list())
    }

    fn delete_wallet(&self, wallet_id: Uuid) -> Result<(), WalletError> {
        self.store.remove(&wallet_id);
        Ok(())
    }
}

/// In-memory [`WalletKeyRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryWalletKeyRepository {
    store: Store<WalletKey>,
}

impl WalletKeyRepository for InMemoryWalletKeyRepository {
    fn save_key(&self, key: WalletKey) -> Result<WalletKey, WalletError> {
        self.store.insert(key.id, key.clone());
        Ok(key)
    }

    fn find_by_wallet_id(&self, wallet_id: Uuid) -> Result<Option<WalletKey>, WalletError> {
        Ok(self.store.find(|k| k.wallet_id == wallet_id))
    }

    fn delete_by_wallet_id(&self, wallet_id: Uuid) -> Result<(), WalletError> {
        self.store.remove_where(|k| k.wallet_id == wallet_id);
        Ok(())
    }
}

/// In-memory [`HoldersCredentialRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryHoldersCredentialRepository {
    store: Store<HoldersCredential>,
}

impl HoldersCredentialRepository for InMemoryHoldersCredentialRepository {
    fn save_holders_credential(
        &self,
        credential: HoldersCredential,
    ) -> Result<HoldersCredential, WalletError> {
        self.store.insert(credential.id, credential.clone());
        Ok(credential)
    }

    fn find_by_holder(&self, holder_did: &str) -> Result<Vec<HoldersCredential>, WalletError> {
        Ok(self.store.filter(|c| c.holder_did == holder_did))
    }

    fn delete_by_holder(&self, holder_did: &str) -> Result<(), WalletError> {
        self.store.remove_where(|c| c.holder_did == holder_did);
        Ok(())
    }
}

/// In-memory [`IssuersCredentialRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryIssuersCredentialRepository {
    store: Store<IssuersCredential>,
}

impl IssuersCredentialRepository for InMemoryIssuersCredentialRepository {
    fn save_issuers_credential(
        &self,
        credential: IssuersCredential,
    ) -> Result<IssuersCredential, WalletError> {
        self.store.insert(credential.id, credential.clone());
        Ok(credential)
    }

    fn find_by_issuer(&self, issuer_did: &str) -> Result<Vec<IssuersCredential>, WalletError> {
        Ok(self.store.filter(|c| c.issuer_did == issuer_did))
    }

    fn delete_by_holder(&self, holder_did: &str) -> Result<(), WalletError> {
        self.store.remove_where(|c| c.holder_did == holder_did);
        Ok(())
    }
}
