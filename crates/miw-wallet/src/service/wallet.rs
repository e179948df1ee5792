//! # Wallet Workflows
//!
//! Wallet creation (authority only), authority bootstrap, wallet reads and
//! listings, and storage of third-party credentials.
//!
//! ## Creation sequence
//!
//! 1. Authority check (`Forbidden`), then BPN uniqueness (`Conflict`).
//! 2. [`WalletAggregate`] derives the DID, generates the key, builds the
//!    DID document. Both key PEMs are encrypted.
//! 3. The authority wallet signs a `BpnCredential` for the new wallet. For
//!    the authority itself the credential is self-issued with the fresh key.
//! 4. Wallet, key and credential records are saved. The repository repeats
//!    the uniqueness check atomically. If a save after the wallet record
//!    fails, everything saved for the wallet is deleted again.
//!
//! Steps 1 to 3 persist nothing, so a failure there leaves no trace.

use chrono::Utc;
use miw_core::{Bpn, Identifier, WalletSortColumn};
use serde_json::json;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::aggregate::WalletAggregate;
use crate::command::{CreateWalletCommand, GetWalletCommand, StoreCredentialCommand};
use crate::context::WalletContext;
use crate::error::WalletError;
use crate::model::{HoldersCredential, Page, Wallet, WalletKey};
use crate::policy;
use crate::repository::wallet_exists_message;
use crate::service::common::{self, Recording};

/// Type of the credential every new wallet receives.
pub const BPN_CREDENTIAL_TYPE: &str = "BpnCredential";

/// Wallet creation, lookup, listing and credential storage.
#[derive(Debug, Clone)]
pub struct WalletService {
    ctx: WalletContext,
}

impl WalletService {
    /// A service over `ctx`.
    pub fn new(ctx: WalletContext) -> Self {
        Self { ctx }
    }

    /// Create a wallet on behalf of the authority.
    pub fn create_wallet(&self, cmd: &CreateWalletCommand) -> Result<Wallet, WalletError> {
        policy::ensure_can_create_wallet(&self.ctx.settings.authority_wallet_bpn, cmd.caller_bpn())?;
        self.mint(cmd.name(), cmd.bpn())
    }

    /// Create the authority wallet if it does not exist yet.
    pub fn create_authority_wallet(&self) -> Result<Wallet, WalletError> {
        let settings = &self.ctx.settings;
        if let Some(existing) = self.ctx.wallets.find_by_bpn(&settings.authority_wallet_bpn)? {
            info!(bpn = %existing.bpn, did = %existing.did, "authority wallet already exists");
            return Ok(existing);
        }
        let wallet = self.mint(&settings.authority_wallet_name, &settings.authority_wallet_bpn)?;
        info!(bpn = %wallet.bpn, did = %wallet.did, "authority wallet created");
        Ok(wallet)
    }

    fn mint(&self, name: &str, bpn: &Bpn) -> Result<Wallet, WalletError> {
        let settings = &self.ctx.settings;
        if self.ctx.wallets.exists_by_bpn(bpn)? {
            return Err(WalletError::Conflict(wallet_exists_message(bpn)));
        }
        let authority = if *bpn == settings.authority_wallet_bpn {
            None
        } else {
            Some(common::authority_wallet(&self.ctx)?)
        };

        let aggregate = WalletAggregate::builder()
            .host(settings.host.clone())
            .bpn(bpn.clone())
            .context_urls(settings.did_document_context_urls.clone())
            .build()?;
        let now = Utc::now();
        let wallet = Wallet {
            id: Uuid::new_v4(),
            name: name.to_string(),
            bpn: bpn.clone(),
            did: aggregate.did().to_string(),
            did_document: aggregate.document()?,
            algorithm: aggregate.algorithm(),
            created_at: now,
            verifiable_credentials: Vec::new(),
        };
        let key = WalletKey {
            id: Uuid::new_v4(),
            wallet_id: wallet.id,
            key_id: aggregate.key_id().to_string(),
            encrypted_private_key: aggregate.encrypted_private_key(self.ctx.encryptor.as_ref())?,
            encrypted_public_key: aggregate.encrypted_public_key(self.ctx.encryptor.as_ref())?,
            created_at: now,
        };

        let issuer = authority.as_ref().unwrap_or(&wallet);
        let mut credential = common::draft_credential(
            &self.ctx,
            issuer,
            &[BPN_CREDENTIAL_TYPE],
            json!({ "id": wallet.did, "bpn": wallet.bpn }),
        );
        let label = policy::stored_type_label(&credential)?;
        match &authority {
            Some(authority) => {
                let signer = common::signer(&self.ctx, authority)?;
                credential.sign(&signer.key, signer.verification_method)?;
            }
            None => credential.sign(aggregate.signing_key(), aggregate.verification_method_id())?,
        }

        self.ctx.wallets.save_wallet(wallet.clone())?;
        let persisted = self.ctx.wallet_keys.save_key(key).and_then(|_| {
            common::record_issued(
                &self.ctx,
                issuer,
                &wallet.did,
                credential,
                label,
                Recording::HolderAndIssuer,
            )
        });
        if let Err(e) = persisted {
            self.discard(&wallet);
            return Err(e);
        }
        debug!(bpn = %wallet.bpn, did = %wallet.did, "wallet created");
        Ok(wallet)
    }

    /// Remove whatever a failed creation persisted for `wallet`, freeing
    /// its BPN for a retry.
    fn discard(&self, wallet: &Wallet) {
        let steps = [
            self.ctx.issuers_credentials.delete_by_holder(&wallet.did),
            self.ctx.holders_credentials.delete_by_holder(&wallet.did),
            self.ctx.wallet_keys.delete_by_wallet_id(wallet.id),
            self.ctx.wallets.delete_wallet(wallet.id),
        ];
        for e in steps.into_iter().filter_map(Result::err) {
            warn!(bpn = %wallet.bpn, error = %e, "could not discard partially created wallet");
        }
    }

    /// Read a wallet, optionally with the credentials it holds.
    pub fn get_wallet(
        &self,
        identifier: &Identifier,
        caller: &Bpn,
        with_credentials: bool,
    ) -> Result<Wallet, WalletError> {
        let mut wallet = common::resolve_wallet(&self.ctx, identifier)?;
        policy::ensure_can_read_wallet(&self.ctx.settings.authority_wallet_bpn, &wallet.bpn, caller)?;
        if with_credentials {
            wallet.verifiable_credentials = self
                .ctx
                .holders_credentials
                .find_by_holder(&wallet.did)?
                .into_iter()
                .map(|c| c.data)
                .collect();
        }
        Ok(wallet)
    }

    /// A sorted page of all wallets.
    pub fn list_wallets(&self, cmd: &GetWalletCommand) -> Result<Page<Wallet>, WalletError> {
        let mut wallets = self.ctx.wallets.list_wallets()?;
        wallets.sort_by(|a, b| {
            let ordering = match cmd.sort_column() {
                WalletSortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                WalletSortColumn::Name => a.name.cmp(&b.name),
                WalletSortColumn::Bpn => a.bpn.cmp(&b.bpn),
                WalletSortColumn::Did => a.did.cmp(&b.did),
            };
            common::directed(ordering, cmd.sort_direction())
        });
        Ok(Page::slice(wallets, cmd.page_number(), cmd.page_size()))
    }

    /// Store a credential received from a third party in the caller's own
    /// wallet. Returns a confirmation message.
    pub fn store_credential(&self, cmd: &StoreCredentialCommand) -> Result<String, WalletError> {
        let wallet = common::resolve_wallet(&self.ctx, cmd.identifier())?;
        policy::ensure_wallet_owner(&wallet.bpn, cmd.caller_bpn())?;

        let credential = cmd.credential();
        let label = policy::stored_type_label(credential)?;
        let credential_id = credential.id.clone().unwrap_or_default();
        self.ctx
            .holders_credentials
            .save_holders_credential(HoldersCredential {
                id: Uuid::new_v4(),
                holder_did: wallet.did.clone(),
                issuer_did: credential.issuer.clone(),
                credential_type: label,
                credential_id: credential_id.clone(),
                data: credential.clone(),
                self_issued: false,
                stored: true,
                created_at: Utc::now(),
            })?;
        debug!(bpn = %wallet.bpn, credential_id = %credential_id, "credential stored");
        Ok(format!(
            "Credential with id {credential_id} has been successfully stored"
        ))
    }
}
