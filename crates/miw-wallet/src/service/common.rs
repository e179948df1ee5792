//! Lookups, signing and record keeping shared by the workflow services.

use std::cmp::Ordering;

use chrono::Utc;
use miw_core::{Bpn, Identifier, SortDirection};
use miw_crypto::{SigningKey, VerifyingKey};
use miw_vc::VerifiableCredential;
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::context::WalletContext;
use crate::error::WalletError;
use crate::model::{HoldersCredential, IssuersCredential, Wallet};
use crate::policy;

// ---------------------------------------------------------------------------
// Wallet lookup
// ---------------------------------------------------------------------------

pub(crate) fn wallet_not_found(identifier: &str) -> WalletError {
    WalletError::NotFound(format!("Wallet not found for identifier {identifier}"))
}

/// The wallet named by a DID or a BPN.
pub(crate) fn resolve_wallet(
    ctx: &WalletContext,
    identifier: &Identifier,
) -> Result<Wallet, WalletError> {
    let found = if identifier.is_did() {
        ctx.wallets.find_by_did(identifier.value())?
    } else {
        ctx.wallets.find_by_bpn(&identifier.bpn()?)?
    };
    found.ok_or_else(|| wallet_not_found(identifier.value()))
}

pub(crate) fn wallet_by_bpn(ctx: &WalletContext, bpn: &Bpn) -> Result<Wallet, WalletError> {
    ctx.wallets
        .find_by_bpn(bpn)?
        .ok_or_else(|| wallet_not_found(bpn.as_str()))
}

pub(crate) fn wallet_by_did(ctx: &WalletContext, did: &str) -> Result<Wallet, WalletError> {
    ctx.wallets
        .find_by_did(did)?
        .ok_or_else(|| wallet_not_found(did))
}

pub(crate) fn authority_wallet(ctx: &WalletContext) -> Result<Wallet, WalletError> {
    wallet_by_bpn(ctx, &ctx.settings.authority_wallet_bpn)
}

/// `true` if `did` is the DID named by `identifier`, or ends in its BPN.
pub(crate) fn identifier_matches(identifier: &Identifier, did: &str) -> bool {
    if identifier.is_did() {
        did == identifier.value()
    } else {
        did.rsplit(':').next() == Some(identifier.value())
    }
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// A wallet's decrypted signing key and the method id it signs under.
pub(crate) struct WalletSigner {
    pub key: SigningKey,
    pub verification_method: String,
}

pub(crate) fn signer(ctx: &WalletContext, wallet: &Wallet) -> Result<WalletSigner, WalletError> {
    let record = ctx
        .wallet_keys
        .find_by_wallet_id(wallet.id)?
        .ok_or_else(|| WalletError::Storage(format!("no key record for wallet {}", wallet.bpn)))?;
    let pem = Zeroizing::new(ctx.encryptor.decrypt(&record.encrypted_private_key)?);
    Ok(WalletSigner {
        key: SigningKey::from_pkcs8_pem(&pem)?,
        verification_method: format!("{}#{}", wallet.did, record.key_id),
    })
}

/// The public key `did` publishes under `method`, or its first key.
pub(crate) fn resolve_verifying_key(
    ctx: &WalletContext,
    did: &str,
    method: Option<&str>,
) -> Result<VerifyingKey, WalletError> {
    let wallet = wallet_by_did(ctx, did)?;
    Ok(wallet.did_document.verifying_key(method)?)
}

/// Check a credential's issuer proof against the issuer's published key.
///
/// An unresolvable issuer or a bad signature is a `false`, not an error.
pub(crate) fn credential_signature_valid(
    ctx: &WalletContext,
    credential: &VerifiableCredential,
) -> bool {
    let outcome = resolve_verifying_key(ctx, &credential.issuer, credential.verification_method())
        .and_then(|key| credential.verify(&key).map_err(WalletError::from));
    match outcome {
        Ok(()) => true,
        Err(e) => {
            debug!(
                credential = credential.id.as_deref().unwrap_or("<none>"),
                error = %e,
                "credential signature rejected"
            );
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Issuance
// ---------------------------------------------------------------------------

/// `<did>#<uuid>`.
pub(crate) fn new_credential_id(did: &str) -> String {
    format!("{did}#{}", Uuid::new_v4())
}

/// An unsigned credential from `issuer` with the configured contexts and
/// expiry.
pub(crate) fn draft_credential(
    ctx: &WalletContext,
    issuer: &Wallet,
    types: &[&str],
    subject: serde_json::Value,
) -> VerifiableCredential {
    VerifiableCredential::new(
        new_credential_id(&issuer.did),
        &ctx.settings.vc_contexts,
        types,
        issuer.did.clone(),
        subject,
        ctx.settings.vc_expiry_date,
    )
}

/// How an issued credential is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Recording {
    /// Holder copy only.
    HolderOnly,
    /// Holder copy plus the issuer-side copy.
    HolderAndIssuer,
}

/// Sign `credential` with `issuer`'s key and record it for `holder_did`.
pub(crate) fn sign_and_record(
    ctx: &WalletContext,
    issuer: &Wallet,
    holder_did: &str,
    mut credential: VerifiableCredential,
    recording: Recording,
) -> Result<VerifiableCredential, WalletError> {
    let label = policy::stored_type_label(&credential)?;
    let signer = signer(ctx, issuer)?;
    credential.sign(&signer.key, signer.verification_method)?;
    record_issued(ctx, issuer, holder_did, credential, label, recording)
}

/// Record an already signed `credential` for `holder_did`.
pub(crate) fn record_issued(
    ctx: &WalletContext,
    issuer: &Wallet,
    holder_did: &str,
    credential: VerifiableCredential,
    label: String,
    recording: Recording,
) -> Result<VerifiableCredential, WalletError> {
    let credential_id = credential.id.clone().unwrap_or_default();
    let now = Utc::now();
    ctx.holders_credentials
        .save_holders_credential(HoldersCredential {
            id: Uuid::new_v4(),
            holder_did: holder_did.to_string(),
            issuer_did: issuer.did.clone(),
            credential_type: label.clone(),
            credential_id: credential_id.clone(),
            data: credential.clone(),
            self_issued: holder_did == issuer.did,
            stored: false,
            created_at: now,
        })?;
    if recording == Recording::HolderAndIssuer {
        ctx.issuers_credentials
            .save_issuers_credential(IssuersCredential {
                id: Uuid::new_v4(),
                holder_did: holder_did.to_string(),
                issuer_did: issuer.did.clone(),
                credential_type: label.clone(),
                credential_id: credential_id.clone(),
                data: credential.clone(),
                created_at: now,
            })?;
    }
    debug!(
        issuer = %issuer.bpn,
        holder = holder_did,
        credential_type = %label,
        credential_id = %credential_id,
        "credential issued"
    );
    Ok(credential)
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

pub(crate) fn directed(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_matching() {
        let did = "did:web:localhost%3A8080:BPNL000000000099";
        assert!(identifier_matches(&Identifier::new(did).unwrap(), did));
        assert!(identifier_matches(&Identifier::new("BPNL000000000099").unwrap(), did));
        assert!(!identifier_matches(&Identifier::new("BPNL000000000098").unwrap(), did));
        assert!(!identifier_matches(
            &Identifier::new("did:web:other:BPNL000000000099").unwrap(),
            did
        ));
    }

    #[test]
    fn direction() {
        assert_eq!(directed(Ordering::Less, SortDirection::Asc), Ordering::Less);
        assert_eq!(directed(Ordering::Less, SortDirection::Desc), Ordering::Greater);
    }

    #[test]
    fn credential_ids_are_scoped_to_the_did() {
        let id = new_credential_id("did:web:localhost:BPNL000000000000");
        assert!(miw_core::CredentialId::new(id).is_ok());
    }
}
