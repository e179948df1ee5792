//! # Policy Rules
//!
//! Authorization and data rules applied by the workflows before anything is
//! persisted. Each check returns the error kind the boundary layer reports:
//! authority and ownership failures are `Forbidden`, duplicates `Conflict`,
//! unusable credential data `Validation`.
//!
//! Expiry is never an error. [`is_unexpired`] yields a boolean that the
//! validation workflows report as data.

use chrono::{DateTime, Utc};
use miw_core::Bpn;
use miw_vc::VerifiableCredential;
use tracing::warn;

use crate::error::WalletError;
use crate::model::HoldersCredential;

/// Only the authority may create wallets.
pub fn ensure_can_create_wallet(authority: &Bpn, caller: &Bpn) -> Result<(), WalletError> {
    if authority != caller {
        warn!(caller = %caller, "wallet creation refused: caller is not the authority");
        return Err(WalletError::Forbidden(
            "Base wallet BPN is not matching with request BPN(from token)".to_string(),
        ));
    }
    Ok(())
}

/// The caller must own the target wallet.
pub fn ensure_wallet_owner(wallet_bpn: &Bpn, caller: &Bpn) -> Result<(), WalletError> {
    if wallet_bpn != caller {
        warn!(caller = %caller, wallet = %wallet_bpn, "wallet access refused");
        return Err(WalletError::Forbidden(
            "Wallet BPN is not matching with request BPN(from the token)".to_string(),
        ));
    }
    Ok(())
}

/// The authority reads any wallet, everyone else only their own.
pub fn ensure_can_read_wallet(
    authority: &Bpn,
    wallet_bpn: &Bpn,
    caller: &Bpn,
) -> Result<(), WalletError> {
    if caller == authority {
        return Ok(());
    }
    ensure_wallet_owner(wallet_bpn, caller)
}

/// Only the authority issues membership, dismantler, framework and
/// base-wallet credentials.
pub fn ensure_authority_issuer(authority: &Bpn, caller: &Bpn) -> Result<(), WalletError> {
    if authority != caller {
        warn!(caller = %caller, "issuance refused: caller is not the authority");
        return Err(WalletError::Forbidden(
            "Base wallet BPN is not matching with request BPN(from token)".to_string(),
        ));
    }
    Ok(())
}

/// The persisted type label: declared types without
/// `VerifiableCredential`, comma-joined.
///
/// # Errors
///
/// [`WalletError::BadData`] if the credential declares no type.
pub fn stored_type_label(credential: &VerifiableCredential) -> Result<String, WalletError> {
    if credential
        .credential_type
        .types()
        .iter()
        .all(|t| t.trim().is_empty())
    {
        return Err(WalletError::BadData(
            "Invalid types provided in credentials".to_string(),
        ));
    }
    Ok(credential.credential_type.without_base().join(","))
}

/// A holder may hold at most one credential of `credential_type` issued by
/// the authority.
pub fn ensure_not_already_issued(
    held: &[HoldersCredential],
    issuer_did: &str,
    credential_type: &str,
) -> Result<(), WalletError> {
    let duplicate = held
        .iter()
        .any(|c| c.issuer_did == issuer_did && c.data.credential_type.contains(credential_type));
    if duplicate {
        return Err(WalletError::Conflict(format!(
            "Credential of type {credential_type} is already exists"
        )));
    }
    Ok(())
}

/// `true` unless the credential carries an expiration date before `now`.
pub fn is_unexpired(credential: &VerifiableCredential, now: DateTime<Utc>) -> bool {
    !credential.is_expired_at(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use miw_vc::CredentialTypeValue;
    use serde_json::json;
    use uuid::Uuid;

    fn bpn(s: &str) -> Bpn {
        Bpn::new(s).unwrap()
    }

    fn vc(types: &[&str]) -> VerifiableCredential {
        VerifiableCredential::new(
            "did:web:localhost:BPNL000000000000#1b9d6bcd-bbfd-4b2d-9b5d-ab8dfbbd4bed",
            &[],
            types,
            "did:web:localhost:BPNL000000000000",
            json!({"id": "did:web:localhost:BPNL000000000099"}),
            None,
        )
    }

    #[test]
    fn authority_checks() {
        let authority = bpn("BPNL000000000000");
        let other = bpn("BPNL000000000099");
        ensure_can_create_wallet(&authority, &authority).unwrap();
        assert_eq!(
            ensure_can_create_wallet(&authority, &other).unwrap_err().code(),
            "FORBIDDEN"
        );
        assert_eq!(
            ensure_authority_issuer(&authority, &other).unwrap_err().code(),
            "FORBIDDEN"
        );
    }

    #[test]
    fn read_access() {
        let authority = bpn("BPNL000000000000");
        let owner = bpn("BPNL000000000099");
        let stranger = bpn("BPNL000000000098");
        ensure_can_read_wallet(&authority, &owner, &authority).unwrap();
        ensure_can_read_wallet(&authority, &owner, &owner).unwrap();
        assert!(ensure_can_read_wallet(&authority, &owner, &stranger).is_err());
    }

    #[test]
    fn type_label_strips_the_base_type() {
        let label = stored_type_label(&vc(&["MembershipCredential", "SummaryCredential"])).unwrap();
        assert_eq!(label, "MembershipCredential,SummaryCredential");
    }

    #[test]
    fn empty_type_list_is_bad_data() {
        let mut credential = vc(&[]);
        credential.credential_type = CredentialTypeValue::Array(vec![]);
        assert_eq!(stored_type_label(&credential).unwrap_err().code(), "VALIDATION_ERROR");
    }

    #[test]
    fn duplicate_issuance_detected() {
        let credential = vc(&["MembershipCredential"]);
        let held = vec![HoldersCredential {
            id: Uuid::new_v4(),
            holder_did: "did:web:localhost:BPNL000000000099".into(),
            issuer_did: credential.issuer.clone(),
            credential_type: "MembershipCredential".into(),
            credential_id: credential.id.clone().unwrap_or_default(),
            data: credential.clone(),
            self_issued: false,
            stored: false,
            created_at: Utc::now(),
        }];
        assert_eq!(
            ensure_not_already_issued(&held, &credential.issuer, "MembershipCredential")
                .unwrap_err()
                .code(),
            "CONFLICT"
        );
        ensure_not_already_issued(&held, &credential.issuer, "DismantlerCredential").unwrap();
        ensure_not_already_issued(&held, "did:web:other:BPNL000000000001", "MembershipCredential")
            .unwrap();
    }

    #[test]
    fn expiry_is_a_boolean() {
        let mut credential = vc(&["BpnCredential"]);
        let now = Utc::now();
        assert!(is_unexpired(&credential, now));
        credential.expiration_date = Some(now - Duration::days(1));
        assert!(!is_unexpired(&credential, now));
        credential.expiration_date = Some(now + Duration::days(1));
        assert!(is_unexpired(&credential, now));
    }
}
