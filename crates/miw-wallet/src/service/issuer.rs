//! # Issuer Workflows
//!
//! Authority-issued credentials (membership, dismantler, framework,
//! arbitrary credentials for an existing holder), the issuer-side search,
//! and credential validation.

use chrono::Utc;
use miw_core::CredentialSortColumn;
use miw_vc::VerifiableCredential;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::command::{
    IssueBaseWalletCredentialCommand, IssueCredentialCommand, IssueDismantlerCredentialCommand,
    IssueFrameworkCredentialCommand, IssueMembershipCredentialCommand, IssuerCredentialSearch,
};
use crate::context::WalletContext;
use crate::error::WalletError;
use crate::model::{Page, Wallet};
use crate::policy;
use crate::service::common::{self, Recording};

/// Type of the membership credential.
pub const MEMBERSHIP_CREDENTIAL_TYPE: &str = "MembershipCredential";
/// Type of the dismantler credential.
pub const DISMANTLER_CREDENTIAL_TYPE: &str = "DismantlerCredential";

/// Network a membership credential attests to.
pub const MEMBER_OF: &str = "Catena-X";

/// Outcome of validating one credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialValidation {
    /// Proof verified, and unexpired if expiry was checked.
    pub valid: bool,
    /// Present only when expiry was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_expiry_date: Option<bool>,
    /// The credential that was checked.
    pub vc: VerifiableCredential,
}

/// Issuer-side workflows: issuance, listing and credential validation.
#[derive(Debug, Clone)]
pub struct IssuerService {
    ctx: WalletContext,
}

impl IssuerService {
    /// A service over `ctx`.
    pub fn new(ctx: WalletContext) -> Self {
        Self { ctx }
    }

    /// Credentials issued by the caller's wallet. The search identifier
    /// filters by holder.
    pub fn search(
        &self,
        search: &IssuerCredentialSearch,
    ) -> Result<Page<VerifiableCredential>, WalletError> {
        let wallet = common::wallet_by_bpn(&self.ctx, search.caller_bpn())?;
        let mut issued: Vec<_> = self
            .ctx
            .issuers_credentials
            .find_by_issuer(&wallet.did)?
            .into_iter()
            .filter(|c| {
                search
                    .credential_id()
                    .map_or(true, |id| id.as_str() == c.credential_id)
            })
            .filter(|c| {
                search
                    .identifier()
                    .map_or(true, |holder| common::identifier_matches(holder, &c.holder_did))
            })
            .filter(|c| {
                search.types().is_empty()
                    || search
                        .types()
                        .iter()
                        .any(|t| c.data.credential_type.contains(t))
            })
            .collect();

        issued.sort_by(|a, b| {
            let ordering = match search.sort_column() {
                CredentialSortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                CredentialSortColumn::HolderDid => a.holder_did.cmp(&b.holder_did),
                CredentialSortColumn::Type => a.credential_type.cmp(&b.credential_type),
                CredentialSortColumn::CredentialId => a.credential_id.cmp(&b.credential_id),
            };
            common::directed(ordering, search.sort_direction())
        });
        Ok(Page::slice(issued, search.page_number(), search.page_size()).map(|c| c.data))
    }

    /// Issue the network membership credential. One per holder.
    pub fn issue_membership(
        &self,
        cmd: &IssueMembershipCredentialCommand,
    ) -> Result<VerifiableCredential, WalletError> {
        let (authority, holder) = self.authority_and_holder(cmd, MEMBERSHIP_CREDENTIAL_TYPE)?;
        let subject = json!({
            "id": holder.did,
            "holderIdentifier": holder.bpn,
            "memberOf": MEMBER_OF,
            "status": "Active",
            "startTime": Utc::now(),
        });
        self.issue(&authority, &holder, MEMBERSHIP_CREDENTIAL_TYPE, subject)
    }

    /// Issue the dismantler credential. One per holder.
    pub fn issue_dismantler(
        &self,
        cmd: &IssueDismantlerCredentialCommand,
    ) -> Result<VerifiableCredential, WalletError> {
        let (authority, holder) = self.authority_and_holder(cmd.base(), DISMANTLER_CREDENTIAL_TYPE)?;
        let subject = json!({
            "id": holder.did,
            "holderIdentifier": holder.bpn,
            "activityType": cmd.activity_type(),
            "allowedVehicleBrands": cmd.allowed_vehicle_brands(),
        });
        self.issue(&authority, &holder, DISMANTLER_CREDENTIAL_TYPE, subject)
    }

    /// Issue a use-case framework credential. The framework type is the
    /// credential type.
    pub fn issue_framework(
        &self,
        cmd: &IssueFrameworkCredentialCommand,
    ) -> Result<VerifiableCredential, WalletError> {
        let base = cmd.base();
        policy::ensure_authority_issuer(&self.ctx.settings.authority_wallet_bpn, base.caller_bpn())?;
        let authority = common::authority_wallet(&self.ctx)?;
        let holder = common::wallet_by_bpn(&self.ctx, base.holder_bpn())?;
        let subject = json!({
            "id": holder.did,
            "holderIdentifier": holder.bpn,
            "type": cmd.framework_type(),
            "contractTemplate": cmd.contract_template(),
            "contractVersion": cmd.contract_version(),
        });
        self.issue(&authority, &holder, cmd.framework_type().label(), subject)
    }

    /// Sign a caller-supplied credential with the authority key for an
    /// existing holder. Issuer and id are replaced.
    pub fn issue_to_holder(
        &self,
        cmd: &IssueBaseWalletCredentialCommand,
    ) -> Result<VerifiableCredential, WalletError> {
        policy::ensure_authority_issuer(&self.ctx.settings.authority_wallet_bpn, cmd.caller_bpn())?;
        let authority = common::authority_wallet(&self.ctx)?;
        let holder = common::wallet_by_did(&self.ctx, cmd.holder_did().value())?;
        let mut credential = cmd.credential().clone();
        credential.issuer = authority.did.clone();
        credential.id = Some(common::new_credential_id(&authority.did));
        common::sign_and_record(
            &self.ctx,
            &authority,
            &holder.did,
            credential,
            Recording::HolderAndIssuer,
        )
    }

    /// Verify a credential's proof against its issuer's DID document and,
    /// when asked, whether it has expired. Failures are reported in the
    /// result.
    pub fn validate_credential(
        &self,
        credential: &VerifiableCredential,
        with_credential_expiry_date: bool,
    ) -> CredentialValidation {
        let signature_valid = common::credential_signature_valid(&self.ctx, credential);
        let validate_expiry_date =
            with_credential_expiry_date.then(|| policy::is_unexpired(credential, Utc::now()));
        let valid = signature_valid && validate_expiry_date.unwrap_or(true);
        debug!(
            credential = credential.id.as_deref().unwrap_or("<none>"),
            valid, "credential validated"
        );
        CredentialValidation {
            valid,
            validate_expiry_date,
            vc: credential.clone(),
        }
    }

    fn authority_and_holder(
        &self,
        cmd: &IssueCredentialCommand,
        credential_type: &str,
    ) -> Result<(Wallet, Wallet), WalletError> {
        policy::ensure_authority_issuer(&self.ctx.settings.authority_wallet_bpn, cmd.caller_bpn())?;
        let authority = common::authority_wallet(&self.ctx)?;
        let holder = common::wallet_by_bpn(&self.ctx, cmd.holder_bpn())?;
        let held = self.ctx.holders_credentials.find_by_holder(&holder.did)?;
        policy::ensure_not_already_issued(&held, &authority.did, credential_type)?;
        Ok((authority, holder))
    }

    fn issue(
        &self,
        authority: &Wallet,
        holder: &Wallet,
        credential_type: &str,
        subject: serde_json::Value,
    ) -> Result<VerifiableCredential, WalletError> {
        let credential = common::draft_credential(&self.ctx, authority, &[credential_type], subject);
        common::sign_and_record(
            &self.ctx,
            authority,
            &holder.did,
            credential,
            Recording::HolderAndIssuer,
        )
    }
}
