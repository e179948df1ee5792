//! # Holder Workflows
//!
//! Searching the caller's own credentials and issuing self-issued
//! credentials.

use miw_core::SortColumn;
use miw_vc::VerifiableCredential;

use crate::command::{HolderCredentialSearch, IssueSelfIssuedCredentialCommand};
use crate::context::WalletContext;
use crate::error::WalletError;
use crate::model::Page;
use crate::service::common::{self, Recording};

/// Holder-side workflows: listing and self-issuing credentials.
#[derive(Debug, Clone)]
pub struct HolderService {
    ctx: WalletContext,
}

impl HolderService {
    /// A service over `ctx`.
    pub fn new(ctx: WalletContext) -> Self {
        Self { ctx }
    }

    /// Credentials held by the caller's wallet. The search identifier
    /// filters by issuer.
    pub fn search(
        &self,
        search: &HolderCredentialSearch,
    ) -> Result<Page<VerifiableCredential>, WalletError> {
        let wallet = common::wallet_by_bpn(&self.ctx, search.caller_bpn())?;
        let mut held: Vec<_> = self
            .ctx
            .holders_credentials
            .find_by_holder(&wallet.did)?
            .into_iter()
            .filter(|c| {
                search
                    .credential_id()
                    .map_or(true, |id| id.as_str() == c.credential_id)
            })
            .filter(|c| {
                search
                    .identifier()
                    .map_or(true, |issuer| common::identifier_matches(issuer, &c.issuer_did))
            })
            .filter(|c| {
                search.types().is_empty()
                    || search
                        .types()
                        .iter()
                        .any(|t| c.data.credential_type.contains(t))
            })
            .collect();

        held.sort_by(|a, b| {
            let ordering = match search.sort_column() {
                SortColumn::CreatedAt => a.created_at.cmp(&b.created_at),
                SortColumn::IssuerDid => a.issuer_did.cmp(&b.issuer_did),
                SortColumn::HolderDid => a.holder_did.cmp(&b.holder_did),
                SortColumn::Type => a.credential_type.cmp(&b.credential_type),
                SortColumn::CredentialId => a.credential_id.cmp(&b.credential_id),
                SortColumn::SelfIssued => a.self_issued.cmp(&b.self_issued),
                SortColumn::Stored => a.stored.cmp(&b.stored),
            };
            common::directed(ordering, search.sort_direction())
        });
        Ok(Page::slice(held, search.page_number(), search.page_size()).map(|c| c.data))
    }

    /// Sign the supplied credential with the caller's own key. Issuer and id
    /// are replaced with the caller's DID and a fresh credential id.
    pub fn issue_self_issued(
        &self,
        cmd: &IssueSelfIssuedCredentialCommand,
    ) -> Result<VerifiableCredential, WalletError> {
        let wallet = common::wallet_by_bpn(&self.ctx, cmd.caller_bpn())?;
        let mut credential = cmd.credential().clone();
        credential.issuer = wallet.did.clone();
        credential.id = Some(common::new_credential_id(&wallet.did));
        common::sign_and_record(&self.ctx, &wallet, &wallet.did, credential, Recording::HolderOnly)
    }
}
