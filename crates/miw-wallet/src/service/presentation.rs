//! # Presentation Workflows
//!
//! Creation signs a presentation with the caller's wallet key, as a JSON
//! document with an `authentication` proof or as a compact EdDSA JWT.
//!
//! Validation branches on the command's representation:
//!
//! - **JWT**: resolve the `iss` DID, verify the token signature, report
//!   token expiry and (if requested) audience, then verify every embedded
//!   credential.
//! - **JSON**: verify the presentation proof against the signer's DID,
//!   then every embedded credential.
//!
//! Every check is reported in [`PresentationValidation`]; nothing here
//! fails because a presentation is invalid.

use chrono::Utc;
use miw_vc::{Jwt, PresentationClaims, VcError, VerifiableCredential, VerifiablePresentation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::command::{CreatePresentationCommand, PresentationInput, ValidatePresentationCommand};
use crate::context::WalletContext;
use crate::error::WalletError;
use crate::policy;
use crate::service::common;

/// A presentation as returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CreatedPresentation {
    /// Compact JWT.
    Jwt(Jwt),
    /// JSON presentation with an embedded proof.
    Json(VerifiablePresentation),
}

/// Outcome of validating a presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationValidation {
    /// Every performed check passed.
    pub valid: bool,
    /// Audience matched. JWT with a requested audience only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_audience: Option<bool>,
    /// No embedded credential expired. Only when expiry was requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate_expiry_date: Option<bool>,
    /// Token unexpired. JWT only.
    #[serde(
        rename = "validateJWTExpiryDate",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub validate_jwt_expiry_date: Option<bool>,
    /// The presentation as received.
    pub vp: Value,
}

/// Presentation creation and validation.
#[derive(Debug, Clone)]
pub struct PresentationService {
    ctx: WalletContext,
}

impl PresentationService {
    /// A service over `ctx`.
    pub fn new(ctx: WalletContext) -> Self {
        Self { ctx }
    }

    /// Present credentials from the caller's wallet.
    pub fn create(
        &self,
        cmd: &CreatePresentationCommand,
    ) -> Result<CreatedPresentation, WalletError> {
        let wallet = common::wallet_by_bpn(&self.ctx, cmd.caller_bpn())?;
        let signer = common::signer(&self.ctx, &wallet)?;
        let mut vp = VerifiablePresentation::new(wallet.did.clone(), cmd.credentials().to_vec());
        debug!(
            bpn = %wallet.bpn,
            credentials = vp.verifiable_credential.len(),
            as_jwt = cmd.as_jwt(),
            "creating presentation"
        );
        if cmd.as_jwt() {
            let claims = PresentationClaims::new(
                &wallet.did,
                cmd.audience().map(str::to_string),
                vp,
                Utc::now(),
            );
            let jwt = Jwt::sign(claims, &signer.key, Some(signer.verification_method))?;
            return Ok(CreatedPresentation::Jwt(jwt));
        }
        vp.sign(&signer.key, signer.verification_method)?;
        Ok(CreatedPresentation::Json(vp))
    }

    /// Validate a presentation and the credentials it carries.
    pub fn validate(
        &self,
        cmd: &ValidatePresentationCommand,
    ) -> Result<PresentationValidation, WalletError> {
        let now = Utc::now();
        let (presentation_valid, credentials, mut result) = match cmd.input() {
            PresentationInput::Jwt(jwt) => {
                let signature_valid = self.jwt_signature_valid(jwt);
                let unexpired = !jwt.is_expired_at(now);
                let audience = cmd.audience().map(|aud| jwt.audience_matches(aud));
                let result = PresentationValidation {
                    valid: false,
                    validate_audience: audience,
                    validate_expiry_date: None,
                    validate_jwt_expiry_date: Some(unexpired),
                    vp: Value::String(jwt.as_str().to_string()),
                };
                (
                    signature_valid && unexpired && audience.unwrap_or(true),
                    &jwt.claims().vp.verifiable_credential,
                    result,
                )
            }
            PresentationInput::Json(vp) => {
                let result = PresentationValidation {
                    valid: false,
                    validate_audience: None,
                    validate_expiry_date: None,
                    validate_jwt_expiry_date: None,
                    vp: serde_json::to_value(vp).map_err(VcError::from)?,
                };
                (self.json_proof_valid(vp), &vp.verifiable_credential, result)
            }
        };

        let credentials_valid = credentials
            .iter()
            .all(|vc| common::credential_signature_valid(&self.ctx, vc));
        if cmd.with_credential_expiry_date() {
            result.validate_expiry_date = Some(all_unexpired(credentials, now));
        }
        result.valid =
            presentation_valid && credentials_valid && result.validate_expiry_date.unwrap_or(true);
        debug!(
            as_jwt = cmd.as_jwt(),
            valid = result.valid,
            "presentation validated"
        );
        Ok(result)
    }

    fn jwt_signature_valid(&self, jwt: &Jwt) -> bool {
        let outcome = common::resolve_verifying_key(&self.ctx, &jwt.claims().iss, jwt.key_id())
            .and_then(|key| jwt.verify(&key).map_err(WalletError::from));
        log_rejection("presentation token", outcome)
    }

    fn json_proof_valid(&self, vp: &VerifiablePresentation) -> bool {
        let Some(signer_did) = vp.signer_did() else {
            debug!("presentation has neither proof nor holder");
            return false;
        };
        let method = vp.proof.as_ref().map(|p| p.verification_method.as_str());
        let outcome = common::resolve_verifying_key(&self.ctx, signer_did, method)
            .and_then(|key| vp.verify(&key).map_err(WalletError::from));
        log_rejection("presentation proof", outcome)
    }
}

fn all_unexpired(credentials: &[VerifiableCredential], now: chrono::DateTime<Utc>) -> bool {
    credentials.iter().all(|vc| policy::is_unexpired(vc, now))
}

fn log_rejection(what: &str, outcome: Result<(), WalletError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "{what} rejected");
            false
        }
    }
}
