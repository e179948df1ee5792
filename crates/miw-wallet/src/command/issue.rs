//! # Issuance Commands
//!
//! Authority-issued credentials share a base of (holder BPN, caller BPN).
//! Dismantler credentials add an activity type and a non-empty brand set;
//! framework credentials add the contract reference and the framework type.
//!
//! Two further commands carry caller-supplied credential bodies: a holder
//! issuing to itself, and the authority issuing to an existing holder DID.

use std::collections::BTreeSet;

use miw_core::{ActivityType, Bpn, FrameworkCredentialType, Identifier, ValidationError};
use miw_vc::VerifiableCredential;

// ---------------------------------------------------------------------------
// Base
// ---------------------------------------------------------------------------

/// Holder and caller of an authority-issued credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueCredentialCommand {
    holder_bpn: Bpn,
    caller_bpn: Bpn,
}

/// A membership credential carries nothing beyond the base.
pub type IssueMembershipCredentialCommand = IssueCredentialCommand;

impl IssueCredentialCommand {
    /// Start a command.
    pub fn builder() -> IssueCredentialCommandBuilder {
        IssueCredentialCommandBuilder::default()
    }

    /// BPN of the receiving wallet.
    pub fn holder_bpn(&self) -> &Bpn {
        &self.holder_bpn
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// Builder for [`IssueCredentialCommand`].
#[derive(Debug, Clone, Default)]
pub struct IssueCredentialCommandBuilder {
    holder_bpn: Option<Bpn>,
    caller_bpn: Option<Bpn>,
}

impl IssueCredentialCommandBuilder {
    /// BPN of the receiving wallet.
    pub fn holder_bpn(mut self, bpn: Bpn) -> Self {
        self.holder_bpn = Some(bpn);
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.caller_bpn = Some(bpn);
        self
    }

    /// Check that both BPNs are set.
    pub fn build(self) -> Result<IssueCredentialCommand, ValidationError> {
        let holder_bpn = self
            .holder_bpn
            .ok_or(ValidationError::MissingField("holder BPN"))?;
        let caller_bpn = self
            .caller_bpn
            .ok_or(ValidationError::MissingField("caller BPN"))?;
        Ok(IssueCredentialCommand {
            holder_bpn,
            caller_bpn,
        })
    }
}

// ---------------------------------------------------------------------------
// Dismantler
// ---------------------------------------------------------------------------

/// Attest that the holder may dismantle vehicles of the listed brands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDismantlerCredentialCommand {
    base: IssueCredentialCommand,
    activity_type: ActivityType,
    allowed_vehicle_brands: BTreeSet<String>,
}

impl IssueDismantlerCredentialCommand {
    /// Start a command.
    pub fn builder() -> IssueDismantlerCredentialCommandBuilder {
        IssueDismantlerCredentialCommandBuilder::default()
    }

    /// Holder and caller.
    pub fn base(&self) -> &IssueCredentialCommand {
        &self.base
    }

    /// Activity the holder is certified for.
    pub fn activity_type(&self) -> ActivityType {
        self.activity_type
    }

    /// Non-empty, sorted, deduplicated.
    pub fn allowed_vehicle_brands(&self) -> &BTreeSet<String> {
        &self.allowed_vehicle_brands
    }
}

/// Builder for [`IssueDismantlerCredentialCommand`].
#[derive(Debug, Clone, Default)]
pub struct IssueDismantlerCredentialCommandBuilder {
    base: IssueCredentialCommandBuilder,
    activity_type: Option<ActivityType>,
    allowed_vehicle_brands: Option<BTreeSet<String>>,
}

impl IssueDismantlerCredentialCommandBuilder {
    /// BPN of the receiving wallet.
    pub fn holder_bpn(mut self, bpn: Bpn) -> Self {
        self.base = self.base.holder_bpn(bpn);
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.base = self.base.caller_bpn(bpn);
        self
    }

    /// Activity the holder is certified for.
    pub fn activity_type(mut self, activity_type: ActivityType) -> Self {
        self.activity_type = Some(activity_type);
        self
    }

    /// Brands the holder may dismantle.
    pub fn allowed_vehicle_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_vehicle_brands = Some(brands.into_iter().map(Into::into).collect());
        self
    }

    /// # Errors
    ///
    /// Base fields, then activity type, then the brand set (missing or
    /// empty).
    pub fn build(self) -> Result<IssueDismantlerCredentialCommand, ValidationError> {
        let base = self.base.build()?;
        let activity_type = self
            .activity_type
            .ok_or(ValidationError::MissingField("activity type"))?;
        let allowed_vehicle_brands = self
            .allowed_vehicle_brands
            .ok_or(ValidationError::MissingField("allowed vehicle brands"))?;
        if allowed_vehicle_brands.is_empty() {
            return Err(ValidationError::invalid_field(
                "allowed vehicle brands",
                "at least one brand is required",
            ));
        }
        Ok(IssueDismantlerCredentialCommand {
            base,
            activity_type,
            allowed_vehicle_brands,
        })
    }
}

// ---------------------------------------------------------------------------
// Framework
// ---------------------------------------------------------------------------

/// Attest that the holder signed a use-case framework agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueFrameworkCredentialCommand {
    base: IssueCredentialCommand,
    contract_template: String,
    contract_version: String,
    framework_type: FrameworkCredentialType,
}

impl IssueFrameworkCredentialCommand {
    /// Start a command.
    pub fn builder() -> IssueFrameworkCredentialCommandBuilder {
        IssueFrameworkCredentialCommandBuilder::default()
    }

    /// Holder and caller.
    pub fn base(&self) -> &IssueCredentialCommand {
        &self.base
    }

    /// Contract template reference.
    pub fn contract_template(&self) -> &str {
        &self.contract_template
    }

    /// Contract version.
    pub fn contract_version(&self) -> &str {
        &self.contract_version
    }

    /// The use-case framework.
    pub fn framework_type(&self) -> FrameworkCredentialType {
        self.framework_type
    }
}

/// Builder for [`IssueFrameworkCredentialCommand`].
#[derive(Debug, Clone, Default)]
pub struct IssueFrameworkCredentialCommandBuilder {
    base: IssueCredentialCommandBuilder,
    contract_template: Option<String>,
    contract_version: Option<String>,
    framework_type: Option<FrameworkCredentialType>,
}

impl IssueFrameworkCredentialCommandBuilder {
    /// BPN of the receiving wallet.
    pub fn holder_bpn(mut self, bpn: Bpn) -> Self {
        self.base = self.base.holder_bpn(bpn);
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.base = self.base.caller_bpn(bpn);
        self
    }

    /// Contract template reference.
    pub fn contract_template(mut self, template: impl Into<String>) -> Self {
        self.contract_template = Some(template.into());
        self
    }

    /// Contract version.
    pub fn contract_version(mut self, version: impl Into<String>) -> Self {
        self.contract_version = Some(version.into());
        self
    }

    /// The use-case framework.
    pub fn framework_type(mut self, ty: FrameworkCredentialType) -> Self {
        self.framework_type = Some(ty);
        self
    }

    /// Check the base fields, the contract fields and the framework type.
    pub fn build(self) -> Result<IssueFrameworkCredentialCommand, ValidationError> {
        let base = self.base.build()?;
        let contract_template = non_blank("contract template", self.contract_template)?;
        let contract_version = non_blank("contract version", self.contract_version)?;
        let framework_type = self
            .framework_type
            .ok_or(ValidationError::MissingField("framework type"))?;
        Ok(IssueFrameworkCredentialCommand {
            base,
            contract_template,
            contract_version,
            framework_type,
        })
    }
}

// ---------------------------------------------------------------------------
// Caller-supplied credential bodies
// ---------------------------------------------------------------------------

/// A holder issues `credential` to itself. Issuer, id and proof are
/// overwritten at issuance.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSelfIssuedCredentialCommand {
    credential: VerifiableCredential,
    caller_bpn: Bpn,
}

impl IssueSelfIssuedCredentialCommand {
    /// Wrap a credential body from `caller_bpn`.
    pub fn new(credential: VerifiableCredential, caller_bpn: Bpn) -> Self {
        Self {
            credential,
            caller_bpn,
        }
    }

    /// The credential body.
    pub fn credential(&self) -> &VerifiableCredential {
        &self.credential
    }

    /// BPN of the requester, also the holder.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// The authority issues `credential` to the wallet at `holder_did`.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueBaseWalletCredentialCommand {
    credential: VerifiableCredential,
    holder_did: Identifier,
    caller_bpn: Bpn,
}

impl IssueBaseWalletCredentialCommand {
    /// # Errors
    ///
    /// [`ValidationError::InvalidField`] if `holder_did` is a bare BPN.
    pub fn new(
        credential: VerifiableCredential,
        holder_did: Identifier,
        caller_bpn: Bpn,
    ) -> Result<Self, ValidationError> {
        if !holder_did.is_did() {
            return Err(ValidationError::invalid_field(
                "holder DID",
                format!("{} is not a DID", holder_did.value()),
            ));
        }
        Ok(Self {
            credential,
            holder_did,
            caller_bpn,
        })
    }

    /// The credential body.
    pub fn credential(&self) -> &VerifiableCredential {
        &self.credential
    }

    /// DID of the receiving wallet.
    pub fn holder_did(&self) -> &Identifier {
        &self.holder_did
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

fn non_blank(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(field))?;
    if value.trim().is_empty() {
        return Err(ValidationError::invalid_field(field, "must not be blank"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bpn(s: &str) -> Bpn {
        Bpn::new(s).unwrap()
    }

    #[test]
    fn base_requires_holder_then_caller() {
        assert_eq!(
            IssueMembershipCredentialCommand::builder().build().unwrap_err(),
            ValidationError::MissingField("holder BPN")
        );
        assert_eq!(
            IssueMembershipCredentialCommand::builder()
                .holder_bpn(bpn("BPNL000000000099"))
                .build()
                .unwrap_err(),
            ValidationError::MissingField("caller BPN")
        );
    }

    #[test]
    fn dismantler_rejects_empty_brand_set() {
        let err = IssueDismantlerCredentialCommand::builder()
            .holder_bpn(bpn("BPNL000000000099"))
            .caller_bpn(bpn("BPNL000000000000"))
            .activity_type(ActivityType::VehicleDismantle)
            .allowed_vehicle_brands(Vec::<String>::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidField {
                field: "allowed vehicle brands",
                ..
            }
        ));
    }

    #[test]
    fn dismantler_brands_are_deduplicated() {
        let cmd = IssueDismantlerCredentialCommand::builder()
            .holder_bpn(bpn("BPNL000000000099"))
            .caller_bpn(bpn("BPNL000000000000"))
            .activity_type(ActivityType::VehicleDismantle)
            .allowed_vehicle_brands(["Audi", "BMW", "Audi"])
            .build()
            .unwrap();
        assert_eq!(cmd.allowed_vehicle_brands().len(), 2);
        assert_eq!(cmd.base().holder_bpn().as_str(), "BPNL000000000099");
    }

    #[test]
    fn dismantler_checks_base_before_extensions() {
        let err = IssueDismantlerCredentialCommand::builder()
            .allowed_vehicle_brands(["Audi"])
            .build()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingField("holder BPN"));
    }

    #[test]
    fn framework_requires_contract_reference() {
        let builder = IssueFrameworkCredentialCommand::builder()
            .holder_bpn(bpn("BPNL000000000099"))
            .caller_bpn(bpn("BPNL000000000000"))
            .framework_type(FrameworkCredentialType::PcfCredential);
        assert_eq!(
            builder.clone().build().unwrap_err(),
            ValidationError::MissingField("contract template")
        );
        let cmd = builder
            .contract_template("https://example.org/pcf.pdf")
            .contract_version("1.0")
            .build()
            .unwrap();
        assert_eq!(cmd.framework_type(), FrameworkCredentialType::PcfCredential);
    }

    #[test]
    fn base_wallet_issuance_needs_a_did() {
        let vc = VerifiableCredential::new(
            "did:web:localhost:BPNL000000000000#7d4c2b1a-0f9e-4d8c-b7a6-5e4f3d2c1b0a",
            &[],
            &["SummaryCredential"],
            "did:web:localhost:BPNL000000000000",
            json!({}),
            None,
        );
        let holder = Identifier::new("BPNL000000000099").unwrap();
        assert!(IssueBaseWalletCredentialCommand::new(vc, holder, bpn("BPNL000000000000")).is_err());
    }
}
