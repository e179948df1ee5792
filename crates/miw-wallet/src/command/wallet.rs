//! Wallet lifecycle commands: creation, listing, credential storage.

use miw_core::{Bpn, Identifier, SortDirection, ValidationError, WalletSortColumn};
use miw_vc::VerifiableCredential;

use super::{page_bound, DEFAULT_PAGE_SIZE};

// ---------------------------------------------------------------------------
// CreateWalletCommand
// ---------------------------------------------------------------------------

/// Mint a wallet for `bpn`, requested by `caller_bpn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateWalletCommand {
    name: String,
    bpn: Bpn,
    caller_bpn: Bpn,
}

impl CreateWalletCommand {
    /// Start a command.
    pub fn builder() -> CreateWalletCommandBuilder {
        CreateWalletCommandBuilder::default()
    }

    /// Display name of the wallet.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// BPN the wallet is minted for.
    pub fn bpn(&self) -> &Bpn {
        &self.bpn
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// Builder for [`CreateWalletCommand`].
#[derive(Debug, Clone, Default)]
pub struct CreateWalletCommandBuilder {
    name: Option<String>,
    bpn: Option<Bpn>,
    caller_bpn: Option<Bpn>,
}

impl CreateWalletCommandBuilder {
    /// Display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// BPN the wallet is minted for.
    pub fn bpn(mut self, bpn: Bpn) -> Self {
        self.bpn = Some(bpn);
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.caller_bpn = Some(bpn);
        self
    }

    /// # Errors
    ///
    /// Name (missing or blank), then BPN, then caller.
    pub fn build(self) -> Result<CreateWalletCommand, ValidationError> {
        let name = self.name.ok_or(ValidationError::MissingField("name"))?;
        if name.trim().is_empty() {
            return Err(ValidationError::invalid_field("name", "must not be blank"));
        }
        let bpn = self.bpn.ok_or(ValidationError::MissingField("bpn"))?;
        let caller_bpn = self
            .caller_bpn
            .ok_or(ValidationError::MissingField("caller BPN"))?;
        Ok(CreateWalletCommand {
            name,
            bpn,
            caller_bpn,
        })
    }
}

// ---------------------------------------------------------------------------
// GetWalletCommand
// ---------------------------------------------------------------------------

/// A page of the wallet listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetWalletCommand {
    page_number: u32,
    page_size: u32,
    sort_column: WalletSortColumn,
    sort_direction: SortDirection,
}

impl GetWalletCommand {
    /// Start a command.
    pub fn builder() -> GetWalletCommandBuilder {
        GetWalletCommandBuilder::default()
    }

    /// Zero-based page index.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Page length.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Column to order by.
    pub fn sort_column(&self) -> WalletSortColumn {
        self.sort_column
    }

    /// Order direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }
}

/// Builder for [`GetWalletCommand`]. Defaults to the first page, newest
/// wallets first.
#[derive(Debug, Clone, Copy)]
pub struct GetWalletCommandBuilder {
    page_number: u32,
    page_size: u32,
    sort_column: WalletSortColumn,
    sort_direction: SortDirection,
}

impl Default for GetWalletCommandBuilder {
    fn default() -> Self {
        Self {
            page_number: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_column: WalletSortColumn::CreatedAt,
            sort_direction: SortDirection::Desc,
        }
    }
}

impl GetWalletCommandBuilder {
    /// # Errors
    ///
    /// Rejects negative values.
    pub fn page_number(mut self, page_number: i64) -> Result<Self, ValidationError> {
        self.page_number = page_bound("page number", page_number, 0)?;
        Ok(self)
    }

    /// # Errors
    ///
    /// Rejects values below 1.
    pub fn page_size(mut self, page_size: i64) -> Result<Self, ValidationError> {
        self.page_size = page_bound("page size", page_size, 1)?;
        Ok(self)
    }

    /// Order by `column`.
    pub fn sort(mut self, column: WalletSortColumn, direction: SortDirection) -> Self {
        self.sort_column = column;
        self.sort_direction = direction;
        self
    }

    /// Finish the command.
    pub fn build(self) -> GetWalletCommand {
        GetWalletCommand {
            page_number: self.page_number,
            page_size: self.page_size,
            sort_column: self.sort_column,
            sort_direction: self.sort_direction,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreCredentialCommand
// ---------------------------------------------------------------------------

/// Store a third-party credential in the wallet named by `identifier`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreCredentialCommand {
    credential: VerifiableCredential,
    identifier: Identifier,
    caller_bpn: Bpn,
}

impl StoreCredentialCommand {
    /// Start a command.
    pub fn builder() -> StoreCredentialCommandBuilder {
        StoreCredentialCommandBuilder::default()
    }

    /// The credential to store.
    pub fn credential(&self) -> &VerifiableCredential {
        &self.credential
    }

    /// Target wallet.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// BPN of the requester.
    pub fn caller_bpn(&self) -> &Bpn {
        &self.caller_bpn
    }
}

/// Builder for [`StoreCredentialCommand`].
#[derive(Debug, Clone, Default)]
pub struct StoreCredentialCommandBuilder {
    credential: Option<VerifiableCredential>,
    identifier: Option<Identifier>,
    caller_bpn: Option<Bpn>,
}

impl StoreCredentialCommandBuilder {
    /// The credential to store.
    pub fn credential(mut self, credential: VerifiableCredential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Wallet to store it in.
    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier = Some(identifier);
        self
    }

    /// BPN of the requester.
    pub fn caller_bpn(mut self, bpn: Bpn) -> Self {
        self.caller_bpn = Some(bpn);
        self
    }

    /// # Errors
    ///
    /// Credential, then identifier, then caller.
    pub fn build(self) -> Result<StoreCredentialCommand, ValidationError> {
        let credential = self
            .credential
            .ok_or(ValidationError::MissingField("credential"))?;
        let identifier = self
            .identifier
            .ok_or(ValidationError::MissingField("identifier"))?;
        let caller_bpn = self
            .caller_bpn
            .ok_or(ValidationError::MissingField("caller BPN"))?;
        Ok(StoreCredentialCommand {
            credential,
            identifier,
            caller_bpn,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bpn(s: &str) -> Bpn {
        Bpn::new(s).unwrap()
    }

    #[test]
    fn create_wallet_requires_all_fields_in_order() {
        assert_eq!(
            CreateWalletCommand::builder().build().unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert_eq!(
            CreateWalletCommand::builder().name("Acme").build().unwrap_err(),
            ValidationError::MissingField("bpn")
        );
        assert_eq!(
            CreateWalletCommand::builder()
                .name("Acme")
                .bpn(bpn("BPNL000000000099"))
                .build()
                .unwrap_err(),
            ValidationError::MissingField("caller BPN")
        );
    }

    #[test]
    fn blank_name_rejected() {
        let err = CreateWalletCommand::builder()
            .name("   ")
            .bpn(bpn("BPNL000000000099"))
            .caller_bpn(bpn("BPNL000000000000"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidField { field: "name", .. }));
    }

    #[test]
    fn get_wallet_page_size_must_be_positive() {
        assert!(GetWalletCommand::builder().page_size(0).is_err());
        assert!(GetWalletCommand::builder().page_number(-1).is_err());
        let cmd = GetWalletCommand::builder()
            .page_size(10)
            .unwrap()
            .page_number(2)
            .unwrap()
            .sort(WalletSortColumn::Name, SortDirection::Asc)
            .build();
        assert_eq!((cmd.page_number(), cmd.page_size()), (2, 10));
        assert_eq!(cmd.sort_column(), WalletSortColumn::Name);
    }

    #[test]
    fn store_credential_requires_credential_first() {
        assert_eq!(
            StoreCredentialCommand::builder()
                .identifier(Identifier::new("BPNL000000000099").unwrap())
                .build()
                .unwrap_err(),
            ValidationError::MissingField("credential")
        );
        let vc = VerifiableCredential::new(
            "did:web:localhost:BPNL000000000000#3f0a4c1e-9b2d-4e8f-a6c5-7d1e2f3a4b5c",
            &[],
            &["BpnCredential"],
            "did:web:localhost:BPNL000000000000",
            json!({"id": "did:web:localhost:BPNL000000000099"}),
            None,
        );
        let cmd = StoreCredentialCommand::builder()
            .credential(vc)
            .identifier(Identifier::new("BPNL000000000099").unwrap())
            .caller_bpn(bpn("BPNL000000000099"))
            .build()
            .unwrap();
        assert!(!cmd.identifier().is_did());
    }
}
