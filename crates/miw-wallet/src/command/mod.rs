//! # Commands
//!
//! Immutable request objects, one per workflow. Each is produced by a
//! builder that rejects bad arguments at the setter where it can (page
//! bounds) and runs required-field checks in declaration order in
//! `build()`, so the first offending field is named deterministically.
//!
//! Builders fail with [`ValidationError`](miw_core::ValidationError); a
//! built command is always well formed.

pub mod issue;
pub mod presentation;
pub mod search;
pub mod wallet;

pub use issue::{
    IssueBaseWalletCredentialCommand, IssueCredentialCommand, IssueDismantlerCredentialCommand,
    IssueFrameworkCredentialCommand, IssueMembershipCredentialCommand,
    IssueSelfIssuedCredentialCommand,
};
pub use presentation::{CreatePresentationCommand, PresentationInput, ValidatePresentationCommand};
pub use search::{CredentialSearch, HolderCredentialSearch, IssuerCredentialSearch};
pub use wallet::{CreateWalletCommand, GetWalletCommand, StoreCredentialCommand};

/// Page size used when a search does not set one.
pub const DEFAULT_PAGE_SIZE: u32 = i32::MAX as u32;

/// Convert a signed page argument, rejecting values below `min`.
pub(crate) fn page_bound(
    field: &'static str,
    value: i64,
    min: i64,
) -> Result<u32, miw_core::ValidationError> {
    if value < min {
        return Err(miw_core::ValidationError::invalid_field(
            field,
            format!("must be >= {min}, got {value}"),
        ));
    }
    u32::try_from(value).map_err(|_| {
        miw_core::ValidationError::invalid_field(field, format!("{value} is out of range"))
    })
}
