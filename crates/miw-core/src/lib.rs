#![deny(missing_docs)]

//! # miw-core — Foundational Types for the Managed Identity Wallet
//!
//! This crate is the leaf of the workspace. It defines the value objects
//! every other crate builds on:
//!
//! 1. **Validated identifiers.** [`Bpn`], [`Identifier`] and [`CredentialId`]
//!    check their full input against a fixed grammar at construction time.
//!    There is no partially-valid instance.
//!
//! 2. **Closed vocabularies.** Sort columns, searchable credential types,
//!    activity types and framework credential types are exhaustive enums
//!    with a strict label lookup that fails on unknown input.
//!
//! 3. **`CanonicalBytes`.** All signing input flows through
//!    `CanonicalBytes::new()` (RFC 8785 JCS), never raw `serde_json::to_vec()`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `miw-*` crates.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests, except compiling constant regex patterns.

pub mod canonical;
pub mod error;
pub mod identity;
pub mod vocabulary;

pub use canonical::CanonicalBytes;
pub use error::{CanonicalizationError, ValidationError};
pub use identity::{Bpn, CredentialId, Identifier};
pub use vocabulary::{
    ActivityType, CredentialSortColumn, FrameworkCredentialType, SortColumn, SortDirection,
    TypeToSearch, WalletSortColumn, BASE_CREDENTIAL_TYPE,
};
