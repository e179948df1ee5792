#![deny(missing_docs)]

//! # miw-wallet — Managed Identity Wallet Workflows
//!
//! The domain layer on top of `miw-core`, `miw-crypto` and `miw-vc`:
//!
//! - [`command`]: validated request objects and their builders.
//! - [`aggregate`]: mints a wallet identity (DID, key, DID document).
//! - [`policy`]: authorization and data rules.
//! - [`repository`]: persistence contracts plus in-memory implementations.
//! - [`service`]: wallet, holder, issuer and presentation workflows.
//! - [`config`] and [`bootstrap`]: settings and node startup.
//!
//! A boundary layer builds a command, picks the service for the actor, and
//! maps any [`WalletError`] to a response via [`WalletError::kind`].

pub mod aggregate;
pub mod bootstrap;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod model;
pub mod policy;
pub mod repository;
pub mod service;

pub use aggregate::{did_web, WalletAggregate};
pub use config::{ConfigError, MiwSettings};
pub use context::WalletContext;
pub use error::{ErrorKind, WalletError};
pub use model::{HoldersCredential, IssuersCredential, Page, Wallet, WalletKey};
pub use service::{HolderService, IssuerService, PresentationService, WalletService};
