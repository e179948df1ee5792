//! # Workflow Services
//!
//! One service per actor. Each takes a built command, applies the policy
//! rules, and persists through the repositories in [`WalletContext`].
//!
//! [`WalletContext`]: crate::context::WalletContext

mod common;
pub mod holder;
pub mod issuer;
pub mod presentation;
pub mod wallet;

pub use holder::HolderService;
pub use issuer::{CredentialValidation, IssuerService};
pub use presentation::{CreatedPresentation, PresentationService, PresentationValidation};
pub use wallet::WalletService;
