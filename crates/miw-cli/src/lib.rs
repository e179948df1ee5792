//! # miw-cli — Managed Identity Wallet Command Line
//!
//! ## Subcommands
//!
//! - `miw did-document`: mint a throwaway identity and print its DID
//!   document.
//! - `miw identifier`: classify a string as DID or BPN.
//! - `miw bootstrap`: load settings and ensure the authority wallet.
//!
//! ```bash
//! miw did-document --host localhost:8080 --bpn BPNL000000000000
//! miw identifier did:web:localhost%3A8080:BPNL000000000000
//! miw --config miw.yaml bootstrap
//! ```

pub mod identity;
pub mod node;
