//! # Identity Subcommands
//!
//! `did-document` previews the document a wallet would publish for a
//! (host, BPN) pair; the key is generated and discarded. `identifier`
//! reports how an input string classifies.

use anyhow::{Context, Result};
use clap::Args;
use miw_core::{Bpn, Identifier};
use miw_wallet::WalletAggregate;
use url::Url;

/// Arguments for `miw did-document`.
#[derive(Args, Debug)]
pub struct DidDocumentArgs {
    /// Host serving the DID document, optionally with `:port`.
    #[arg(long)]
    pub host: String,

    /// Business Partner Number of the wallet.
    #[arg(long)]
    pub bpn: String,

    /// Extra `@context` URL. Repeatable.
    #[arg(long = "context", value_name = "URL")]
    pub contexts: Vec<Url>,
}

/// Arguments for `miw identifier`.
#[derive(Args, Debug)]
pub struct IdentifierArgs {
    /// DID or BPN to classify.
    #[arg(value_name = "VALUE")]
    pub value: String,
}

pub fn run_did_document(args: &DidDocumentArgs) -> Result<u8> {
    println!("{}", render_did_document(args)?);
    Ok(0)
}

pub fn run_identifier(args: &IdentifierArgs) -> Result<u8> {
    match describe_identifier(&args.value) {
        Ok(description) => {
            println!("OK: {description}");
            Ok(0)
        }
        Err(e) => {
            println!("INVALID: {e}");
            Ok(1)
        }
    }
}

fn render_did_document(args: &DidDocumentArgs) -> Result<String> {
    let bpn = Bpn::new(args.bpn.as_str())?;
    let aggregate = WalletAggregate::builder()
        .host(args.host.as_str())
        .bpn(bpn)
        .context_urls(args.contexts.clone())
        .build()
        .context("failed to mint wallet identity")?;
    tracing::debug!(did = aggregate.did(), "minted preview identity");
    let document = aggregate.document()?;
    Ok(serde_json::to_string_pretty(&document)?)
}

fn describe_identifier(value: &str) -> Result<String> {
    let identifier = Identifier::new(value)?;
    let kind = if identifier.is_did() { "did" } else { "bpn" };
    Ok(format!("{kind} (bpn {})", identifier.bpn()?))
}
