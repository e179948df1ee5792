//! # Bootstrap Subcommand
//!
//! Loads settings from `--config` (YAML) or the `MIW_*` environment, runs
//! the node startup sequence against in-memory storage and prints the
//! authority wallet.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use miw_wallet::bootstrap::{bootstrap_from, Bootstrapped};

/// Arguments for `miw bootstrap`.
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Print the authority wallet's DID document as well.
    #[arg(long)]
    pub show_document: bool,
}

pub fn run_bootstrap(args: &BootstrapArgs, config: Option<PathBuf>) -> Result<u8> {
    let node = bootstrap_from(config).context("bootstrap failed")?;
    println!("{}", summarize(&node, args.show_document)?);
    Ok(0)
}

fn summarize(node: &Bootstrapped, show_document: bool) -> Result<String> {
    let wallet = &node.authority_wallet;
    let mut out = format!(
        "OK: authority wallet ready\n  Name: {}\n  BPN:  {}\n  DID:  {}",
        wallet.name, wallet.bpn, wallet.did
    );
    if show_document {
        out.push('\n');
        out.push_str(&serde_json::to_string_pretty(&wallet.did_document)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstrap_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("miw.yaml");
        std::fs::write(
            &path,
            "host: wallet.example.org\n\
             encryption_key: a-passphrase-of-sufficient-length\n\
             authority_wallet_bpn: BPNL000000000000\n\
             authority_wallet_name: Operator\n",
        )
        .unwrap();

        let node = bootstrap_from(Some(path)).unwrap();
        let summary = summarize(&node, true).unwrap();
        assert!(summary.contains("did:web:wallet.example.org:BPNL000000000000"));
        assert!(summary.contains("verificationMethod"));
    }

    #[test]
    fn missing_config_file_fails() {
        let args = BootstrapArgs {
            show_document: false,
        };
        assert!(run_bootstrap(&args, Some(PathBuf::from("/nonexistent/miw.yaml"))).is_err());
    }
}
