//! # Settings
//!
//! [`MiwSettings`] is loaded from `MIW_*` environment variables or from a
//! YAML document. Both paths go through the same [`RawSettings`] shape and
//! the same validation, so a value rejected in one form is rejected in the
//! other.
//!
//! | Variable                         | YAML key                    | Required |
//! |----------------------------------|-----------------------------|----------|
//! | `MIW_HOST`                       | `host`                      | yes      |
//! | `MIW_ENCRYPTION_KEY`             | `encryption_key`            | yes      |
//! | `MIW_AUTHORITY_WALLET_BPN`       | `authority_wallet_bpn`      | yes      |
//! | `MIW_AUTHORITY_WALLET_NAME`      | `authority_wallet_name`     | yes      |
//! | `MIW_VC_CONTEXTS`                | `vc_contexts`               | no       |
//! | `MIW_DID_DOCUMENT_CONTEXT_URLS`  | `did_document_context_urls` | no       |
//! | `MIW_VC_EXPIRY_DATE`             | `vc_expiry_date`            | no       |
//!
//! List variables are comma-separated. The expiry date is `dd-MM-yyyy` and
//! means the end of that day, UTC. The host must form a valid `did:web`
//! together with the authority BPN.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use miw_core::{Bpn, Identifier};
use miw_crypto::{AesGcmEncryptor, EncryptionKey};
use serde::Deserialize;
use url::Url;

use crate::aggregate::did_web;

/// Default credential context.
pub const DEFAULT_VC_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// Errors loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not supplied.
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// A setting could not be parsed or is out of range.
    #[error("invalid setting {key}: {reason}")]
    Invalid {
        /// Name of the offending setting.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The settings file is not valid YAML.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    fn invalid(key: &'static str, reason: impl ToString) -> Self {
        Self::Invalid {
            key,
            reason: reason.to_string(),
        }
    }
}

/// Validated wallet settings.
#[derive(Clone)]
pub struct MiwSettings {
    /// Host (and optional `:port`) all wallet DIDs are minted under.
    pub host: String,
    /// Key material encryption key.
    pub encryption_key: EncryptionKey,
    /// BPN of the authority wallet.
    pub authority_wallet_bpn: Bpn,
    /// Display name of the authority wallet.
    pub authority_wallet_name: String,
    /// `@context` of credentials issued here.
    pub vc_contexts: Vec<Url>,
    /// Extra `@context` entries of minted DID documents.
    pub did_document_context_urls: Vec<Url>,
    /// Expiry stamped on authority-issued credentials.
    pub vc_expiry_date: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for MiwSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiwSettings")
            .field("host", &self.host)
            .field("encryption_key", &"[REDACTED]")
            .field("authority_wallet_bpn", &self.authority_wallet_bpn)
            .field("authority_wallet_name", &self.authority_wallet_name)
            .field("vc_contexts", &self.vc_contexts)
            .field("did_document_context_urls", &self.did_document_context_urls)
            .field("vc_expiry_date", &self.vc_expiry_date)
            .finish()
    }
}

impl MiwSettings {
    /// DID of the authority wallet.
    pub fn authority_wallet_did(&self) -> String {
        did_web(&self.host, &self.authority_wallet_bpn)
    }

    /// The key-material encryptor for these settings.
    pub fn encryptor(&self) -> Result<AesGcmEncryptor, ConfigError> {
        AesGcmEncryptor::new(&self.encryption_key)
            .map_err(|e| ConfigError::invalid("encryption_key", e))
    }

    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let list = |key: &str| {
            lookup(key).map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<String>>()
            })
        };
        RawSettings {
            host: lookup("MIW_HOST"),
            encryption_key: lookup("MIW_ENCRYPTION_KEY"),
            authority_wallet_bpn: lookup("MIW_AUTHORITY_WALLET_BPN"),
            authority_wallet_name: lookup("MIW_AUTHORITY_WALLET_NAME"),
            vc_contexts: list("MIW_VC_CONTEXTS"),
            did_document_context_urls: list("MIW_DID_DOCUMENT_CONTEXT_URLS"),
            vc_expiry_date: lookup("MIW_VC_EXPIRY_DATE"),
        }
        .validate()
    }

    /// Load from a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str::<RawSettings>(yaml)?.validate()
    }
}

/// Unvalidated settings as read from either source.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSettings {
    /// Host (and optional `:port`) of minted DIDs.
    pub host: Option<String>,
    /// Encryption key, 16, 24 or 32 bytes.
    pub encryption_key: Option<String>,
    /// BPN of the authority wallet.
    pub authority_wallet_bpn: Option<String>,
    /// Display name of the authority wallet.
    pub authority_wallet_name: Option<String>,
    /// `@context` of issued credentials.
    pub vc_contexts: Option<Vec<String>>,
    /// Extra `@context` entries of DID documents.
    pub did_document_context_urls: Option<Vec<String>>,
    /// RFC 3339 expiry of authority-issued credentials.
    pub vc_expiry_date: Option<String>,
}

impl RawSettings {
    /// Check every field and build the settings.
    pub fn validate(self) -> Result<MiwSettings, ConfigError> {
        let host = required("host", self.host)?;
        let encryption_key = EncryptionKey::from_config_str(&required(
            "encryption_key",
            self.encryption_key,
        )?)
        .map_err(|e| ConfigError::invalid("encryption_key", e))?;
        let authority_wallet_bpn = Bpn::new(required(
            "authority_wallet_bpn",
            self.authority_wallet_bpn,
        )?)
        .map_err(|e| ConfigError::invalid("authority_wallet_bpn", e))?;
        let authority_wallet_name = required("authority_wallet_name", self.authority_wallet_name)?;
        // Every wallet DID is minted under this host.
        Identifier::new(did_web(&host, &authority_wallet_bpn))
            .map_err(|e| ConfigError::invalid("host", e))?;

        let vc_contexts = match self.vc_contexts {
            Some(urls) if !urls.is_empty() => parse_urls("vc_contexts", &urls)?,
            _ => parse_urls("vc_contexts", &[DEFAULT_VC_CONTEXT.to_string()])?,
        };
        let did_document_context_urls = parse_urls(
            "did_document_context_urls",
            &self.did_document_context_urls.unwrap_or_default(),
        )?;
        let vc_expiry_date = self
            .vc_expiry_date
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_expiry_date(&s))
            .transpose()?;

        Ok(MiwSettings {
            host,
            encryption_key,
            authority_wallet_bpn,
            authority_wallet_name,
            vc_contexts,
            did_document_context_urls,
            vc_expiry_date,
        })
    }
}

fn required(key: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn parse_urls(key: &'static str, raw: &[String]) -> Result<Vec<Url>, ConfigError> {
    raw.iter()
        .map(|u| Url::parse(u).map_err(|e| ConfigError::invalid(key, format!("{u}: {e}"))))
        .collect()
}

/// `dd-MM-yyyy`, end of day UTC.
fn parse_expiry_date(raw: &str) -> Result<DateTime<Utc>, ConfigError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%d-%m-%Y")
        .map_err(|e| ConfigError::invalid("vc_expiry_date", format!("{raw}: {e}")))?;
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)
        .ok_or_else(|| ConfigError::invalid("vc_expiry_date", "end of day out of range"))?;
    Ok(date.and_time(end_of_day).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const KEY: &str = "a-passphrase-of-sufficient-length";

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("MIW_HOST", "localhost:8080"),
            ("MIW_ENCRYPTION_KEY", KEY),
            ("MIW_AUTHORITY_WALLET_BPN", "BPNL000000000000"),
            ("MIW_AUTHORITY_WALLET_NAME", "Operator"),
        ]
    }

    #[test]
    fn minimal_environment() {
        let s = MiwSettings::from_lookup(env(&base())).unwrap();
        assert_eq!(s.authority_wallet_did(), "did:web:localhost%3A8080:BPNL000000000000");
        assert_eq!(s.vc_contexts.len(), 1);
        assert_eq!(s.vc_contexts[0].as_str(), DEFAULT_VC_CONTEXT);
        assert!(s.did_document_context_urls.is_empty());
        assert!(s.vc_expiry_date.is_none());
        s.encryptor().unwrap();
    }

    #[test]
    fn lists_and_expiry_from_environment() {
        let mut vars = base();
        vars.push((
            "MIW_DID_DOCUMENT_CONTEXT_URLS",
            "https://example.org/a, https://example.org/b",
        ));
        vars.push(("MIW_VC_EXPIRY_DATE", "01-10-2030"));
        let s = MiwSettings::from_lookup(env(&vars)).unwrap();
        assert_eq!(s.did_document_context_urls.len(), 2);
        assert_eq!(
            s.vc_expiry_date.unwrap().to_rfc3339(),
            "2030-10-01T23:59:59+00:00"
        );
    }

    #[test]
    fn missing_and_invalid_values() {
        let err = MiwSettings::from_lookup(env(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("host")));

        let mut vars = base();
        vars[2] = ("MIW_AUTHORITY_WALLET_BPN", "BPNX000000000000");
        assert!(matches!(
            MiwSettings::from_lookup(env(&vars)).unwrap_err(),
            ConfigError::Invalid { key: "authority_wallet_bpn", .. }
        ));

        let mut vars = base();
        vars[1] = ("MIW_ENCRYPTION_KEY", "short");
        assert!(matches!(
            MiwSettings::from_lookup(env(&vars)).unwrap_err(),
            ConfigError::Invalid { key: "encryption_key", .. }
        ));

        let mut vars = base();
        vars.push(("MIW_VC_EXPIRY_DATE", "2030-10-01"));
        assert!(MiwSettings::from_lookup(env(&vars)).is_err());
    }

    #[test]
    fn host_must_yield_a_valid_did() {
        for host in ["Wallet.Example.org", "example.org/wallet", "localhost:808080", "wallet_01"] {
            let mut vars = base();
            vars[0] = ("MIW_HOST", host);
            let err = MiwSettings::from_lookup(env(&vars)).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { key: "host", .. }),
                "{host}: {err}"
            );
        }

        let yaml = format!(
            "host: Wallet.Example.org\n\
             encryption_key: {KEY}\n\
             authority_wallet_bpn: BPNL000000000000\n\
             authority_wallet_name: Operator\n"
        );
        assert!(matches!(
            MiwSettings::from_yaml_str(&yaml).unwrap_err(),
            ConfigError::Invalid { key: "host", .. }
        ));
    }

    #[test]
    fn yaml_document() {
        let yaml = format!(
            "host: wallet.example.org\n\
             encryption_key: {KEY}\n\
             authority_wallet_bpn: BPNL000000000000\n\
             authority_wallet_name: Operator\n\
             vc_contexts:\n  - https://www.w3.org/2018/credentials/v1\n  - https://example.org/vc/v1\n"
        );
        let s = MiwSettings::from_yaml_str(&yaml).unwrap();
        assert_eq!(s.host, "wallet.example.org");
        assert_eq!(s.vc_contexts.len(), 2);

        assert!(MiwSettings::from_yaml_str("hots: typo\n").is_err());
    }

    #[test]
    fn debug_redacts_the_key() {
        let s = MiwSettings::from_lookup(env(&base())).unwrap();
        let dbg = format!("{s:?}");
        assert!(dbg.contains("[REDACTED]"));
        assert!(!dbg.contains(KEY));
    }
}
