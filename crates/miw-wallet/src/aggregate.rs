//! # Wallet Aggregate
//!
//! Mints a new identity: derives the `did:web` DID from (host, BPN),
//! generates a fresh Ed25519 keypair, assigns a random key id, and on
//! demand produces the DID document and the encrypted key material that
//! the wallet and key records persist.
//!
//! The aggregate lives only for the duration of wallet creation. It holds
//! the signing key, so its `Debug` output is redacted by `SigningKey`.

use miw_core::{Bpn, Identifier, ValidationError};
use miw_crypto::{generate_keypair, Encryptor, KeyAlgorithm, SigningKey};
use miw_vc::{DidDocument, VerificationMethod};
use url::Url;
use uuid::Uuid;

use crate::error::WalletError;

/// `did:web:<host>:<bpn>`, with a port separator in `host` encoded as `%3A`.
pub fn did_web(host: &str, bpn: &Bpn) -> String {
    format!("did:web:{}:{}", host.replace(':', "%3A"), bpn)
}

/// A freshly minted wallet identity.
#[derive(Debug)]
pub struct WalletAggregate {
    bpn: Bpn,
    did: String,
    key_id: String,
    algorithm: KeyAlgorithm,
    signing_key: SigningKey,
    context_urls: Vec<Url>,
}

impl WalletAggregate {
    /// Start a new wallet.
    pub fn builder() -> WalletAggregateBuilder {
        WalletAggregateBuilder::default()
    }

    /// Owning business partner.
    pub fn bpn(&self) -> &Bpn {
        &self.bpn
    }

    /// The minted `did:web`.
    pub fn did(&self) -> &str {
        &self.did
    }

    /// Random key id, the fragment of the verification method.
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Algorithm of the signing key.
    pub fn algorithm(&self) -> KeyAlgorithm {
        self.algorithm
    }

    /// `<did>#<key id>`.
    pub fn verification_method_id(&self) -> String {
        format!("{}#{}", self.did, self.key_id)
    }

    /// The freshly generated signing key.
    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// Assemble the DID document.
    ///
    /// The document is serialized and parsed back before it is returned, so
    /// what callers persist is exactly what a resolver would read.
    pub fn document(&self) -> Result<DidDocument, WalletError> {
        let method = VerificationMethod::json_web_key(
            &self.did,
            &self.key_id,
            &self.signing_key.verifying_key(),
        );
        let doc = DidDocument::build(&self.did, &self.context_urls, vec![method])?;
        Ok(DidDocument::from_json(&doc.to_json()?)?)
    }

    /// PKCS#8 private key PEM, encrypted.
    pub fn encrypted_private_key(&self, encryptor: &dyn Encryptor) -> Result<String, WalletError> {
        let pem = self.signing_key.to_pkcs8_pem()?;
        Ok(encryptor.encrypt(&pem)?)
    }

    /// SPKI public key PEM, encrypted.
    pub fn encrypted_public_key(&self, encryptor: &dyn Encryptor) -> Result<String, WalletError> {
        let pem = self.signing_key.verifying_key().to_public_key_pem()?;
        Ok(encryptor.encrypt(&pem)?)
    }
}

/// Builder for [`WalletAggregate`].
#[derive(Debug, Clone, Default)]
pub struct WalletAggregateBuilder {
    host: Option<String>,
    bpn: Option<Bpn>,
    context_urls: Vec<Url>,
}

impl WalletAggregateBuilder {
    /// Host (and optional `:port`) serving the DID document.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Business partner the wallet is minted for.
    pub fn bpn(mut self, bpn: Bpn) -> Self {
        self.bpn = Some(bpn);
        self
    }

    /// Contexts added to the DID document after the defaults. May be empty,
    /// the defaults are always present.
    pub fn context_urls(mut self, urls: Vec<Url>) -> Self {
        self.context_urls = urls;
        self
    }

    /// Derive the DID and generate the key.
    ///
    /// # Errors
    ///
    /// - Validation if host or BPN is missing, or the derived DID does not
    ///   match the `did:web` grammar.
    /// - Crypto if key generation fails.
    pub fn build(self) -> Result<WalletAggregate, WalletError> {
        let host = self.host.ok_or(ValidationError::MissingField("host"))?;
        if host.trim().is_empty() {
            return Err(ValidationError::invalid_field("host", "must not be blank").into());
        }
        let bpn = self.bpn.ok_or(ValidationError::MissingField("bpn"))?;
        let did = did_web(&host, &bpn);
        Identifier::new(did.clone())?;

        let algorithm = KeyAlgorithm::Ed25519;
        let signing_key = generate_keypair(algorithm)?;
        Ok(WalletAggregate {
            bpn,
            did,
            key_id: Uuid::new_v4().to_string(),
            algorithm,
            signing_key,
            context_urls: self.context_urls,
        })
    }
}
