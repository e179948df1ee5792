//! # Persisted Records
//!
//! The records the workflows hand to storage, and the [`Page`] shape every
//! listing returns.

use chrono::{DateTime, Utc};
use miw_core::Bpn;
use miw_crypto::KeyAlgorithm;
use miw_vc::{DidDocument, VerifiableCredential};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An organisational wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    /// Record id.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Owning business partner.
    pub bpn: Bpn,
    /// `did:web` identifier derived from host and BPN.
    pub did: String,
    /// The published DID document.
    pub did_document: DidDocument,
    /// Algorithm of the wallet's signing key.
    pub algorithm: KeyAlgorithm,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Held credentials, attached on read when requested. Never persisted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub verifiable_credentials: Vec<VerifiableCredential>,
}

/// Encrypted key material of a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletKey {
    /// Record id.
    pub id: Uuid,
    /// Wallet the key belongs to.
    pub wallet_id: Uuid,
    /// Fragment of the verification method id.
    pub key_id: String,
    /// PKCS#8 PEM, encrypted.
    pub encrypted_private_key: String,
    /// SPKI PEM, encrypted.
    pub encrypted_public_key: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A credential in a holder's wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldersCredential {
    /// Record id.
    pub id: Uuid,
    /// DID of the holding wallet.
    pub holder_did: String,
    /// DID of the issuer.
    pub issuer_did: String,
    /// Comma-joined types without `VerifiableCredential`.
    #[serde(rename = "type")]
    pub credential_type: String,
    /// The credential's own `id`.
    pub credential_id: String,
    /// The signed credential.
    pub data: VerifiableCredential,
    /// Issued by the holder to itself.
    pub self_issued: bool,
    /// Received from a third party and stored, rather than issued here.
    pub stored: bool,
    /// Time the record was written.
    pub created_at: DateTime<Utc>,
}

/// The issuer-side copy of a credential issued here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuersCredential {
    /// Record id.
    pub id: Uuid,
    /// DID of the receiving wallet.
    pub holder_did: String,
    /// DID of the issuing wallet.
    pub issuer_did: String,
    /// Comma-joined types without `VerifiableCredential`.
    #[serde(rename = "type")]
    pub credential_type: String,
    /// The credential's own `id`.
    pub credential_id: String,
    /// The signed credential.
    pub data: VerifiableCredential,
    /// Time the record was written.
    pub created_at: DateTime<Utc>,
}

/// One page of a sorted listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items of this page.
    pub content: Vec<T>,
    /// Zero-based page index.
    pub page_number: u32,
    /// Requested page length.
    pub page_size: u32,
    /// Items across all pages.
    pub total_elements: usize,
}

impl<T> Page<T> {
    /// Cut page `page_number` of length `page_size` out of an already
    /// sorted `items`.
    pub fn slice(items: Vec<T>, page_number: u32, page_size: u32) -> Self {
        let total_elements = items.len();
        let skip = (page_number as usize).saturating_mul(page_size as usize);
        let content = items
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();
        Self {
            content,
            page_number,
            page_size,
            total_elements,
        }
    }

    /// Number of pages, zero when the page size is zero.
    pub fn total_pages(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total_elements.div_ceil(self.page_size as usize)
    }

    /// Convert every item, keeping the paging fields.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            total_elements: self.total_elements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slicing() {
        let page = Page::slice((0..25).collect::<Vec<_>>(), 2, 10);
        assert_eq!(page.content, (20..25).collect::<Vec<_>>());
        assert_eq!(page.total_elements, 25);
        assert_eq!(page.total_pages(), 3);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let page = Page::slice(vec![1, 2, 3], u32::MAX, u32::MAX);
        assert!(page.content.is_empty());
        assert_eq!(page.total_elements, 3);
    }

    #[test]
    fn zero_size_page() {
        let page = Page::slice(vec![1, 2, 3], 0, 0);
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages(), 0);
    }
}
