//! Property tests for the identifier grammars.

use miw_core::{Bpn, CredentialId, Identifier, ValidationError};
use proptest::prelude::*;

fn valid_bpn() -> impl Strategy<Value = String> {
    "BPN[ALS][0-9a-f]{12}"
}

fn valid_host() -> impl Strategy<Value = String> {
    ("[a-z][a-z0-9\\-]{0,10}(\\.[a-z]{2,5}){0,2}", prop::option::of(10u32..65535))
        .prop_map(|(host, port)| match port {
            Some(p) => format!("{host}%3A{p}"),
            None => host,
        })
}

proptest! {
    #[test]
    fn valid_bpn_is_accepted_unchanged(raw in valid_bpn()) {
        let bpn = Bpn::new(raw.clone()).unwrap();
        prop_assert_eq!(bpn.as_str(), raw.as_str());
    }

    #[test]
    fn arbitrary_string_is_a_bpn_only_if_it_matches(raw in "\\PC{0,20}") {
        let matches = raw.len() == 16
            && raw.starts_with("BPN")
            && matches!(raw.as_bytes()[3], b'A' | b'L' | b'S')
            && raw[4..].bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        prop_assert_eq!(Bpn::new(raw).is_ok(), matches);
    }

    #[test]
    fn bpn_with_uppercase_hex_is_rejected(raw in "BPN[ALS][0-9]{11}[A-F]") {
        prop_assert!(matches!(Bpn::new(raw), Err(ValidationError::InvalidBpn(_))));
    }

    #[test]
    fn did_identifiers_classify_as_did(host in valid_host(), bpn in valid_bpn()) {
        let raw = format!("did:web:{host}:{bpn}");
        let id = Identifier::new(raw.clone()).unwrap();
        prop_assert!(id.is_did());
        prop_assert_eq!(id.value(), raw.as_str());
        let parsed = id.bpn().unwrap();
        prop_assert_eq!(parsed.as_str(), bpn.as_str());
    }

    #[test]
    fn bare_bpn_identifiers_classify_as_bpn(bpn in valid_bpn()) {
        let id = Identifier::new(bpn).unwrap();
        prop_assert!(!id.is_did());
    }

    #[test]
    fn other_strings_are_not_identifiers(raw in "[a-z:]{0,30}") {
        prop_assert!(Identifier::new(raw).is_err());
    }

    #[test]
    fn credential_id_accepts_did_with_uuid(host in valid_host(), bpn in valid_bpn()) {
        let raw = format!("did:web:{host}:{bpn}#{}", uuid::Uuid::new_v4());
        let id = CredentialId::parse_optional(Some(&raw)).unwrap().unwrap();
        prop_assert_eq!(id.as_str(), raw.as_str());
    }

    #[test]
    fn credential_id_requires_fragment(host in valid_host(), bpn in valid_bpn()) {
        let raw = format!("did:web:{host}:{bpn}");
        prop_assert!(CredentialId::new(raw).is_err());
    }
}
