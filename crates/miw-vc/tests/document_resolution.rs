//! Credentials and presentations verified against keys resolved from a
//! DID document, the way the wallet services resolve issuers.

use chrono::Utc;
use miw_crypto::{generate_keypair, KeyAlgorithm};
use miw_vc::{
    DidDocument, Jwt, PresentationClaims, VerifiableCredential, VerifiablePresentation,
    VerificationMethod,
};
use serde_json::json;

const ISSUER: &str = "did:web:localhost%3A8080:BPNL000000000000";
const HOLDER: &str = "did:web:localhost%3A8080:BPNL000000000099";

#[test]
fn credential_verifies_with_key_from_issuer_document() {
    let key = generate_keypair(KeyAlgorithm::Ed25519).unwrap();
    let vm = VerificationMethod::json_web_key(ISSUER, "5e0f", &key.verifying_key());
    let doc = DidDocument::build(ISSUER, &[], vec![vm.clone()]).unwrap();
    let doc = DidDocument::from_json(&doc.to_json().unwrap()).unwrap();

    let mut vc = VerifiableCredential::new(
        format!("{ISSUER}#6f8a3a6e-9f7c-4d0b-a3f6-3e1b8c0d2a77"),
        &[],
        &["BpnCredential"],
        ISSUER,
        json!({"id": HOLDER, "bpn": "BPNL000000000099"}),
        None,
    );
    vc.sign(&key, vm.id.clone()).unwrap();

    let resolved = doc.verifying_key(vc.verification_method()).unwrap();
    vc.verify(&resolved).unwrap();
}

#[test]
fn jwt_presentation_carries_verifiable_credentials() {
    let issuer_key = generate_keypair(KeyAlgorithm::Ed25519).unwrap();
    let holder_key = generate_keypair(KeyAlgorithm::Ed25519).unwrap();

    let mut vc = VerifiableCredential::new(
        format!("{ISSUER}#1c2d3e4f-5a6b-4c7d-8e9f-0a1b2c3d4e5f"),
        &[],
        &["MembershipCredential"],
        ISSUER,
        json!({"id": HOLDER, "memberOf": "Catena-X"}),
        None,
    );
    vc.sign(&issuer_key, format!("{ISSUER}#k")).unwrap();

    let vp = VerifiablePresentation::new(HOLDER, vec![vc]);
    let claims = PresentationClaims::new(HOLDER, Some("smart".to_string()), vp, Utc::now());
    let jwt = Jwt::sign(claims, &holder_key, Some(format!("{HOLDER}#h"))).unwrap();

    let parsed: Jwt = jwt.as_str().parse().unwrap();
    parsed.verify(&holder_key.verifying_key()).unwrap();
    let embedded = &parsed.claims().vp.verifiable_credential;
    assert_eq!(embedded.len(), 1);
    embedded[0].verify(&issuer_key.verifying_key()).unwrap();
}
