use coursehub::HubError;
use coursehub::auth::{DEFAULT_COST_FACTOR, PasswordHasher};

fn fast_hasher() -> PasswordHasher {
    PasswordHasher::with_cost(4).expect("cost 4 is valid")
}

#[tokio::test]
async fn hash_round_trips() {
    let hasher = fast_hasher();
    for plaintext in ["hunter2", "correct horse battery staple", "pässwörd-日本語-🔑", " "] {
        let hashed = hasher.hash(plaintext).await.expect("hash");
        assert!(hasher.verify(plaintext, &hashed).await.expect("verify"));
    }
}

#[tokio::test]
async fn empty_password_can_be_hashed() {
    let hasher = fast_hasher();
    let hashed = hasher.hash("").await.expect("hash");
    assert!(hasher.verify("", &hashed).await.expect("verify"));
    assert!(!hasher.verify("x", &hashed).await.expect("verify"));
}

#[tokio::test]
async fn hashes_are_salted_but_both_verify() {
    let hasher = fast_hasher();
    let first = hasher.hash("same input").await.expect("hash");
    let second = hasher.hash("same input").await.expect("hash");

    assert_ne!(first, second);
    assert!(hasher.verify("same input", &first).await.expect("verify"));
    assert!(hasher.verify("same input", &second).await.expect("verify"));
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let hasher = fast_hasher();
    let hashed = hasher.hash("p1-secret").await.expect("hash");
    assert!(!hasher.verify("p2-secret", &hashed).await.expect("verify"));
    assert!(!hasher.verify("P1-secret", &hashed).await.expect("verify"));
}

#[tokio::test]
async fn long_passwords_are_not_truncated() {
    let hasher = fast_hasher();
    let prefix = "a".repeat(80);
    let original = format!("{prefix}-one");
    let hashed = hasher.hash(&original).await.expect("hash");

    assert!(hasher.verify(&original, &hashed).await.expect("verify"));
    assert!(!hasher.verify(&format!("{prefix}-two"), &hashed).await.expect("verify"));
    assert!(!hasher.verify(&prefix, &hashed).await.expect("verify"));
}

#[tokio::test]
async fn default_cost_is_embedded_in_the_hash() {
    let hasher = PasswordHasher::new();
    assert_eq!(hasher.cost(), DEFAULT_COST_FACTOR);

    let hashed = hasher.hash("cost check").await.expect("hash");
    assert!(hashed.starts_with("$2b$10$"), "unexpected hash {hashed}");
}

#[tokio::test]
async fn hashes_of_other_costs_still_verify() {
    let strong = PasswordHasher::with_cost(5).expect("cost");
    let hashed = strong.hash("portable").await.expect("hash");
    assert!(fast_hasher().verify("portable", &hashed).await.expect("verify"));
}

#[tokio::test]
async fn malformed_hash_is_an_error() {
    let err = fast_hasher()
        .verify("anything", "not-a-bcrypt-hash")
        .await
        .unwrap_err();
    assert!(matches!(err, HubError::Hash(_)), "got {err:?}");
}

fn sha256_base64(input: &str) -> String {
    use base64::Engine;
    use sha2::{Digest, Sha256};
    base64::engine::general_purpose::STANDARD.encode(Sha256::digest(input.as_bytes()))
}

#[tokio::test]
async fn digest_of_a_password_is_not_an_alternate_password() {
    let hasher = fast_hasher();
    for original in ["z".repeat(100), "short-secret".to_string()] {
        let hashed = hasher.hash(&original).await.expect("hash");
        let digest = sha256_base64(&original);

        assert_ne!(digest, original);
        assert!(!hasher.verify(&digest, &hashed).await.expect("verify"));
        assert!(hasher.verify(&original, &hashed).await.expect("verify"));
    }
}
