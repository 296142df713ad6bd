//! Payment callback signature verification against the client API.

use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;

use marigold_api::config::PaymentConfig;
use marigold_api::payments::PaymentClient;

const KEY_SECRET: &str = "kXq93vLpZ2rTw8Bn";

fn client() -> PaymentClient {
    PaymentClient::new(&PaymentConfig {
        api_url: "https://api.pay.test".to_owned(),
        key_id: "key_test_abc".to_owned(),
        key_secret: SecretString::from(KEY_SECRET),
    })
}

fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(format!("{order_id}|{payment_id}").as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[test]
fn provider_signed_callback_verifies() {
    let signature = sign(KEY_SECRET, "order_rcpt_42", "pay_13579");
    assert!(client().signature_matches("order_rcpt_42", "pay_13579", &signature));
}

#[test]
fn swapped_identifiers_fail() {
    // Signature over (a|b) must not verify for (b|a).
    let signature = sign(KEY_SECRET, "order_rcpt_42", "pay_13579");
    assert!(!client().signature_matches("pay_13579", "order_rcpt_42", &signature));
}

#[test]
fn foreign_key_signatures_fail() {
    let signature = sign("some-other-merchant-key", "order_rcpt_42", "pay_13579");
    assert!(!client().signature_matches("order_rcpt_42", "pay_13579", &signature));
}

#[test]
fn malformed_signatures_fail_without_panicking() {
    let c = client();
    for bad in ["", "zz", "deadbeef", "not hex", "ффф"] {
        assert!(!c.signature_matches("order_rcpt_42", "pay_13579", bad));
    }
}
