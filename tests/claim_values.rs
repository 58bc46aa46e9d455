use std::collections::HashSet;
use std::time::{Duration, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use tokengate::{
    AlgorithmId, Authenticator, ClaimValue, Credential, SecretKey, TrustConfiguration,
};

const SECRET: &[u8] = b"a-secret-of-at-least-32-bytes!!!";

fn validate(payload: &str) -> Credential {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let mut mac = Hmac::<Sha256>::new_from_slice(SECRET).unwrap();
    mac.update(signing_input.as_bytes());
    let signature = mac.finalize().into_bytes();
    let token = format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature));

    let config = TrustConfiguration::builder(AlgorithmId::HS256)
        .default_secret_key(SecretKey::from(SECRET))
        .build()
        .unwrap();
    Authenticator::new(config).validate(&token).unwrap()
}

#[test]
fn test_numeric_date_as_instant() {
    let credential = validate(r#"{"sub":"alice","auth_time":1700000000}"#);
    let instant = credential
        .principal()
        .claim("auth_time")
        .unwrap()
        .as_instant()
        .unwrap()
        .unwrap();
    assert_eq!(instant, UNIX_EPOCH + Duration::from_secs(1_700_000_000));
}

#[test]
fn test_number_and_bool_render_as_text() {
    let credential = validate(r#"{"count":42,"active":true}"#);
    let principal = credential.principal();

    assert_eq!(
        principal.claim("count").unwrap().as_string().unwrap(),
        Some("42".to_string())
    );
    assert_eq!(
        principal.claim("active").unwrap().as_string().unwrap(),
        Some("true".to_string())
    );
}

#[test]
fn test_string_never_becomes_number() {
    let credential = validate(r#"{"count":"42"}"#);
    assert!(credential
        .principal()
        .claim("count")
        .unwrap()
        .as_i64()
        .is_err());
}

#[test]
fn test_null_and_absent_read_as_none() {
    let credential = validate(r#"{"middle_name":null}"#);
    let principal = credential.principal();

    assert_eq!(
        principal.claim("middle_name").unwrap().as_string().unwrap(),
        None
    );
    assert!(principal.claim("nickname").is_none());
}

#[test]
fn test_list_and_set_views() {
    let credential = validate(r#"{"grp":["ops","dev","ops"]}"#);
    let value = credential.principal().claim("grp").unwrap();

    let list: Vec<String> = value.as_list().unwrap().unwrap();
    assert_eq!(list, vec!["ops".to_string(), "dev".to_string(), "ops".to_string()]);

    let set: HashSet<String> = value.as_set().unwrap().unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.contains("ops") && set.contains("dev"));
}

#[test]
fn test_nested_object_preserves_order() {
    let credential = validate(r#"{"ctx":{"zone":"eu","tier":"gold","seat":"7a"}}"#);
    let value = credential.principal().claim("ctx").unwrap();

    match value {
        ClaimValue::Object(map) => {
            let keys: Vec<&String> = map.keys().collect();
            assert_eq!(keys, ["zone", "tier", "seat"]);
        }
        other => panic!("expected object, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_epoch_seconds_fail_coercion() {
    let credential = validate(r#"{"huge":1e300,"tiny":-1e300}"#);
    let principal = credential.principal();
    assert!(principal.claim("huge").unwrap().as_instant().is_err());
    assert!(principal.claim("tiny").unwrap().as_instant().is_err());
}

#[test]
fn test_fractional_epoch_seconds() {
    let credential = validate(r#"{"auth_time":1700000000.5}"#);
    let instant = credential
        .principal()
        .claim("auth_time")
        .unwrap()
        .as_instant()
        .unwrap()
        .unwrap();
    assert_eq!(
        instant,
        UNIX_EPOCH + Duration::from_secs_f64(1_700_000_000.5)
    );
}
