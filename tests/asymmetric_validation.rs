use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use tokengate::{
    AlgorithmId, Authenticator, EcdsaCurve, EcdsaPublicKey, Error, PublicKey, RsaPublicKey,
    TrustConfiguration,
};

fn assemble(header: &str, payload: &str, sign: impl FnOnce(&str) -> Vec<u8>) -> String {
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header),
        URL_SAFE_NO_PAD.encode(payload)
    );
    let signature = sign(&signing_input);
    format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature))
}

fn authenticator(algorithm: AlgorithmId, key: impl Into<PublicKey>) -> Authenticator {
    let config = TrustConfiguration::builder(algorithm)
        .default_public_key(key)
        .build()
        .unwrap();
    Authenticator::new(config)
}

mod rsa_tokens {
    use super::*;

    use rsa::pkcs1v15::SigningKey;
    use rsa::sha2::Sha256;
    use rsa::signature::{SignatureEncoding, Signer};
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;

    fn generate(bits: usize) -> (RsaPrivateKey, RsaPublicKey) {
        let private = RsaPrivateKey::new(&mut rand::thread_rng(), bits).unwrap();
        let n = private.n().to_bytes_be();
        let e = private.e().to_bytes_be();
        let public = RsaPublicKey::from_components(&n, &e).unwrap();
        (private, public)
    }

    #[test]
    fn test_rs256_round_trip() {
        let (private, public) = generate(2048);
        let signing_key = SigningKey::<Sha256>::new(private);

        let token = assemble(r#"{"alg":"RS256"}"#, r#"{"sub":"alice"}"#, |input| {
            signing_key.sign(input.as_bytes()).to_vec()
        });

        let credential = authenticator(AlgorithmId::RS256, public)
            .validate(&token)
            .expect("validation failed");
        assert_eq!(credential.principal().name(), "alice");
    }

    #[test]
    fn test_rs256_wrong_key_rejected() {
        let (private, _) = generate(2048);
        let (_, other_public) = generate(2048);
        let signing_key = SigningKey::<Sha256>::new(private);

        let token = assemble(r#"{"alg":"RS256"}"#, r#"{"sub":"alice"}"#, |input| {
            signing_key.sign(input.as_bytes()).to_vec()
        });

        let result = authenticator(AlgorithmId::RS256, other_public).validate(&token);
        assert_eq!(result, Err(Error::SignatureInvalid));
    }

    #[test]
    fn test_rs256_tampered_payload_rejected() {
        let (private, public) = generate(2048);
        let signing_key = SigningKey::<Sha256>::new(private);

        let token = assemble(r#"{"alg":"RS256"}"#, r#"{"sub":"alice"}"#, |input| {
            signing_key.sign(input.as_bytes()).to_vec()
        });

        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(r#"{"sub":"mallory"}"#);
        parts[1] = &forged;
        let tampered = parts.join(".");

        let result = authenticator(AlgorithmId::RS256, public).validate(&tampered);
        assert_eq!(result, Err(Error::SignatureInvalid));
    }

    #[test]
    fn test_small_modulus_rejected_before_verification() {
        let (private, public) = generate(1024);
        let signing_key = SigningKey::<Sha256>::new(private);

        let token = assemble(r#"{"alg":"RS256"}"#, r#"{"sub":"alice"}"#, |input| {
            signing_key.sign(input.as_bytes()).to_vec()
        });

        let result = authenticator(AlgorithmId::RS256, public).validate(&token);
        assert_eq!(
            result,
            Err(Error::InvalidKeyLength {
                algorithm: "RS256".to_string(),
                actual_bits: 1024,
                min_bits: 2048,
            })
        );
    }

    #[test]
    fn test_hmac_key_family_cannot_back_rsa() {
        // Configuring secret keys for an RSA algorithm must fail at build
        // time, closing off key-confusion constructions entirely.
        let result = TrustConfiguration::builder(AlgorithmId::RS256)
            .default_secret_key(tokengate::SecretKey::from(
                "a-secret-of-at-least-32-bytes!!!",
            ))
            .build();
        assert!(result.is_err());
    }
}

mod ecdsa_tokens {
    use super::*;

    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::signature::{
        EcdsaKeyPair, EcdsaSigningAlgorithm, KeyPair, ECDSA_P256_SHA256_ASN1_SIGNING,
        ECDSA_P521_SHA512_ASN1_SIGNING,
    };

    fn generate(
        curve: EcdsaCurve,
        signing: &'static EcdsaSigningAlgorithm,
    ) -> (EcdsaKeyPair, EcdsaPublicKey) {
        let rng = SystemRandom::new();
        let pkcs8 = EcdsaKeyPair::generate_pkcs8(signing, &rng).unwrap();
        let key_pair = EcdsaKeyPair::from_pkcs8(signing, pkcs8.as_ref()).unwrap();
        let public =
            EcdsaPublicKey::from_uncompressed_point(curve, key_pair.public_key().as_ref())
                .unwrap();
        (key_pair, public)
    }

    #[test]
    fn test_es256_round_trip() {
        let (key_pair, public) = generate(EcdsaCurve::P256, &ECDSA_P256_SHA256_ASN1_SIGNING);
        let rng = SystemRandom::new();

        let token = assemble(r#"{"alg":"ES256"}"#, r#"{"sub":"alice"}"#, |input| {
            key_pair
                .sign(&rng, input.as_bytes())
                .unwrap()
                .as_ref()
                .to_vec()
        });

        let credential = authenticator(AlgorithmId::ES256, public)
            .validate(&token)
            .expect("validation failed");
        assert_eq!(credential.principal().name(), "alice");
    }

    #[test]
    fn test_es512_round_trip_on_p521() {
        let (key_pair, public) = generate(EcdsaCurve::P521, &ECDSA_P521_SHA512_ASN1_SIGNING);
        let rng = SystemRandom::new();

        let token = assemble(r#"{"alg":"ES512"}"#, r#"{"sub":"alice"}"#, |input| {
            key_pair
                .sign(&rng, input.as_bytes())
                .unwrap()
                .as_ref()
                .to_vec()
        });

        let credential = authenticator(AlgorithmId::ES512, public)
            .validate(&token)
            .expect("validation failed");
        assert_eq!(credential.principal().name(), "alice");
    }

    #[test]
    fn test_es256_wrong_key_rejected() {
        let (key_pair, _) = generate(EcdsaCurve::P256, &ECDSA_P256_SHA256_ASN1_SIGNING);
        let (_, other_public) = generate(EcdsaCurve::P256, &ECDSA_P256_SHA256_ASN1_SIGNING);
        let rng = SystemRandom::new();

        let token = assemble(r#"{"alg":"ES256"}"#, r#"{"sub":"alice"}"#, |input| {
            key_pair
                .sign(&rng, input.as_bytes())
                .unwrap()
                .as_ref()
                .to_vec()
        });

        let result = authenticator(AlgorithmId::ES256, other_public).validate(&token);
        assert_eq!(result, Err(Error::SignatureInvalid));
    }

    #[test]
    fn test_weak_curve_for_es512_rejected() {
        let (key_pair, p256_public) = generate(EcdsaCurve::P256, &ECDSA_P256_SHA256_ASN1_SIGNING);
        let rng = SystemRandom::new();

        let token = assemble(r#"{"alg":"ES512"}"#, r#"{"sub":"alice"}"#, |input| {
            key_pair
                .sign(&rng, input.as_bytes())
                .unwrap()
                .as_ref()
                .to_vec()
        });

        let result = authenticator(AlgorithmId::ES512, p256_public).validate(&token);
        assert_eq!(
            result,
            Err(Error::InvalidKeyLength {
                algorithm: "ES512".to_string(),
                actual_bits: 256,
                min_bits: 512,
            })
        );
    }
}
