// [libs/core/crypto/src/envelope.rs]
//! Sobre de cifrado versionado: `{"v":1,"iv":..,"data":..,"tag":..}`.
//!
//! Desacopla el formato en disco del algoritmo vigente. IV de 96 bits por
//! llamada via CSPRNG, tag de autenticacion GCM de 128 bits.

use crate::{CryptoError, EncryptionKey};
use aes_gcm::aead::{Aead, Payload};
use aes_gcm::Nonce;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

const IV_LEN: usize = 12;
const TAG_LEN: usize = 16;
const ENVELOPE_VERSION: u8 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope {
    v: u8,
    iv: String,
    data: String,
    tag: String,
}

/// Cifra `plaintext` con AES-256-GCM y devuelve el sobre JSON serializado.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> String {
    use rand::RngCore;

    let mut iv_bytes = [0u8; IV_LEN];
    rand::rngs::OsRng.fill_bytes(&mut iv_bytes);
    let nonce = Nonce::from_slice(&iv_bytes);

    let cipher = key.cipher();
    let combined = cipher
        .encrypt(nonce, Payload { msg: plaintext, aad: &[] })
        .expect("AES-256-GCM encryption over a bounded plaintext cannot fail");

    let split_at = combined.len() - TAG_LEN;
    let (ciphertext, tag) = combined.split_at(split_at);

    let envelope = Envelope {
        v: ENVELOPE_VERSION,
        iv: BASE64.encode(iv_bytes),
        data: BASE64.encode(ciphertext),
        tag: BASE64.encode(tag),
    };

    serde_json::to_string(&envelope).expect("envelope fields are always valid UTF-8")
}

/// Descifra un sobre producido por [`encrypt`]. Rechaza version desconocida,
/// longitudes de IV/tag incorrectas y cualquier entrada truncada o
/// manipulada con un unico tipo de error: `Corrupt`.
pub fn decrypt(key: &EncryptionKey, blob: &str) -> Result<Vec<u8>, CryptoError> {
    let envelope: Envelope = serde_json::from_str(blob).map_err(|_| CryptoError::Corrupt)?;

    if envelope.v != ENVELOPE_VERSION {
        return Err(CryptoError::Corrupt);
    }

    let iv = BASE64.decode(&envelope.iv).map_err(|_| CryptoError::Corrupt)?;
    let data = BASE64.decode(&envelope.data).map_err(|_| CryptoError::Corrupt)?;
    let tag = BASE64.decode(&envelope.tag).map_err(|_| CryptoError::Corrupt)?;

    if iv.len() != IV_LEN || tag.len() != TAG_LEN {
        return Err(CryptoError::Corrupt);
    }

    let mut combined = Vec::with_capacity(data.len() + tag.len());
    combined.extend_from_slice(&data);
    combined.extend_from_slice(&tag);

    let nonce = Nonce::from_slice(&iv);
    let cipher = key.cipher();
    cipher
        .decrypt(nonce, Payload { msg: &combined, aad: &[] })
        .map_err(|_| CryptoError::Corrupt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_key() -> EncryptionKey {
        EncryptionKey::from_hex(&"ab".repeat(32)).unwrap()
    }

    #[test]
    fn round_trip_recovers_plaintext() {
        let key = test_key();
        let blob = encrypt(&key, b"sk_live_super_secret");
        let recovered = decrypt(&key, &blob).unwrap();
        assert_eq!(recovered, b"sk_live_super_secret");
    }

    #[test]
    fn tampered_ciphertext_is_corrupt() {
        let key = test_key();
        let blob = encrypt(&key, b"rotate-me");
        let mut flipped: serde_json::Value = serde_json::from_str(&blob).unwrap();
        let mut data_bytes = BASE64.decode(flipped["data"].as_str().unwrap()).unwrap();
        data_bytes[0] ^= 0xFF;
        flipped["data"] = serde_json::Value::String(BASE64.encode(data_bytes));
        let err = decrypt(&key, &flipped.to_string()).unwrap_err();
        assert_eq!(err, CryptoError::Corrupt);
    }

    #[test]
    fn unknown_version_is_corrupt() {
        let key = test_key();
        let blob = encrypt(&key, b"x");
        let mut bumped: serde_json::Value = serde_json::from_str(&blob).unwrap();
        bumped["v"] = serde_json::Value::from(99);
        assert_eq!(decrypt(&key, &bumped.to_string()).unwrap_err(), CryptoError::Corrupt);
    }

    #[test]
    fn truncated_input_is_corrupt() {
        let key = test_key();
        assert_eq!(decrypt(&key, "{\"v\":1}").unwrap_err(), CryptoError::Corrupt);
    }

    #[test]
    fn wrong_key_cannot_decrypt() {
        let key = test_key();
        let other = EncryptionKey::from_hex(&"cd".repeat(32)).unwrap();
        let blob = encrypt(&key, b"secret");
        assert_eq!(decrypt(&other, &blob).unwrap_err(), CryptoError::Corrupt);
    }

    proptest! {
        #[test]
        fn round_trip_holds_for_arbitrary_bytes(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            let key = test_key();
            let blob = encrypt(&key, &data);
            let recovered = decrypt(&key, &blob).unwrap();
            prop_assert_eq!(recovered, data);
        }
    }
}
