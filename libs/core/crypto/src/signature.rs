// [libs/core/crypto/src/signature.rs]
//! Verificacion HMAC constante en el tiempo para cabeceras firmadas con
//! tolerancia de repeticion, usada por el verificador de firmas de peticion.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Verifica `received_mac` (hex) contra `hmac_sha256(secret, "<timestamp>.<payload>")`
/// en tiempo constante. El llamador ya valido la ventana de tolerancia del
/// timestamp; esta funcion solo comprueba la igualdad criptografica.
pub fn verify_mac(payload: &str, timestamp: &str, received_mac_hex: &str, secret: &[u8]) -> bool {
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    let expected = mac.finalize().into_bytes();

    let Ok(received) = hex::decode(received_mac_hex) else {
        return false;
    };

    // Comparacion de longitud variable: igual de segura que ct_eq sobre
    // buffers de igual tamano porque un mismatch de longitud ya descarta
    // la firma sin comparar contenido.
    if received.len() != expected.len() {
        return false;
    }

    received.ct_eq(expected.as_slice()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(secret: &[u8], timestamp: &str, payload: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret).unwrap();
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn valid_signature_verifies() {
        let secret = b"whsec_test_secret";
        let payload = r#"{"user_id":"u_1","account_id":"a_1"}"#;
        let ts = "1700000000";
        let mac = sign(secret, ts, payload);
        assert!(verify_mac(payload, ts, &mac, secret));
    }

    #[test]
    fn wrong_secret_fails() {
        let payload = r#"{"user_id":"u_1","account_id":"a_1"}"#;
        let ts = "1700000000";
        let mac = sign(b"secret_a", ts, payload);
        assert!(!verify_mac(payload, ts, &mac, b"secret_b"));
    }

    #[test]
    fn tampered_payload_fails() {
        let secret = b"whsec_test_secret";
        let ts = "1700000000";
        let mac = sign(secret, ts, r#"{"user_id":"u_1","account_id":"a_1"}"#);
        assert!(!verify_mac(r#"{"user_id":"u_2","account_id":"a_1"}"#, ts, &mac, secret));
    }

    #[test]
    fn malformed_hex_fails_closed() {
        let secret = b"whsec_test_secret";
        assert!(!verify_mac("payload", "1700000000", "not-hex", secret));
    }

    #[test]
    fn secret_rotation_accepts_any_configured_secret() {
        let payload = r#"{"user_id":"u_1","account_id":"a_1"}"#;
        let ts = "1700000000";
        let current_secret = b"whsec_current";
        let mac = sign(current_secret, ts, payload);

        let rotated_list: Vec<&[u8]> = vec![b"whsec_old", b"whsec_current"];
        assert!(rotated_list.iter().any(|s| verify_mac(payload, ts, &mac, s)));

        let secret_removed: Vec<&[u8]> = vec![b"whsec_old", b"whsec_newer"];
        assert!(!secret_removed.iter().any(|s| verify_mac(payload, ts, &mac, s)));
    }
}
