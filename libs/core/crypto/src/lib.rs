// [libs/core/crypto/src/lib.rs]
/*!
 * =================================================================
 * APARATO: CRYPTOGRAPHY PRIMITIVES (ESTRATO L1-CORE)
 * RESPONSABILIDAD: AEAD ENVELOPE, DIGESTS Y VERIFICACION DE FIRMAS HMAC
 *
 * Este modulo es el contrato de interoperabilidad entre el backend en
 * linea y el barredor de tokens por lotes: ambos leen y escriben el
 * mismo sobre versionado de cifrado (ver `envelope`), de modo que un
 * token rotado por el barredor siempre es legible por el backend y
 * viceversa.
 * =================================================================
 */

mod envelope;
mod key;
mod signature;

pub use envelope::{decrypt, encrypt};
pub use key::EncryptionKey;
pub use signature::verify_mac;

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Cataloga los fallos del estrato criptografico. La variante `Corrupt` es
/// deliberadamente opaca: nunca debe revelar si el fallo fue de longitud,
/// version o integridad del tag, para no regalar un oraculo a un atacante.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CryptoError {
    /// El ciphertext es ilegible: version desconocida, longitudes de
    /// IV/tag incorrectas, o el tag de autenticacion no valida.
    #[error("[L1_CRYPTO_FAULT]: CIPHERTEXT_CORRUPT")]
    Corrupt,

    /// La clave de cifrado de proceso no fue cargada (fallo fatal de arranque).
    #[error("[L1_CRYPTO_FAULT]: ENCRYPTION_KEY_MISSING")]
    Misconfigured,
}

/// Produce el digest SHA-256 hexadecimal de un valor, usado exclusivamente
/// para el hashing de estado CSRF de un solo uso (nunca el valor crudo se
/// persiste ni se registra).
pub fn digest(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Genera un token CSPRNG de `n` bytes, codificado en hexadecimal.
pub fn random_token(n: usize) -> String {
    use rand::RngCore;
    let mut buf = vec![0u8; n];
    rand::rngs::OsRng.fill_bytes(&mut buf);
    hex::encode(buf)
}

const ALPHANUMERIC_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Genera una contrasena alfanumerica CSPRNG de `n` caracteres, para el
/// unico momento en que la contrasena de una base provisionada se
/// transmite en claro (§4.8).
pub fn random_alphanumeric(n: usize) -> String {
    use rand::Rng;
    let mut rng = rand::rngs::OsRng;
    (0..n)
        .map(|_| {
            let idx = rng.gen_range(0..ALPHANUMERIC_CHARSET.len());
            ALPHANUMERIC_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic_and_never_echoes_input() {
        let a = digest("raw-state-value");
        let b = digest("raw-state-value");
        assert_eq!(a, b);
        assert_ne!(a, "raw-state-value");
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn random_token_has_requested_byte_length() {
        let t = random_token(32);
        assert_eq!(t.len(), 64);
        let t2 = random_token(32);
        assert_ne!(t, t2, "CSPRNG must not repeat across calls");
    }

    #[test]
    fn random_alphanumeric_has_requested_length_and_charset() {
        let password = random_alphanumeric(24);
        assert_eq!(password.len(), 24);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
