// [libs/core/crypto/src/key.rs]
//! Carga perezosa-unica de la clave de cifrado de 32 bytes del proceso.

use crate::CryptoError;
use aes_gcm::Aes256Gcm;
use aes_gcm::KeyInit;
use std::sync::Arc;

/// Clave de 32 bytes inmutable tras la ignicion, compartida por todas las
/// instancias de `Aes256Gcm` del proceso.
#[derive(Clone)]
pub struct EncryptionKey {
    inner: Arc<[u8; 32]>,
}

impl EncryptionKey {
    /// Parsea `ENCRYPTION_KEY` (32 bytes en hexadecimal, 64 caracteres).
    /// Un valor ausente o malformado es un fallo fatal de arranque: el
    /// llamador decide como abortar, este metodo solo reporta el error.
    pub fn from_hex(raw: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(raw.trim()).map_err(|_| CryptoError::Misconfigured)?;
        if bytes.len() != 32 {
            return Err(CryptoError::Misconfigured);
        }
        let mut fixed = [0u8; 32];
        fixed.copy_from_slice(&bytes);
        Ok(Self { inner: Arc::new(fixed) })
    }

    pub(crate) fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new_from_slice(self.inner.as_slice())
            .expect("32-byte key is always a valid AES-256 key")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(EncryptionKey::from_hex("abcd").unwrap_err(), CryptoError::Misconfigured);
    }

    #[test]
    fn rejects_non_hex() {
        let not_hex = "z".repeat(64);
        assert_eq!(EncryptionKey::from_hex(&not_hex).unwrap_err(), CryptoError::Misconfigured);
    }

    #[test]
    fn accepts_64_hex_chars() {
        let ok = "11".repeat(32);
        assert!(EncryptionKey::from_hex(&ok).is_ok());
    }
}
