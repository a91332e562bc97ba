// [libs/infra/signature/src/verifier.rs]
/*!
 * APARATO: VERIFICADOR DE FIRMA DE PETICION (ESTRATO L2)
 * RESPONSABILIDAD: ATAR CRIPTOGRAFICAMENTE CADA PETICION A UN USUARIO Y TENANT
 */

use crate::errors::SignatureError;
use chrono::{DateTime, Utc};
use connectbridge_crypto::verify_mac;
use tracing::{instrument, warn};

const DEFAULT_TOLERANCE_SECONDS: i64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub user_id: String,
    pub tenant_id: String,
}

/// Reconstruye el payload canonico exacto exigido por la firma: los dos
/// campos en ese orden, sin espacios en blanco. Usa el formateo de cadenas
/// de `serde_json` solo para escapar correctamente cada valor, nunca para
/// decidir el orden de los campos.
pub fn canonical_payload(user_id: &str, account_id: &str) -> String {
    format!(
        "{{\"user_id\":{},\"account_id\":{}}}",
        serde_json::to_string(user_id).expect("string serialization cannot fail"),
        serde_json::to_string(account_id).expect("string serialization cannot fail"),
    )
}

fn parse_header(header: &str) -> Option<(String, String)> {
    let mut t = None;
    let mut v1 = None;

    for pair in header.split(',') {
        let mut parts = pair.splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        match key {
            "t" => t = Some(value.to_string()),
            "v1" => v1 = Some(value.to_string()),
            _ => {}
        }
    }

    Some((t?, v1?))
}

/// Verifica el header de firma contra la lista de secretos configurados,
/// en orden, devolviendo la identidad autenticada en el primer acierto.
pub fn verify_signature(
    header: Option<&str>,
    secrets: &[String],
    user_id: &str,
    account_id: &str,
    now: DateTime<Utc>,
) -> Result<VerifiedIdentity, SignatureError> {
    verify_signature_with_tolerance(header, secrets, user_id, account_id, now, DEFAULT_TOLERANCE_SECONDS)
}

#[instrument(skip(header, secrets))]
pub fn verify_signature_with_tolerance(
    header: Option<&str>,
    secrets: &[String],
    user_id: &str,
    account_id: &str,
    now: DateTime<Utc>,
    tolerance_seconds: i64,
) -> Result<VerifiedIdentity, SignatureError> {
    if secrets.is_empty() {
        return Err(SignatureError::Misconfigured);
    }

    let header = header.ok_or(SignatureError::MissingHeader)?;
    let (timestamp_raw, received_mac) = parse_header(header).ok_or(SignatureError::MissingHeader)?;
    let timestamp: i64 = timestamp_raw.parse().map_err(|_| SignatureError::MissingHeader)?;

    if (now.timestamp() - timestamp).abs() > tolerance_seconds {
        warn!("signature timestamp outside tolerance window");
        return Err(SignatureError::InvalidSignature);
    }

    let payload = canonical_payload(user_id, account_id);

    for secret in secrets {
        if verify_mac(&payload, &timestamp_raw, &received_mac, secret.as_bytes()) {
            return Ok(VerifiedIdentity { user_id: user_id.to_string(), tenant_id: account_id.to_string() });
        }
    }

    Err(SignatureError::InvalidSignature)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_payload_has_fixed_field_order_and_no_whitespace() {
        assert_eq!(canonical_payload("u1", "a1"), r#"{"user_id":"u1","account_id":"a1"}"#);
    }

    #[test]
    fn header_missing_is_rejected() {
        let err = verify_signature(None, &["s".into()], "u1", "a1", Utc::now()).unwrap_err();
        assert_eq!(err, SignatureError::MissingHeader);
    }

    #[test]
    fn no_configured_secrets_is_misconfigured_not_unauthenticated() {
        let err = verify_signature(Some("t=1,v1=ab"), &[], "u1", "a1", Utc::now()).unwrap_err();
        assert_eq!(err, SignatureError::Misconfigured);
    }
}
