// [libs/infra/platform-client/src/lib.rs]
mod client;
mod errors;
mod response;

pub use client::PlatformClient;
pub use errors::PlatformError;
pub use response::TokenExchange;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_never_elevates_to_success() {
        let raw: response::RawTokenResponse = serde_json::from_str(
            r#"{"error":"invalid_grant","error_description":"code already used"}"#,
        )
        .unwrap();
        assert!(raw.into_success().is_none());
    }

    #[test]
    fn missing_tenant_user_id_is_not_a_success() {
        let raw: response::RawTokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","scope":"read_only"}"#,
        )
        .unwrap();
        assert!(raw.into_success().is_none());
    }

    #[test]
    fn complete_envelope_defaults_expiry_to_one_hour() {
        let raw: response::RawTokenResponse = serde_json::from_str(
            r#"{"access_token":"a","refresh_token":"r","scope":"read_only","tenant_user_id":"acct_X"}"#,
        )
        .unwrap();
        let exchange = raw.into_success().unwrap();
        assert_eq!(exchange.expires_in_seconds, 3600);
    }
}
