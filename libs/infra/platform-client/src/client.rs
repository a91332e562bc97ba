// [libs/infra/platform-client/src/client.rs]
/*!
 * APARATO: CLIENTE DE INTERCAMBIO/REFRESCO OAUTH (ESTRATO L2)
 * RESPONSABILIDAD: HABLA DE CABLE CON EL ENDPOINT DE TOKENS DE LA PLATAFORMA
 *
 * Nunca registra codigos, tokens, o cuerpos crudos: solo banderas
 * estructurales y, cuando la plataforma lo entrega, su request-id.
 */

use crate::errors::PlatformError;
use crate::response::{RawTokenResponse, TokenExchange};
use connectbridge_models::config::ModeCredentials;
use reqwest::StatusCode;
use tracing::{instrument, warn};

const TOKEN_ENDPOINT: &str = "https://marketplace.stripe.com/oauth/v2/token";

#[derive(Clone)]
pub struct PlatformClient {
    http: reqwest::Client,
}

impl PlatformClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    #[instrument(skip(self, credentials, code))]
    pub async fn exchange_code(
        &self,
        credentials: &ModeCredentials,
        code: &str,
    ) -> Result<TokenExchange, PlatformError> {
        let form = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", credentials.app_client_id.as_str()),
        ];
        self.call_token_endpoint(credentials, &form).await
    }

    #[instrument(skip(self, credentials, refresh_token))]
    pub async fn refresh(
        &self,
        credentials: &ModeCredentials,
        refresh_token: &str,
    ) -> Result<TokenExchange, PlatformError> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", credentials.app_client_id.as_str()),
        ];
        self.call_token_endpoint(credentials, &form).await
    }

    async fn call_token_endpoint(
        &self,
        credentials: &ModeCredentials,
        form: &[(&str, &str)],
    ) -> Result<TokenExchange, PlatformError> {
        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .basic_auth(&credentials.secret_key, Some(""))
            .form(form)
            .send()
            .await
            .map_err(|e| {
                warn!("platform token endpoint unreachable: {}", request_id_hint(&e));
                PlatformError::UpstreamTransient(request_id_hint(&e))
            })?;

        let status = response.status();

        if status.is_server_error() {
            return Err(PlatformError::UpstreamTransient(format!("http_status={status}")));
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PlatformError::UpstreamAuthError);
        }

        let raw: RawTokenResponse = response.json().await.map_err(|_| {
            PlatformError::UpstreamMalformed("non_json_response_body".to_string())
        })?;

        if let Some(error_code) = &raw.error {
            return Err(classify_error_code(error_code));
        }

        raw.into_success()
            .ok_or_else(|| PlatformError::UpstreamMalformed("success_envelope_missing_fields".to_string()))
    }
}

fn classify_error_code(error_code: &str) -> PlatformError {
    match error_code {
        "invalid_grant" | "invalid_client" | "unauthorized_client" => PlatformError::UpstreamAuthError,
        other => PlatformError::UpstreamTransient(format!("error_code={other}")),
    }
}

fn request_id_hint(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "timeout".to_string()
    } else if error.is_connect() {
        "connect_failed".to_string()
    } else {
        "transport_fault".to_string()
    }
}
