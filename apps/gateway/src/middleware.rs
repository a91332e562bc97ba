// [apps/gateway/src/middleware.rs]
/*!
 * APARATO: GUARDIA DE FIRMA DE PETICION (ESTRATO L4)
 * RESPONSABILIDAD: ATAR CADA PETICION AUTENTICADA A UN (user_id, tenant_id)
 *
 * Unico punto de entrada de `VerifiedIdentity` al flujo de la peticion: los
 * handlers nunca leen `user_id`/`account_id` del cliente directamente, solo
 * la identidad ya verificada inyectada aqui (§4.5, §4.10).
 */

use crate::errors::ApiError;
use crate::state::AppState;
use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use connectbridge_signature::{from_json_body, from_query, verify_signature, SignatureError};
use tracing::warn;

const SIGNATURE_HEADER: &str = "stripe-app-signature";
const MAX_BODY_BYTES: usize = 64 * 1024;

fn map_signature_error(err: SignatureError) -> ApiError {
    match err {
        SignatureError::MissingHeader | SignatureError::InvalidSignature => {
            warn!("request rejected: signature did not verify");
            ApiError::Unauthorized
        }
        SignatureError::MissingIdentifiers => ApiError::MissingIdentifiers,
        SignatureError::Misconfigured => {
            ApiError::Internal("no signing secrets configured".to_string())
        }
    }
}

pub async fn signature_guard(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = req.into_parts();

    let header = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let (user_id, account_id, rebuilt_body) = if parts.method == Method::GET || parts.method == Method::DELETE {
        let query = parts.uri.query().unwrap_or("");
        let (user_id, account_id) = from_query(query).map_err(map_signature_error)?;
        (user_id, account_id, body)
    } else {
        let bytes = to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;

        let parsed = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::MalformedRequest("body is not valid JSON".to_string()))?;

        let (user_id, account_id) = from_json_body(&parsed).map_err(map_signature_error)?;
        (user_id, account_id, Body::from(bytes))
    };

    let identity = verify_signature(
        header.as_deref(),
        &state.settings.app_signing_secrets,
        &user_id,
        &account_id,
        Utc::now(),
    )
    .map_err(map_signature_error)?;

    let mut req = Request::from_parts(parts, rebuilt_body);
    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}
