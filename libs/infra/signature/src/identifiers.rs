// [libs/infra/signature/src/identifiers.rs]
//! Extraccion de `user_id`/`account_id`: de la query string para
//! metodos sin cuerpo, del JSON parseado para el resto (§4.5).

use crate::errors::SignatureError;
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
struct QueryIdentifiers {
    user_id: Option<String>,
    account_id: Option<String>,
}

pub fn from_query(query: &str) -> Result<(String, String), SignatureError> {
    let parsed: QueryIdentifiers =
        serde_urlencoded::from_str(query).map_err(|_| SignatureError::MissingIdentifiers)?;

    match (parsed.user_id, parsed.account_id) {
        (Some(user_id), Some(account_id)) if !user_id.is_empty() && !account_id.is_empty() => {
            Ok((user_id, account_id))
        }
        _ => Err(SignatureError::MissingIdentifiers),
    }
}

pub fn from_json_body(body: &Value) -> Result<(String, String), SignatureError> {
    let user_id = body
        .get("user_id")
        .and_then(Value::as_str)
        .ok_or(SignatureError::MissingIdentifiers)?;
    let account_id = body
        .get("account_id")
        .and_then(Value::as_str)
        .ok_or(SignatureError::MissingIdentifiers)?;

    Ok((user_id.to_string(), account_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_missing_account_id_is_rejected() {
        assert_eq!(from_query("user_id=u1").unwrap_err(), SignatureError::MissingIdentifiers);
    }

    #[test]
    fn json_body_with_non_string_field_is_rejected() {
        let body = serde_json::json!({ "user_id": "u1", "account_id": 42 });
        assert_eq!(from_json_body(&body).unwrap_err(), SignatureError::MissingIdentifiers);
    }

    #[test]
    fn both_sources_accept_well_formed_identifiers() {
        assert_eq!(from_query("user_id=u1&account_id=a1").unwrap(), ("u1".into(), "a1".into()));
        let body = serde_json::json!({ "user_id": "u1", "account_id": "a1" });
        assert_eq!(from_json_body(&body).unwrap(), ("u1".into(), "a1".into()));
    }
}
