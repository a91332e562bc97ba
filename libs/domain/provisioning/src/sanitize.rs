// [libs/domain/provisioning/src/sanitize.rs]
//! Antes de persistir cualquier mensaje de error se despojan tokens
//! bearer, claves secretas (`sk|rk|pk_(live|test)_…`), refresh tokens
//! (`rt_…`) y JWTs (`eyJ…`) con patrones fijos, reemplazandolos por
//! `[REDACTED]` (§4.8).

const SENSITIVE_PREFIXES: &[&str] =
    &["sk_live_", "sk_test_", "rk_live_", "rk_test_", "pk_live_", "pk_test_", "rt_", "eyJ"];

const REDACTED: &str = "[REDACTED]";

pub fn sanitize_error_message(raw: &str) -> String {
    let words: Vec<&str> = raw.split(' ').collect();

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let follows_bearer = i > 0 && words[i - 1].eq_ignore_ascii_case("bearer");
            let is_sensitive = follows_bearer || SENSITIVE_PREFIXES.iter().any(|p| word.starts_with(p));
            if is_sensitive {
                REDACTED
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_secret_key_prefixes() {
        let out = sanitize_error_message("upstream rejected sk_live_abc123 for project");
        assert!(!out.contains("sk_live_abc123"));
        assert!(out.contains(REDACTED));
    }

    #[test]
    fn redacts_bearer_token_following_keyword() {
        let out = sanitize_error_message("request failed Bearer eyJhbGciOiJIUzI1NiJ9.xyz");
        assert!(!out.contains("eyJhbGciOiJIUzI1NiJ9.xyz"));
    }

    #[test]
    fn redacts_refresh_token_prefix() {
        let out = sanitize_error_message("could not use rt_9f8e7d for refresh");
        assert!(!out.contains("rt_9f8e7d"));
    }

    #[test]
    fn leaves_ordinary_text_untouched() {
        let out = sanitize_error_message("connection timed out after 600 seconds");
        assert_eq!(out, "connection timed out after 600 seconds");
    }
}
