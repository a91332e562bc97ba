// [libs/infra/signature/src/lib.rs]
mod errors;
mod identifiers;
mod verifier;

pub use errors::SignatureError;
pub use identifiers::{from_json_body, from_query};
pub use verifier::{canonical_payload, verify_signature, verify_signature_with_tolerance, VerifiedIdentity};
