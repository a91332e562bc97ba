// [libs/infra/signature/src/errors.rs]
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SignatureError {
    /// Ausente el header `Stripe-App-Signature`, o ilegible.
    #[error("[L2_SIGNATURE_FAULT]: MISSING_HEADER")]
    MissingHeader,

    /// `user_id`/`account_id` ausentes o no son cadenas.
    #[error("[L2_SIGNATURE_FAULT]: MISSING_IDENTIFIERS")]
    MissingIdentifiers,

    /// Ningun secreto configurado valido la firma, o fuera de tolerancia.
    #[error("[L2_SIGNATURE_FAULT]: INVALID_SIGNATURE")]
    InvalidSignature,

    /// No hay ningun secreto cargado: fallo de configuracion, no de
    /// autenticacion.
    #[error("[L2_SIGNATURE_FAULT]: MISCONFIGURED_NO_SECRETS")]
    Misconfigured,
}
