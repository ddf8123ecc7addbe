//! Domain errors raised while serving medical record operations.

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, Clone, PartialEq)]
pub enum MedicalError {
    #[display("token not provided")]
    MissingToken,
    #[display("invalid or expired token")]
    InvalidToken,
    #[display("responsible id not found or invalid in the token")]
    InvalidIdentity,
    #[display("pet not found")]
    PetNotFound,
    #[display("not authorized to manage the medical history of this pet")]
    NotOwner,
    #[display("medical record not found")]
    RecordNotFound,
    #[display("at least one field to update must be provided")]
    EmptyUpdate,
    #[display("the update is identical to the latest medical record")]
    NoOpUpdate,
    #[display("medical record store unavailable: {_0}")]
    StoreUnavailable(#[error(not(source))] String),
}

impl MedicalError {
    /// Short label used for metrics and log fields
    pub fn reason(&self) -> &'static str {
        match self {
            MedicalError::MissingToken => "missing_token",
            MedicalError::InvalidToken => "invalid_token",
            MedicalError::InvalidIdentity => "invalid_identity",
            MedicalError::PetNotFound => "pet_not_found",
            MedicalError::NotOwner => "not_owner",
            MedicalError::RecordNotFound => "record_not_found",
            MedicalError::EmptyUpdate => "empty_update",
            MedicalError::NoOpUpdate => "noop_update",
            MedicalError::StoreUnavailable(_) => "store_unavailable",
        }
    }
}

/// Storage code speaks `anyhow`; a domain error raised inside the store keeps
/// its meaning, anything else is an unavailable store.
impl From<anyhow::Error> for MedicalError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<MedicalError>() {
            Ok(domain_err) => domain_err,
            Err(err) => MedicalError::StoreUnavailable(format!("{err:#}")),
        }
    }
}
