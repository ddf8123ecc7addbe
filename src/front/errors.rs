use crate::errors::MedicalError;
use derive_more::{Display, Error};
use log::{error, warn};
use ntex::{http, web};
use serde_json::json;

/// Endpoint an error was raised from. The same domain error maps to
/// different status codes depending on the operation.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    #[display("create")]
    Create,
    #[display("get_latest")]
    GetLatest,
    #[display("get_all")]
    GetAll,
    #[display("update")]
    Update,
    #[display("delete")]
    Delete,
}

#[derive(Debug, Display, Error)]
#[display("[{operation}] {error}")]
pub struct ApiError {
    pub operation: Operation,
    #[error(source)]
    pub error: MedicalError,
}

impl ApiError {
    pub fn new(operation: Operation, error: MedicalError) -> Self {
        Self { operation, error }
    }

    /// Reason sent back to the caller, store failures don't leak their cause
    fn public_message(&self) -> String {
        match &self.error {
            MedicalError::StoreUnavailable(_) => "medical record store unavailable".to_string(),
            err => err.to_string(),
        }
    }
}

impl web::error::WebResponseError for ApiError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        if self.status_code().is_server_error() {
            error!("{}", self);
        } else {
            warn!("{}", self);
        }

        web::HttpResponse::build(self.status_code()).json(&json!({
            "message": self.public_message(),
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match (&self.error, self.operation) {
            (
                MedicalError::MissingToken
                | MedicalError::InvalidToken
                | MedicalError::InvalidIdentity,
                _,
            ) => http::StatusCode::UNAUTHORIZED,
            (MedicalError::PetNotFound, Operation::Create) => http::StatusCode::UNAUTHORIZED,
            (MedicalError::PetNotFound, _) => http::StatusCode::NOT_FOUND,
            (MedicalError::NotOwner, Operation::Create | Operation::Update) => {
                http::StatusCode::UNAUTHORIZED
            }
            (MedicalError::NotOwner, _) => http::StatusCode::FORBIDDEN,
            (MedicalError::RecordNotFound, _) => http::StatusCode::NOT_FOUND,
            (MedicalError::EmptyUpdate | MedicalError::NoOpUpdate, _) => {
                http::StatusCode::BAD_REQUEST
            }
            (MedicalError::StoreUnavailable(_), _) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Display, Error)]
pub enum UserError {
    #[display("resource not found")]
    UrlNotFound,
    #[display("invalid request body: {_0}")]
    InvalidBody(#[error(not(source))] String),
    #[display("invalid identifier in the url")]
    InvalidPath,
}

impl web::error::WebResponseError for UserError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        web::HttpResponse::build(self.status_code()).json(&json!({
            "message": self.to_string(),
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            UserError::UrlNotFound => http::StatusCode::NOT_FOUND,
            UserError::InvalidBody(_) | UserError::InvalidPath => http::StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntex::web::error::WebResponseError;

    fn status(operation: Operation, error: MedicalError) -> http::StatusCode {
        ApiError::new(operation, error).status_code()
    }

    #[test]
    fn test_token_errors_are_unauthorized_everywhere() {
        for operation in [
            Operation::Create,
            Operation::GetLatest,
            Operation::GetAll,
            Operation::Update,
            Operation::Delete,
        ] {
            for error in [
                MedicalError::MissingToken,
                MedicalError::InvalidToken,
                MedicalError::InvalidIdentity,
            ] {
                assert_eq!(status(operation, error), http::StatusCode::UNAUTHORIZED);
            }
        }
    }

    #[test]
    fn test_ownership_status_depends_on_operation() {
        assert_eq!(
            status(Operation::Create, MedicalError::PetNotFound),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(Operation::Create, MedicalError::NotOwner),
            http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(Operation::Update, MedicalError::PetNotFound),
            http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(Operation::Update, MedicalError::NotOwner),
            http::StatusCode::UNAUTHORIZED
        );
        for operation in [Operation::GetLatest, Operation::GetAll, Operation::Delete] {
            assert_eq!(
                status(operation, MedicalError::NotOwner),
                http::StatusCode::FORBIDDEN
            );
            assert_eq!(
                status(operation, MedicalError::PetNotFound),
                http::StatusCode::NOT_FOUND
            );
        }
    }

    #[test]
    fn test_update_rejections_are_bad_requests() {
        assert_eq!(
            status(Operation::Update, MedicalError::EmptyUpdate),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(Operation::Update, MedicalError::NoOpUpdate),
            http::StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_malformed_requests_are_bad_requests() {
        assert_eq!(
            UserError::InvalidBody("expected value".into()).status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            UserError::InvalidPath.status_code(),
            http::StatusCode::BAD_REQUEST
        );
        assert_eq!(UserError::UrlNotFound.status_code(), http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_failure_hides_cause() {
        let err = ApiError::new(
            Operation::GetAll,
            MedicalError::StoreUnavailable("disk I/O error at /var/lib".into()),
        );

        assert_eq!(err.status_code(), http::StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("/var/lib"));
    }
}
