//! Caller authentication from the `Authorization` header.

use crate::{api, errors::MedicalError, metric};
use ntex::{http, web};
use uuid::Uuid;

/// Verifies the bearer credential of the request and returns the caller id.
pub fn caller_identity(req: &web::HttpRequest, jwt_secret: &str) -> Result<Uuid, MedicalError> {
    read_authorization(req)
        .and_then(|authorization| api::token::extract_caller_identity(authorization, jwt_secret))
        .inspect_err(|e| {
            logfire::warn!(
                "Rejected caller on {path}: {reason}",
                path = req.path().to_string(),
                reason = e.reason()
            );
            metric::incr_rejection_statds(e.reason());
        })
}

/// Header values outside visible ASCII can't hold a token
fn read_authorization(req: &web::HttpRequest) -> Result<Option<&str>, MedicalError> {
    req.headers()
        .get(http::header::AUTHORIZATION)
        .map(|value| value.to_str())
        .transpose()
        .map_err(|_| MedicalError::InvalidToken)
}
