//! Bearer token verification and caller identity extraction.
//!
//! Callers authenticate with an HS256 JSON Web Token issued by the users
//! service. The `Authorization` header may carry the token with or without the
//! `Bearer` word.
//!
//! Verification order:
//! 1. Strip the optional `Bearer ` prefix (any letter case)
//! 2. Check the header declares `HS256`
//! 3. Compute HMAC-SHA256 of `header.payload` with the shared secret and
//!    compare it with the signature in constant time
//! 4. Reject the token when `exp` is missing or reached, or `nbf` is in the future
//! 5. Only then read the `userId` claim
//!
//! No claim is trusted before step 3 succeeds.

use crate::{consts, errors::MedicalError};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

#[derive(Deserialize)]
struct TokenHeader {
    alg: String,
}

#[derive(Deserialize)]
struct TokenClaims {
    exp: Option<i64>,
    nbf: Option<i64>,
    #[serde(rename = "userId")]
    user_id: Option<serde_json::Value>,
}

/// Removes the optional, case-insensitive `Bearer` word.
///
/// The word only counts as a prefix when the header ends right after it or
/// whitespace follows, so `"Bearer "` leaves nothing to verify.
fn strip_bearer_prefix(authorization: &str) -> &str {
    let authorization = authorization.trim();
    let prefix_len = consts::BEARER_PREFIX.len();

    match authorization.get(..prefix_len) {
        Some(prefix)
            if prefix.eq_ignore_ascii_case(consts::BEARER_PREFIX)
                && authorization[prefix_len..]
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace) =>
        {
            authorization[prefix_len..].trim()
        }
        _ => authorization,
    }
}

fn decode_segment<T: serde::de::DeserializeOwned>(segment: &str) -> Result<T, MedicalError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| MedicalError::InvalidToken)?;

    serde_json::from_slice(&bytes).map_err(|_| MedicalError::InvalidToken)
}

fn verify_signature(signing_input: &str, signature_b64: &str, secret: &str) -> bool {
    let expected_signature = match URL_SAFE_NO_PAD.decode(signature_b64) {
        Ok(sig) => sig,
        Err(e) => {
            logfire::warn!(
                "Failed to decode token signature: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            logfire::error!(
                "Failed to create HMAC instance: {error}",
                error = e.to_string()
            );
            return false;
        }
    };

    mac.update(signing_input.as_bytes());
    let computed_signature = mac.finalize().into_bytes();

    computed_signature.ct_eq(&expected_signature[..]).into()
}

fn check_lifetime(claims: &TokenClaims, now: DateTime<Utc>) -> Result<(), MedicalError> {
    let now = now.timestamp();

    match claims.exp {
        Some(exp) if exp > now => {}
        _ => return Err(MedicalError::InvalidToken),
    }

    if claims.nbf.is_some_and(|nbf| nbf > now) {
        return Err(MedicalError::InvalidToken);
    }

    Ok(())
}

/// Verifies the bearer credential and returns the caller user id.
pub fn extract_caller_identity(
    authorization: Option<&str>,
    secret: &str,
) -> Result<Uuid, MedicalError> {
    extract_caller_identity_at(authorization, secret, Utc::now())
}

pub(crate) fn extract_caller_identity_at(
    authorization: Option<&str>,
    secret: &str,
    now: DateTime<Utc>,
) -> Result<Uuid, MedicalError> {
    let token = strip_bearer_prefix(authorization.unwrap_or_default());
    if token.is_empty() {
        return Err(MedicalError::MissingToken);
    }

    let mut segments = token.split('.');
    let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(MedicalError::InvalidToken);
    };

    let header: TokenHeader = decode_segment(header_b64)?;
    if header.alg != consts::TOKEN_ALGORITHM {
        logfire::warn!(
            "Rejected token signed with {alg}",
            alg = header.alg.to_string()
        );
        return Err(MedicalError::InvalidToken);
    }

    let signing_input = &token[..header_b64.len() + 1 + claims_b64.len()];
    if !verify_signature(signing_input, signature_b64, secret) {
        logfire::warn!("Token signature verification failed");
        return Err(MedicalError::InvalidToken);
    }

    let claims: TokenClaims = decode_segment(claims_b64)?;
    check_lifetime(&claims, now)?;

    claims
        .user_id
        .as_ref()
        .and_then(serde_json::Value::as_str)
        .and_then(|user_id| Uuid::parse_str(user_id).ok())
        .ok_or(MedicalError::InvalidIdentity)
}

/// Signs claims the way the users service does. Used to build fixtures.
#[cfg(test)]
pub(crate) fn sign_token(claims: &serde_json::Value, secret: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    let signing_input = format!("{header}.{payload}");

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(signing_input.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

    format!("{signing_input}.{signature}")
}

/// Valid one hour token for `user_id`
#[cfg(test)]
pub(crate) fn sign_user_token(user_id: Uuid, secret: &str) -> String {
    sign_token(
        &serde_json::json!({
            "userId": user_id.to_string(),
            "exp": (Utc::now() + chrono::TimeDelta::hours(1)).timestamp(),
        }),
        secret,
    )
}
