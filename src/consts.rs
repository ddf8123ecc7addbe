pub const BEARER_PREFIX: &str = "bearer";
pub const TOKEN_ALGORITHM: &str = "HS256";

pub const MEDICAL_RECORD_DELETED_MSG: &str = "Medical record deleted successfully.";
pub const HEALTHY_MSG: &str = "Healthy";
