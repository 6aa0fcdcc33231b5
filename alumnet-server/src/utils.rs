use alumnet_common::UserId;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, Result};

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Decode a JSON body into its typed request, before any store access.
pub fn parse_payload<T: DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| AppError::BadRequest(format!("Invalid payload: {e}")))
}

pub fn parse_id(raw: &str, what: &str) -> Result<String> {
    Uuid::parse_str(raw)
        .map(|id| id.to_string())
        .map_err(|_| AppError::BadRequest(format!("Invalid {what} ID")))
}

pub fn parse_user_id(raw: &str) -> Result<UserId> {
    parse_id(raw, "user").map(UserId)
}

/// Rejects empty or whitespace-only required fields.
pub fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

/// `Some` only for values carrying text; blank input never overwrites.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
