//! CLI output: error mapping and JSON rendering.

use crate::error::ApiError;
use serde::Serialize;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::Evaluator(crate::error::EvaluatorError::Failed { status, stderr }) => {
            format!("make exited with status {}:\n{}", status, stderr)
        }
        other => other.to_string(),
    }
}

/// Pretty-printed JSON for any serializable result.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| ApiError::Output(e.to_string()))
}
