use sha2::{Digest, Sha256};

use crate::{error::AppError, models::question::Question};

/// Deterministic fingerprint for a question list.
///
/// Serializes the list in field order and hashes it with SHA-256.
/// Two lists with the same questions in the same order share a fingerprint.
pub fn questions_fingerprint(questions: &[Question]) -> Result<String, AppError> {
    let normalized = serde_json::to_vec(questions)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?;

    Ok(format!("{:x}", Sha256::digest(&normalized)))
}
