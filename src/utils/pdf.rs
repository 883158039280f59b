use crate::error::AppError;

/// Extract text content from an in-memory PDF.
///
/// Only "digital-native" PDFs with selectable text work; scanned pages come
/// back empty and are reported as such. Parsing is CPU-bound, so it runs on
/// the blocking pool.
pub async fn extract_text(bytes: Vec<u8>) -> Result<String, AppError> {
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| {
            // pdf-extract panics on some malformed files instead of erroring.
            if e.is_panic() {
                tracing::warn!("PDF extraction panicked");
                AppError::BadRequest("Could not read PDF".to_string())
            } else {
                AppError::InternalServerError(e.to_string())
            }
        })?
        .map_err(|e| {
            tracing::warn!("PDF extraction failed: {}", e);
            AppError::BadRequest("Could not read PDF".to_string())
        })?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("No text extracted from PDF".to_string()));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_bytes_are_bad_request() {
        let err = extract_text(b"definitely not a pdf".to_vec()).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
