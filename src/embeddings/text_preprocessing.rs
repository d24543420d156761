//! Text preprocessing utilities for embedding generation

use tracing::debug;

use crate::errors::ReviewRagError;

/// Longest text (in characters) sent to the embedding model
pub const MAX_EMBEDDING_CHARS: usize = 2000;

/// Normalize whitespace, drop control characters and cap the length
pub fn preprocess_text_for_embedding(text: &str) -> Result<String, ReviewRagError> {
    let normalized = text
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ");

    if normalized.is_empty() {
        return Err(ReviewRagError::EmbeddingError(
            "Text contains only whitespace after preprocessing".to_string(),
        ));
    }

    if normalized.chars().count() > MAX_EMBEDDING_CHARS {
        debug!(
            "Truncating {} chars to {} for embedding",
            normalized.chars().count(),
            MAX_EMBEDDING_CHARS
        );
        return Ok(normalized.chars().take(MAX_EMBEDDING_CHARS).collect());
    }

    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_spaces() {
        let text = "Category: pets\nBrand: acme\r\nReview:\tGreat";
        assert_eq!(
            preprocess_text_for_embedding(text).unwrap(),
            "Category: pets Brand: acme Review: Great"
        );
    }

    #[test]
    fn test_whitespace_only_is_rejected() {
        assert!(preprocess_text_for_embedding(" \n\t ").is_err());
        assert!(preprocess_text_for_embedding("").is_err());
    }

    #[test]
    fn test_long_text_truncated_on_char_boundary() {
        let text = "é".repeat(MAX_EMBEDDING_CHARS + 10);
        let processed = preprocess_text_for_embedding(&text).unwrap();
        assert_eq!(processed.chars().count(), MAX_EMBEDDING_CHARS);
    }
}
