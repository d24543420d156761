//! Unit tests for error handling
//!
//! Tests error types, conversions, and error message formatting.

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use crate::errors::ReviewRagError;

    // ====== Error Type Tests ======

    #[test]
    fn test_custom_error() {
        let error = ReviewRagError::Custom("Test error message".to_string());
        assert_eq!(error.to_string(), "Test error message");
    }

    #[test]
    fn test_config_error() {
        let error = ReviewRagError::ConfigError("missing llm.api_key".to_string());
        assert!(matches!(error, ReviewRagError::ConfigError(_)));
        assert!(error.to_string().contains("configuration"));
    }

    #[test]
    fn test_collection_not_found_mentions_index_command() {
        let error = ReviewRagError::CollectionNotFound("startup_market_insights".to_string());
        let display = error.to_string();
        assert!(display.contains("startup_market_insights"));
        assert!(display.contains("reviewrag index"));
    }

    #[test]
    fn test_malformed_record_display() {
        let error = ReviewRagError::MalformedRecord {
            file: "reviews_pets.csv".to_string(),
            row: 3,
            reason: "Star_Rating must be between 1 and 5".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Malformed record in reviews_pets.csv (row 3): Star_Rating must be between 1 and 5"
        );
    }

    #[test]
    fn test_no_input_files_display() {
        let error = ReviewRagError::NoInputFiles(PathBuf::from("categories_data"));
        assert!(error.to_string().contains("categories_data"));
    }

    // ====== Error Conversion Tests ======

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let err: ReviewRagError = io_err.into();

        match err {
            ReviewRagError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_error_from_serde_json() {
        let parse_result: Result<serde_json::Value, _> = serde_json::from_str("{invalid json}");
        let err: ReviewRagError = parse_result.unwrap_err().into();
        assert!(matches!(err, ReviewRagError::Serialization(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let parse_result: Result<toml::Value, _> = toml::from_str("level = ");
        let err: ReviewRagError = parse_result.unwrap_err().into();
        assert!(matches!(err, ReviewRagError::TomlParsing(_)));
    }

    #[test]
    fn test_error_from_url() {
        let err: ReviewRagError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, ReviewRagError::Url(_)));
    }

    // ====== Result Type Tests ======

    #[test]
    fn test_result_and_then() {
        let result: crate::Result<i32> = Ok(42);
        let chained = result.and_then(|v| {
            if v > 40 {
                Ok(v + 10)
            } else {
                Err(ReviewRagError::Custom("Too small".to_string()))
            }
        });
        assert_eq!(chained.unwrap(), 52);
    }
}
