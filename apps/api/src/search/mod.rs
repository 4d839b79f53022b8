pub mod handlers;
pub mod query_log;

use crate::errors::AppError;

pub const MAX_QUERY_LEN: usize = 120;

/// Normalizes a raw search query: trim, collapse inner whitespace,
/// lowercase, cap at 120 chars. Errors if nothing is left.
pub fn normalize_query(raw: &str) -> Result<String, AppError> {
    let collapsed = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    if collapsed.is_empty() {
        return Err(AppError::Validation(
            "search query must not be empty".to_string(),
        ));
    }
    let normalized: String = collapsed.chars().take(MAX_QUERY_LEN).collect();
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_collapsed_and_lowercased() {
        assert_eq!(
            normalize_query("  SQL   Query\tHelper ").unwrap(),
            "sql query helper"
        );
    }

    #[test]
    fn test_empty_rejected() {
        assert!(normalize_query("   ").is_err());
        assert!(normalize_query("").is_err());
    }

    #[test]
    fn test_capped_at_120_chars() {
        let long = "a".repeat(500);
        assert_eq!(normalize_query(&long).unwrap().len(), MAX_QUERY_LEN);
    }
}
