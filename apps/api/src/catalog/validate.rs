use crate::errors::AppError;

pub const MAX_TAGS: usize = 10;
pub const MAX_BODY_LEN: usize = 20_000;

pub fn validate_title(title: &str) -> Result<(), AppError> {
    let len = title.trim().chars().count();
    if !(3..=160).contains(&len) {
        return Err(AppError::Validation(
            "title must be between 3 and 160 characters".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_body(body: &str) -> Result<(), AppError> {
    if body.trim().is_empty() {
        return Err(AppError::Validation("body must not be empty".to_string()));
    }
    if body.chars().count() > MAX_BODY_LEN {
        return Err(AppError::Validation(format!(
            "body must be at most {MAX_BODY_LEN} characters"
        )));
    }
    Ok(())
}

/// Normalizes tags (trim, lowercase, dedupe preserving order) and checks
/// count and per-tag length limits.
pub fn normalize_tags(tags: &[String]) -> Result<Vec<String>, AppError> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || tag.chars().count() > 40 {
            return Err(AppError::Validation(
                "tags must be between 1 and 40 characters".to_string(),
            ));
        }
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    if out.len() > MAX_TAGS {
        return Err(AppError::Validation(format!(
            "at most {MAX_TAGS} tags allowed"
        )));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("ok?").is_ok());
        assert!(validate_title("ab").is_err());
        assert!(validate_title(&"x".repeat(161)).is_err());
    }

    #[test]
    fn test_body_rejects_blank() {
        assert!(validate_body("   \n").is_err());
        assert!(validate_body("translate this").is_ok());
    }

    #[test]
    fn test_body_length_cap() {
        assert!(validate_body(&"a".repeat(MAX_BODY_LEN)).is_ok());
        assert!(validate_body(&"a".repeat(MAX_BODY_LEN + 1)).is_err());
    }

    #[test]
    fn test_tags_normalized_and_deduped() {
        let tags = vec![
            " SQL ".to_string(),
            "sql".to_string(),
            "Writing".to_string(),
        ];
        assert_eq!(normalize_tags(&tags).unwrap(), vec!["sql", "writing"]);
    }

    #[test]
    fn test_too_many_tags_rejected() {
        let tags: Vec<String> = (0..11).map(|i| format!("tag-{i}")).collect();
        assert!(normalize_tags(&tags).is_err());
    }

    #[test]
    fn test_empty_tag_rejected() {
        assert!(normalize_tags(&["  ".to_string()]).is_err());
    }
}
