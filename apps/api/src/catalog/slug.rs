use sqlx::PgPool;

use crate::errors::AppError;

const MAX_SLUG_LEN: usize = 80;
const MAX_SUFFIX_PROBES: u32 = 50;

/// Derives a URL slug from a title: lowercase, alphanumeric runs joined
/// by `-`, truncated to 80 chars. Empty input falls back to "prompt".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "prompt".to_string()
    } else {
        slug
    }
}

/// Returns `base` if free, otherwise probes `base-2`, `base-3`, ... until
/// an unused slug is found.
pub async fn unique_slug(pool: &PgPool, base: &str) -> Result<String, AppError> {
    if !slug_taken(pool, base).await? {
        return Ok(base.to_string());
    }
    for n in 2..=MAX_SUFFIX_PROBES {
        let candidate = format!("{base}-{n}");
        if !slug_taken(pool, &candidate).await? {
            return Ok(candidate);
        }
    }
    Err(AppError::Conflict(format!(
        "Could not find a free slug for '{base}'"
    )))
}

async fn slug_taken(pool: &PgPool, slug: &str) -> Result<bool, AppError> {
    let taken: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM prompts WHERE slug = $1)")
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(taken)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_title() {
        assert_eq!(slugify("Summarize a Meeting"), "summarize-a-meeting");
    }

    #[test]
    fn test_punctuation_collapses_to_single_dash() {
        assert_eq!(slugify("SQL -> JSON (fast!)"), "sql-json-fast");
    }

    #[test]
    fn test_leading_and_trailing_junk_trimmed() {
        assert_eq!(slugify("  ** Hello **  "), "hello");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(slugify("Résumé über prompt"), "r-sum-ber-prompt");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(slugify("!!!"), "prompt");
        assert_eq!(slugify(""), "prompt");
    }

    #[test]
    fn test_truncated_to_80_without_trailing_dash() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= 80);
        assert!(!slug.ends_with('-'));
    }
}
