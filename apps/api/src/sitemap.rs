//! SEO sitemap: the site root, category pages, and published prompt pages
//! rendered as a sitemaps.org 0.9 urlset.

use axum::{extract::State, http::header, response::IntoResponse};
use chrono::NaiveDate;

use crate::errors::AppError;
use crate::state::AppState;

/// Sitemap protocol hard limit is 50k URLs per file; we stay well under.
const MAX_PROMPT_URLS: i64 = 10_000;

pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
}

/// GET /sitemap.xml
pub async fn handle_sitemap(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let base = &state.config.site_base_url;

    let mut entries = vec![SitemapEntry {
        loc: format!("{base}/"),
        lastmod: None,
    }];

    let categories: Vec<(String,)> = sqlx::query_as("SELECT slug FROM categories ORDER BY slug")
        .fetch_all(&state.db)
        .await?;
    for (slug,) in categories {
        entries.push(SitemapEntry {
            loc: format!("{base}/category/{slug}"),
            lastmod: None,
        });
    }

    let prompts: Vec<(String, chrono::DateTime<chrono::Utc>)> = sqlx::query_as(
        "SELECT slug, updated_at FROM prompts WHERE is_published \
         ORDER BY created_at DESC LIMIT $1",
    )
    .bind(MAX_PROMPT_URLS)
    .fetch_all(&state.db)
    .await?;
    for (slug, updated_at) in prompts {
        entries.push(SitemapEntry {
            loc: format!("{base}/p/{slug}"),
            lastmod: Some(updated_at.date_naive()),
        });
    }

    let xml = render_sitemap(&entries);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::with_capacity(entries.len() * 96 + 128);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');

    for entry in entries {
        xml.push_str("  <url><loc>");
        xml.push_str(&xml_escape(&entry.loc));
        xml.push_str("</loc>");
        if let Some(lastmod) = entry.lastmod {
            xml.push_str("<lastmod>");
            xml.push_str(&lastmod.format("%Y-%m-%d").to_string());
            xml.push_str("</lastmod>");
        }
        xml.push_str("</url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escapes_url_metacharacters() {
        assert_eq!(xml_escape("/p/a&b<c>"), "/p/a&amp;b&lt;c&gt;");
        assert_eq!(xml_escape(r#"'q'"r""#), "&apos;q&apos;&quot;r&quot;");
    }

    #[test]
    fn test_renders_urlset_with_lastmod() {
        let entries = vec![
            SitemapEntry {
                loc: "https://x.io/".to_string(),
                lastmod: None,
            },
            SitemapEntry {
                loc: "https://x.io/p/sql-helper".to_string(),
                lastmod: NaiveDate::from_ymd_opt(2024, 6, 1),
            },
        ];
        let xml = render_sitemap(&entries);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<lastmod>2024-06-01</lastmod>"));
        assert!(xml.ends_with("</urlset>\n"));
    }

    #[test]
    fn test_root_entry_has_no_lastmod() {
        let entries = vec![SitemapEntry {
            loc: "https://x.io/".to_string(),
            lastmod: None,
        }];
        assert!(!render_sitemap(&entries).contains("<lastmod>"));
    }
}
