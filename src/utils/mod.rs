//! Utility functions and helpers.

pub mod http;

use scraper::Html;
use url::Url;

use crate::error::Result;

/// Resolve a resource path against a base URL.
///
/// The base is treated as a directory, so `http://host/app` + `a.json`
/// becomes `http://host/app/a.json`.
pub fn resource_url(base: &str, resource: &str) -> Result<Url> {
    let mut base = Url::parse(base)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(resource.trim_start_matches('/'))?)
}

/// Text content of a markup fragment, with tags dropped and whitespace collapsed.
///
/// Catalog fields such as majors embed `<p>` separators; this is the form
/// shown to users.
pub fn strip_markup(fragment: &str) -> String {
    if !fragment.contains('<') {
        return fragment.trim().to_string();
    }
    let parsed = Html::parse_fragment(fragment);
    let text: Vec<&str> = parsed.root_element().text().collect();
    text.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape text for inclusion in HTML content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_url() {
        assert_eq!(
            resource_url("http://localhost:5173", "schedules-majors.json")
                .unwrap()
                .as_str(),
            "http://localhost:5173/schedules-majors.json"
        );
        assert_eq!(
            resource_url("https://example.com/app", "/data.json")
                .unwrap()
                .as_str(),
            "https://example.com/app/data.json"
        );
        assert!(resource_url("not a url", "a.json").is_err());
    }

    #[test]
    fn test_strip_markup() {
        assert_eq!(strip_markup("교양<p>기초"), "교양 기초");
        assert_eq!(strip_markup("월1~2(A)<p>수3(B)"), "월1~2(A) 수3(B)");
        assert_eq!(strip_markup("  plain  "), "plain");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
