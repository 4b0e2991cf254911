use std::collections::HashSet;

use scraper::{ElementRef, Html};
use url::Url;

pub const DEFAULT_MAX_LINKS: usize = 5_000;

/// Collects the `href` of every anchor as an absolute `http(s)` URL.
///
/// Relative references are resolved against `base`; without a base they are
/// dropped. Fragments are stripped and duplicates removed, keeping first-seen
/// order. At most `max_links` URLs are returned.
pub fn extract_absolute_links(html: &str, base: Option<&Url>, max_links: usize) -> Vec<Url> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for node in document.root_element().descendants() {
        if links.len() >= max_links {
            break;
        }
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        if !element.value().name().eq_ignore_ascii_case("a") {
            continue;
        }
        let Some(url) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_url(href, base))
        else {
            continue;
        };
        if seen.insert(url.as_str().to_string()) {
            links.push(url);
        }
    }

    links
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") {
        return None;
    }
    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => base?.join(trimmed).ok()?,
        Err(_) => return None,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(html: &str, base: Option<&str>) -> Vec<String> {
        let base = base.map(|b| Url::parse(b).unwrap());
        extract_absolute_links(html, base.as_ref(), DEFAULT_MAX_LINKS)
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn resolves_relative_against_base() {
        let html = r#"<a href="/doc.pdf">x</a><a href="https://a.example/b.pdf">y</a>"#;
        assert_eq!(
            hrefs(html, Some("https://search.example/search?q=1")),
            vec!["https://search.example/doc.pdf", "https://a.example/b.pdf"]
        );
    }

    #[test]
    fn drops_relative_without_base() {
        assert!(hrefs(r#"<a href="doc.pdf">x</a>"#, None).is_empty());
    }

    #[test]
    fn skips_non_http_and_fragments_and_dedupes() {
        let html = r##"
            <a href="#top">top</a>
            <a href="javascript:void(0)">js</a>
            <a href="mailto:a@b.example">mail</a>
            <a href="ftp://files.example/x.pdf">ftp</a>
            <a href="https://a.example/x.pdf#page=2">one</a>
            <a href="https://a.example/x.pdf">again</a>
            <a>no href</a>
        "##;
        assert_eq!(hrefs(html, None), vec!["https://a.example/x.pdf"]);
    }

    #[test]
    fn respects_link_cap() {
        let html: String = (0..10)
            .map(|i| format!(r#"<a href="https://a.example/{i}.pdf">{i}</a>"#))
            .collect();
        let links = extract_absolute_links(&html, None, 3);
        assert_eq!(links.len(), 3);
    }
}
