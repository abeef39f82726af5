use url::Url;

use crate::host::{Document, ElementQuery, Location};

/// Same-page test derived from the current location
///
/// A URL matches when its hostname and path equal the page's. The fragment
/// is ignored, as are port and query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamePageMatcher {
    hostname: String,
    pathname: String,
}

impl SamePageMatcher {
    pub fn new(hostname: &str, pathname: &str) -> Self {
        let pathname = if pathname.is_empty() { "/" } else { pathname };
        Self {
            hostname: hostname.to_ascii_lowercase(),
            pathname: pathname.to_string(),
        }
    }

    pub fn for_location<L: Location + ?Sized>(location: &L) -> Self {
        Self::new(location.hostname(), location.pathname())
    }

    pub fn matches(&self, url: &Url) -> bool {
        url.host_str().unwrap_or("").eq_ignore_ascii_case(&self.hostname)
            && url.path() == self.pathname
    }
}

/// An anchor element with its href as written and as resolved
#[derive(Debug, Clone)]
pub struct AnchorCandidate<E> {
    pub element: E,
    pub href: String,
    /// `None` when the href cannot be resolved to an absolute URL
    pub resolved: Option<Url>,
}

/// Resolve `href` the way a browser computes `anchor.href`
pub fn resolve_href(href: &str, base: Option<&Url>) -> Option<Url> {
    Url::options().base_url(base).parse(href.trim()).ok()
}

/// Base URL for relative hrefs: the document's `<base href>` if any, else the location
pub fn document_base<D, L>(document: &D, location: &L) -> Option<Url>
where
    D: Document + ?Sized,
    L: Location + ?Sized,
{
    let page = Url::parse(location.href()).ok();
    document
        .base_href()
        .and_then(|href| resolve_href(&href, page.as_ref()))
        .or(page)
}

/// Enumerate anchors matching `query` and resolve their hrefs
pub fn discover_candidates<D, L>(
    document: &D,
    location: &L,
    query: &ElementQuery,
) -> Vec<AnchorCandidate<D::Element>>
where
    D: Document + ?Sized,
    L: Location + ?Sized,
{
    let base = document_base(document, location);

    document
        .query_all(query)
        .into_iter()
        .filter_map(|element| {
            let href = document.attribute(&element, "href")?;
            let resolved = resolve_href(&href, base.as_ref());
            Some(AnchorCandidate {
                element,
                href,
                resolved,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_same_page_relative_and_absolute() {
        let matcher = SamePageMatcher::new("example.com", "/page");
        for href in ["/page#section1", "https://example.com/page#section1", "#section1", "page#x"] {
            let url = resolve_href(href, Some(&page())).unwrap();
            assert!(matcher.matches(&url), "{href} should match");
        }
    }

    #[test]
    fn test_other_host_or_path() {
        let matcher = SamePageMatcher::new("example.com", "/page");
        for href in [
            "https://other.com/page#section1",
            "https://example.com/other#section1",
            "https://example.com/page2#section1",
            "https://example.com/page/#section1",
            "https://sub.example.com/page#section1",
        ] {
            let url = resolve_href(href, Some(&page())).unwrap();
            assert!(!matcher.matches(&url), "{href} should not match");
        }
    }

    #[test]
    fn test_port_and_query_ignored() {
        let matcher = SamePageMatcher::new("example.com", "/page");
        let url = resolve_href("https://example.com:8080/page?ref=nav#top", None).unwrap();
        assert!(matcher.matches(&url));
    }

    #[test]
    fn test_hostname_case_insensitive() {
        let matcher = SamePageMatcher::new("Example.COM", "/page");
        let url = resolve_href("HTTPS://EXAMPLE.com/page#a", None).unwrap();
        assert!(matcher.matches(&url));
    }

    #[test]
    fn test_empty_pathname_is_root() {
        let matcher = SamePageMatcher::new("example.com", "");
        let url = resolve_href("https://example.com#top", None).unwrap();
        assert!(matcher.matches(&url));
    }

    #[test]
    fn test_unresolvable_href() {
        assert!(resolve_href("#top", None).is_none());
        assert!(resolve_href("http://[::1#x", Some(&page())).is_none());
    }

    #[test]
    fn test_placeholder_href_on_other_page() {
        // A bare "#" resolves to the current page; on another base it does not match
        let matcher = SamePageMatcher::new("example.com", "/page");
        let other = Url::parse("https://example.com/elsewhere").unwrap();
        let url = resolve_href("#", Some(&other)).unwrap();
        assert!(!matcher.matches(&url));
    }
}
