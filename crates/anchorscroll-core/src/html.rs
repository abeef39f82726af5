//! scraper-backed document host
//!
//! Parses a page into a [`scraper::Html`] tree so the enhancer can mark
//! anchors server-side, then serializes the result back to HTML.

use std::collections::HashSet;

use ego_tree::NodeId;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use scraper::node::{Element, Text};
use scraper::{ElementRef, Html, Node};

use crate::host::{Capabilities, Capability, Document, ElementQuery};
use crate::Result;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Attribute that tags the injected bootstrap `<script>`
pub const BOOTSTRAP_ATTRIBUTE: &str = "data-anchorscroll";
const BOOTSTRAP_VALUE: &str = "bootstrap";

/// A parsed HTML page
pub struct HtmlDocument {
    html: Html,
    disabled: HashSet<Capability>,
}

impl HtmlDocument {
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        tracing::trace!(parse_errors = html.errors.len(), "Parsed HTML document");

        Self {
            html,
            disabled: HashSet::new(),
        }
    }

    /// Emulate a host that lacks `capability`
    pub fn without_capability(mut self, capability: Capability) -> Self {
        self.disabled.insert(capability);
        self
    }

    /// Serialize the whole document, doctype included
    pub fn to_html(&self) -> Result<String> {
        let mut bytes = Vec::new();
        serialize(&mut bytes, &self.html, SerializeOpts::default())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Whether a previous run already appended the bootstrap `<script>`
    pub fn has_bootstrap_script(&self) -> bool {
        self.elements().any(|element| {
            is_html_element(&element, "script")
                && null_namespace_attr(element.value(), BOOTSTRAP_ATTRIBUTE).is_some()
        })
    }

    /// Append the tagged bootstrap `<script>` as the last child of `<body>`
    ///
    /// Returns `false` if the document has no body.
    pub fn append_body_script(&mut self, source: &str) -> bool {
        let Some(body) = self.first_html_element("body") else {
            return false;
        };
        let Some(mut body) = self.html.tree.get_mut(body) else {
            return false;
        };

        let script = Element::new(
            html_name("script"),
            vec![Attribute {
                name: attribute_name(BOOTSTRAP_ATTRIBUTE),
                value: StrTendril::from_slice(BOOTSTRAP_VALUE),
            }],
        );
        body.append(Node::Element(script)).append(Node::Text(Text {
            text: StrTendril::from_slice(source),
        }));
        true
    }

    fn first_html_element(&self, local: &str) -> Option<NodeId> {
        self.elements()
            .find(|element| is_html_element(element, local))
            .map(|element| element.id())
    }

    /// Every element in tree order
    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html.tree.root().descendants().filter_map(ElementRef::wrap)
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("elements", &self.elements().count())
            .field("disabled", &self.disabled)
            .finish()
    }
}

impl Capabilities for HtmlDocument {
    fn supports(&self, capability: Capability) -> bool {
        !self.disabled.contains(&capability)
    }
}

impl Document for HtmlDocument {
    type Element = NodeId;

    fn query_all(&self, query: &ElementQuery) -> Vec<NodeId> {
        self.elements()
            .filter(|element| query.matches(element))
            .map(|element| element.id())
            .collect()
    }

    fn attribute(&self, element: &NodeId, name: &str) -> Option<String> {
        let node = self.html.tree.get(*element)?;
        let element = node.value().as_element()?;
        null_namespace_attr(element, name).map(str::to_string)
    }

    fn set_attribute(&mut self, element: &NodeId, name: &str, value: &str) {
        let Some(mut node) = self.html.tree.get_mut(*element) else {
            return;
        };
        let Node::Element(element) = node.value() else {
            return;
        };

        // scraper keeps attributes sorted by name for binary-search lookups
        let name = attribute_name(name);
        match element.attrs.binary_search_by(|(key, _)| key.cmp(&name)) {
            Ok(index) => element.attrs[index].1 = StrTendril::from_slice(value),
            Err(index) => element
                .attrs
                .insert(index, (name, StrTendril::from_slice(value))),
        }
    }

    fn base_href(&self) -> Option<String> {
        self.elements()
            .filter(|element| is_html_element(element, "base"))
            .find_map(|element| null_namespace_attr(element.value(), "href").map(str::to_string))
    }
}

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

fn attribute_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local.to_ascii_lowercase()))
}

fn is_html_element(element: &ElementRef<'_>, local: &str) -> bool {
    let name = &element.value().name;
    &*name.ns == HTML_NAMESPACE && &*name.local == local
}

/// Attribute lookup that ignores namespaced attributes such as `xlink:href`
fn null_namespace_attr<'a>(element: &'a Element, name: &str) -> Option<&'a str> {
    element
        .attrs
        .iter()
        .find(|(key, _)| key.ns.is_empty() && key.local.as_ref().eq_ignore_ascii_case(name))
        .map(|(_, value)| &**value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BootstrapScript;
    use crate::enhancer::Enhancer;
    use crate::host::PageLocation;

    const PAGE: &str = r##"<!DOCTYPE html>
<html><head><title>Docs</title></head>
<body>
<nav>
  <a href="#intro">Intro</a>
  <a href="/page#usage">Usage</a>
  <a href="https://example.com/page#faq">FAQ</a>
  <a href="https://other.com/page#intro">Elsewhere</a>
  <a href="https://example.com/other#intro">Other page</a>
  <a href="https://example.com/page">No fragment</a>
</nav>
<h2 id="intro">Intro</h2>
</body></html>"##;

    fn location() -> PageLocation {
        PageLocation::parse("https://example.com/page").unwrap()
    }

    fn marked(doc: &HtmlDocument) -> Vec<String> {
        doc.query_all(&ElementQuery::parse("a[data-scroll]").unwrap())
            .iter()
            .filter_map(|a| doc.attribute(a, "href"))
            .collect()
    }

    #[test]
    fn test_query_in_document_order() {
        let doc = HtmlDocument::parse(PAGE);
        let anchors = doc.query_all(&ElementQuery::fragment_anchors());
        let hrefs: Vec<_> = anchors.iter().filter_map(|a| doc.attribute(a, "href")).collect();
        assert_eq!(
            hrefs,
            vec![
                "#intro",
                "/page#usage",
                "https://example.com/page#faq",
                "https://other.com/page#intro",
                "https://example.com/other#intro",
            ]
        );
    }

    #[test]
    fn test_scoped_query() {
        let doc = HtmlDocument::parse(
            r##"<body><nav><a href="#a">A</a></nav><main><a href="#b">B</a></main></body>"##,
        );
        let anchors = doc.query_all(&ElementQuery::parse(r##"main a[href*="#"]"##).unwrap());
        let hrefs: Vec<_> = anchors.iter().filter_map(|a| doc.attribute(a, "href")).collect();
        assert_eq!(hrefs, vec!["#b"]);
    }

    #[test]
    fn test_enhance_html_document() {
        let mut doc = HtmlDocument::parse(PAGE);
        let mut engine = BootstrapScript::default();

        let outcome = Enhancer::with_defaults().run(&mut doc, &location(), &mut engine);

        assert_eq!(outcome.report().map(|r| (r.candidates, r.marked)), Some((5, 3)));
        assert_eq!(
            marked(&doc),
            vec!["#intro", "/page#usage", "https://example.com/page#faq"]
        );
        assert_eq!(engine.activations(), 1);

        let html = doc.to_html().unwrap();
        assert!(html.contains(r##"<a data-scroll="true" href="#intro">"##));
        assert!(html.contains(r##"<a href="https://other.com/page#intro">"##));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_svg_xlink_href_is_not_a_candidate() {
        let mut doc = HtmlDocument::parse(
            r##"<body>
<svg><a xlink:href="#shape"><circle r="4"></circle></a></svg>
<a href="#top">Top</a>
</body>"##,
        );
        let before = doc.to_html().unwrap();
        assert!(before.contains(r##"xlink:href="#shape""##));

        let mut engine = BootstrapScript::default();
        let outcome = Enhancer::with_defaults().run(&mut doc, &location(), &mut engine);

        assert_eq!(outcome.report().map(|r| (r.candidates, r.marked)), Some((1, 1)));
        assert_eq!(marked(&doc), vec!["#top"]);
        assert_eq!(doc.to_html().unwrap().matches("data-scroll").count(), 1);
    }

    #[test]
    fn test_attribute_ignores_namespaced_attributes() {
        let doc = HtmlDocument::parse(r##"<svg><a xlink:href="#shape"></a></svg>"##);
        let svg_anchor = doc.query_all(&ElementQuery::parse("a").unwrap()).remove(0);
        assert_eq!(doc.attribute(&svg_anchor, "href"), None);
    }

    #[test]
    fn test_disabled_capability_leaves_html_identical() {
        let mut doc = HtmlDocument::parse(PAGE).without_capability(Capability::EventListeners);
        let before = doc.to_html().unwrap();
        let mut engine = BootstrapScript::default();

        let outcome = Enhancer::with_defaults().run(&mut doc, &location(), &mut engine);

        assert!(!outcome.is_enhanced());
        assert_eq!(doc.to_html().unwrap(), before);
        assert!(!engine.is_activated());
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let mut doc = HtmlDocument::parse(PAGE);
        let mut enhancer = Enhancer::with_defaults();
        let mut engine = BootstrapScript::default();

        enhancer.run(&mut doc, &location(), &mut engine);
        let first = doc.to_html().unwrap();
        enhancer.run(&mut doc, &location(), &mut engine);

        assert_eq!(doc.to_html().unwrap(), first);
        assert_eq!(first.matches("data-scroll").count(), 3);
    }

    #[test]
    fn test_set_attribute_replaces_existing() {
        let mut doc = HtmlDocument::parse(r##"<a href="#x" data-scroll="false">x</a>"##);
        let anchor = doc.query_all(&ElementQuery::fragment_anchors()).remove(0);

        doc.set_attribute(&anchor, "data-scroll", "true");

        assert_eq!(doc.attribute(&anchor, "data-scroll").as_deref(), Some("true"));
        assert_eq!(doc.to_html().unwrap().matches("data-scroll").count(), 1);
    }

    #[test]
    fn test_set_attribute_visible_to_selectors() {
        let mut doc = HtmlDocument::parse(r##"<a href="#x">x</a>"##);
        let anchor = doc.query_all(&ElementQuery::fragment_anchors()).remove(0);

        doc.set_attribute(&anchor, "Data-Smooth", "1");

        let query = ElementQuery::parse(r#"a[data-smooth="1"]"#).unwrap();
        assert_eq!(doc.query_all(&query), vec![anchor]);
    }

    #[test]
    fn test_base_href() {
        let doc =
            HtmlDocument::parse(r#"<html><head><base href="/docs/"></head><body></body></html>"#);
        assert_eq!(doc.base_href().as_deref(), Some("/docs/"));
        assert_eq!(HtmlDocument::parse(PAGE).base_href(), None);
    }

    #[test]
    fn test_append_body_script() {
        let mut doc = HtmlDocument::parse(PAGE);
        assert!(!doc.has_bootstrap_script());
        assert!(doc.append_body_script("smoothScroll.init();"));

        let html = doc.to_html().unwrap();
        assert!(html.contains(
            r#"<script data-anchorscroll="bootstrap">smoothScroll.init();</script></body>"#
        ));
        assert!(doc.has_bootstrap_script());
    }

    #[test]
    fn test_bootstrap_script_survives_reparse() {
        let mut doc = HtmlDocument::parse(PAGE);
        doc.append_body_script("smoothScroll.init();");

        let reparsed = HtmlDocument::parse(&doc.to_html().unwrap());
        assert!(reparsed.has_bootstrap_script());
        let unrelated = HtmlDocument::parse("<body><script>other();</script></body>");
        assert!(!unrelated.has_bootstrap_script());
    }

    #[test]
    fn test_fragment_without_body_gets_one() {
        // The parser synthesizes html/head/body for bare fragments
        let mut doc = HtmlDocument::parse(r##"<a href="#top">Top</a>"##);
        assert!(doc.append_body_script("x();"));
    }
}
