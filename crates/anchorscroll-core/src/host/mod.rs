//! Host abstractions the enhancer runs against
//!
//! The enhancer never touches a global page. It receives a document handle,
//! a location handle and a scroll engine, so a browser binding, the
//! scraper-backed [`crate::html::HtmlDocument`] or a test fake can all
//! drive the same classification logic.

mod location;
mod query;

pub use location::{Location, PageLocation};
pub use query::{ElementQuery, FRAGMENT_ANCHORS};

/// A host primitive the enhancer depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Structured element querying (`querySelectorAll`)
    ElementQuery,
    /// Event listener registration (`addEventListener`)
    EventListeners,
}

impl Capability {
    /// Every capability the enhancer requires, in check order
    pub const REQUIRED: [Capability; 2] = [Capability::ElementQuery, Capability::EventListeners];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ElementQuery => "element-query",
            Capability::EventListeners => "event-listeners",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability detection for a host environment
pub trait Capabilities {
    fn supports(&self, capability: Capability) -> bool;

    /// Required capabilities this host lacks
    fn missing_capabilities(&self) -> Vec<Capability> {
        Capability::REQUIRED
            .into_iter()
            .filter(|capability| !self.supports(*capability))
            .collect()
    }
}

/// A document-like host the enhancer can scan and mark
pub trait Document: Capabilities {
    /// Handle to an element inside this document
    type Element;

    /// All elements matching `query`, in document order
    fn query_all(&self, query: &ElementQuery) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    /// Set `name` to `value`, replacing any existing value
    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str);

    /// Raw href of the document's `<base>` element, if the host tracks one
    fn base_href(&self) -> Option<String> {
        None
    }
}
