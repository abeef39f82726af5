//! Element queries for candidate discovery
//!
//! An [`ElementQuery`] is a parsed CSS selector group. Hosts built on
//! `scraper` match it directly; other hosts can render their elements into
//! a fragment and select from that.

use scraper::{ElementRef, Selector};

use crate::{Error, Result};

/// Anchors whose href carries a fragment marker
pub const FRAGMENT_ANCHORS: &str = r##"a[href*="#"]"##;

/// A parsed element query
#[derive(Debug, Clone)]
pub struct ElementQuery {
    source: String,
    selector: Selector,
}

impl ElementQuery {
    pub fn fragment_anchors() -> Self {
        Self::parse(FRAGMENT_ANCHORS)
            .unwrap_or_else(|err| panic!("invalid built-in selector {FRAGMENT_ANCHORS}: {err}"))
    }

    pub fn parse(source: &str) -> Result<Self> {
        let selector = Selector::parse(source)
            .map_err(|err| Error::Selector(format!("{source}: {err}")))?;

        Ok(Self {
            source: source.trim().to_string(),
            selector,
        })
    }

    /// The selector text this query was parsed from
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        self.selector.matches(element)
    }
}

impl PartialEq for ElementQuery {
    fn eq(&self, other: &Self) -> bool {
        self.selector == other.selector
    }
}

impl Eq for ElementQuery {}

impl Default for ElementQuery {
    fn default() -> Self {
        Self::fragment_anchors()
    }
}

impl std::fmt::Display for ElementQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for ElementQuery {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
