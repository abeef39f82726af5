//! Progressive anchor-scroll enhancement
//!
//! One run does four things, in order:
//! 1. checks that the host can query elements and register listeners,
//!    and otherwise leaves the page untouched
//! 2. finds anchors whose href contains a fragment marker
//! 3. marks those that point at the current page
//! 4. starts the scroll engine exactly once
//!
//! Anchors added to the document after a run are not seen by that run.

mod matcher;

use serde::Serialize;

use crate::config::EnhancerConfig;
use crate::engine::ScrollEngine;
use crate::host::{Capability, Document, ElementQuery, Location};
use crate::{Error, Result};

pub use matcher::{
    discover_candidates, document_base, resolve_href, AnchorCandidate, SamePageMatcher,
};

/// Attribute that flags an anchor for the scroll engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub attribute: String,
    pub value: String,
}

impl Marker {
    /// Build a marker, rejecting names that cannot be written as an HTML attribute
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let attribute = attribute.into();
        let malformed = attribute.is_empty()
            || attribute.chars().any(|c| {
                c.is_whitespace() || c.is_control() || matches!(c, '"' | '\'' | '>' | '/' | '=')
            });
        if malformed {
            return Err(Error::Config(format!("invalid marker attribute name {attribute:?}")));
        }

        Ok(Self {
            attribute,
            value: value.into(),
        })
    }
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            attribute: "data-scroll".to_string(),
            value: "true".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EnhancerOptions {
    pub marker: Marker,
    pub query: ElementQuery,
}

impl EnhancerOptions {
    pub fn from_config(config: &EnhancerConfig) -> Result<Self> {
        Ok(Self {
            marker: Marker::new(config.marker_attribute.as_str(), config.marker_value.as_str())?,
            query: ElementQuery::parse(&config.candidate_selector)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnhancerState {
    Uninitialized,
    Initialized,
    Skipped,
}

/// Why a run left the page alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedEnvironment { missing: Vec<Capability> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EnhanceReport {
    /// Anchors matched by the candidate query
    pub candidates: usize,
    /// Candidates that carry the marker after the run
    pub marked: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnhanceOutcome {
    Skipped(SkipReason),
    Enhanced(EnhanceReport),
}

impl EnhanceOutcome {
    pub fn is_enhanced(&self) -> bool {
        matches!(self, EnhanceOutcome::Enhanced(_))
    }

    pub fn report(&self) -> Option<&EnhanceReport> {
        match self {
            EnhanceOutcome::Enhanced(report) => Some(report),
            EnhanceOutcome::Skipped(_) => None,
        }
    }
}

/// Per-anchor verdict, for inspection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorClassification {
    pub href: String,
    pub resolved: Option<String>,
    pub same_page: bool,
}

#[derive(Debug, Clone)]
pub struct Enhancer {
    options: EnhancerOptions,
    state: EnhancerState,
}

impl Enhancer {
    pub fn new(options: EnhancerOptions) -> Self {
        Self {
            options,
            state: EnhancerState::Uninitialized,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(EnhancerOptions::default())
    }

    pub fn options(&self) -> &EnhancerOptions {
        &self.options
    }

    pub fn state(&self) -> EnhancerState {
        self.state
    }

    /// Run the enhancement once against the given hosts
    ///
    /// Never fails. A host missing a required capability produces
    /// [`EnhanceOutcome::Skipped`] with no mutation and no engine call.
    /// Running again re-scans and re-marks; marking is idempotent.
    pub fn run<D, L, E>(
        &mut self,
        document: &mut D,
        location: &L,
        engine: &mut E,
    ) -> EnhanceOutcome
    where
        D: Document + ?Sized,
        L: Location + ?Sized,
        E: ScrollEngine + ?Sized,
    {
        let missing = document.missing_capabilities();
        if !missing.is_empty() {
            self.state = EnhancerState::Skipped;
            return EnhanceOutcome::Skipped(SkipReason::UnsupportedEnvironment { missing });
        }

        let matcher = SamePageMatcher::for_location(location);
        let candidates = discover_candidates(&*document, location, &self.options.query);
        let marker = &self.options.marker;

        let mut marked = 0;
        for candidate in &candidates {
            let same_page = candidate
                .resolved
                .as_ref()
                .is_some_and(|url| matcher.matches(url));
            if same_page {
                document.set_attribute(&candidate.element, &marker.attribute, &marker.value);
                marked += 1;
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            marked,
            hostname = location.hostname(),
            pathname = location.pathname(),
            "Marked same-page anchors"
        );

        engine.initialize();
        self.state = EnhancerState::Initialized;

        EnhanceOutcome::Enhanced(EnhanceReport {
            candidates: candidates.len(),
            marked,
        })
    }

    /// Classify every candidate anchor without touching the document
    pub fn classify<D, L>(&self, document: &D, location: &L) -> Vec<AnchorClassification>
    where
        D: Document + ?Sized,
        L: Location + ?Sized,
    {
        let matcher = SamePageMatcher::for_location(location);

        discover_candidates(document, location, &self.options.query)
            .into_iter()
            .map(|candidate| AnchorClassification {
                same_page: candidate
                    .resolved
                    .as_ref()
                    .is_some_and(|url| matcher.matches(url)),
                resolved: candidate.resolved.map(String::from),
                href: candidate.href,
            })
            .collect()
    }
}

impl Default for Enhancer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
