use url::Url;

use crate::config::AppConfig;
use crate::engine::BootstrapScript;
use crate::enhancer::{AnchorClassification, EnhanceOutcome, Enhancer, EnhancerOptions};
use crate::host::PageLocation;
use crate::html::HtmlDocument;
use crate::Result;

/// Result of enhancing one HTML page
#[derive(Debug, Clone)]
pub struct EnhancedPage {
    pub html: String,
    pub outcome: EnhanceOutcome,
    /// Whether this run appended the client bootstrap script to `<body>`
    ///
    /// `false` when injection is disabled, the run was skipped, the page has
    /// no body, or the page already carries the bootstrap script.
    pub bootstrap_injected: bool,
}

/// Parse `html` served at `page_url`, mark its same-page anchors and serialize it back
pub fn enhance_page(html: &str, page_url: &Url, config: &AppConfig) -> Result<EnhancedPage> {
    let options = EnhancerOptions::from_config(&config.enhancer)?;
    let location = PageLocation::new(page_url.clone());
    let mut document = HtmlDocument::parse(html);
    let mut engine = BootstrapScript::new(config.engine.init_call.as_str());

    let outcome = Enhancer::new(options).run(&mut document, &location, &mut engine);

    let mut bootstrap_injected = false;
    if config.engine.inject_bootstrap {
        if let Some(script) = engine.render() {
            if document.has_bootstrap_script() {
                tracing::debug!("Page already carries the bootstrap script");
            } else {
                bootstrap_injected = document.append_body_script(&script);
                if !bootstrap_injected {
                    tracing::warn!("Page has no <body>, skipping bootstrap script");
                }
            }
        }
    }

    Ok(EnhancedPage {
        html: document.to_html()?,
        outcome,
        bootstrap_injected,
    })
}

/// Classify the candidate anchors of `html` without modifying it
pub fn inspect_page(
    html: &str,
    page_url: &Url,
    config: &AppConfig,
) -> Result<Vec<AnchorClassification>> {
    let options = EnhancerOptions::from_config(&config.enhancer)?;
    let location = PageLocation::new(page_url.clone());
    let document = HtmlDocument::parse(html);

    Ok(Enhancer::new(options).classify(&document, &location))
}
