pub mod config;
pub mod enhance;
pub mod inspect;

use std::path::Path;

use anyhow::{Context, Result};
use url::Url;

use anchorscroll_core::{AppConfig, PageFetcher};

/// Load the page HTML from `input`, or fetch it from `url` when no file is given
///
/// The returned URL is the page's location: `url` itself for a local file,
/// or the final URL after redirects for a fetched page.
pub async fn load_page(
    config: &AppConfig,
    url: &str,
    input: Option<&Path>,
) -> Result<(Url, String)> {
    let (page_url, html) = match input {
        Some(path) => {
            let page_url = Url::parse(url).with_context(|| format!("Invalid page URL: {}", url))?;
            let html = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (page_url, html)
        }
        None => PageFetcher::new(config)?.fetch(url).await?,
    };
    tracing::debug!(
        bytes = html.len(),
        from_file = input.is_some(),
        location = %page_url,
        "Loaded page"
    );

    Ok((page_url, html))
}
