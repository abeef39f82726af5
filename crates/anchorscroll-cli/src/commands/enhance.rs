use std::path::Path;

use anyhow::{Context, Result};

use anchorscroll_core::{enhance_page, AppConfig, EnhanceOutcome, SkipReason};

pub async fn run(
    config: &AppConfig,
    url: &str,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let (page_url, html) = super::load_page(config, url, input).await?;

    let page = enhance_page(&html, &page_url, config)?;

    match output {
        Some(path) => std::fs::write(path, &page.html)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", page.html),
    }

    match &page.outcome {
        EnhanceOutcome::Enhanced(report) => {
            eprintln!(
                "Marked {} of {} fragment links on {}",
                report.marked, report.candidates, page_url
            );
            if page.bootstrap_injected {
                eprintln!("Appended scroll engine bootstrap script");
            }
        }
        EnhanceOutcome::Skipped(SkipReason::UnsupportedEnvironment { missing }) => {
            let missing: Vec<_> = missing.iter().map(|c| c.as_str()).collect();
            eprintln!("Page left unchanged (missing: {})", missing.join(", "));
        }
    }

    Ok(())
}
