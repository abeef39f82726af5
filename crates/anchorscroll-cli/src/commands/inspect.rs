use std::path::Path;

use anyhow::Result;

use anchorscroll_core::{inspect_page, AppConfig};

pub async fn run(config: &AppConfig, url: &str, input: Option<&Path>, json: bool) -> Result<()> {
    let (page_url, html) = super::load_page(config, url, input).await?;

    let verdicts = inspect_page(&html, &page_url, config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&verdicts)?);
        return Ok(());
    }

    if verdicts.is_empty() {
        println!("No fragment links found on {}", page_url);
        return Ok(());
    }

    let same_page = verdicts.iter().filter(|v| v.same_page).count();
    println!(
        "Fragment links on {} ({} same-page of {}):\n",
        page_url,
        same_page,
        verdicts.len()
    );

    for verdict in &verdicts {
        let mark = if verdict.same_page { "+" } else { "-" };
        println!("  {} {}", mark, verdict.href);
        match &verdict.resolved {
            Some(resolved) => println!("    -> {}", resolved),
            None => println!("    -> (unresolvable)"),
        }
    }

    Ok(())
}
