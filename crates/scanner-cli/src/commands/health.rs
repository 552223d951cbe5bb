use anyhow::{Context, Result};
use scanner_core::analysis::AnalysisClient;
use scanner_interaction::HttpAnalysisClient;

pub async fn check(client: &HttpAnalysisClient) -> Result<()> {
    let url = client.config().api_base_url.clone();
    let health = client
        .health_check()
        .await
        .with_context(|| format!("Analysis service at {} is not healthy", url))?;

    println!("✅ {} ({}): {}", url, health.status, health.message);
    Ok(())
}
