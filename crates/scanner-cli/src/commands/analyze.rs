use anyhow::{Context, Result, bail};
use scanner_core::event::{EventChannel, HistoryEvent};
use scanner_core::history::SavedAnalysisRecord;
use scanner_core::session::{SessionOrchestrator, SessionState};
use scanner_infrastructure::{BroadcastEventChannel, MemoryTabStorage, StorageHistoryStore};
use scanner_interaction::HttpAnalysisClient;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub struct AnalyzeArgs {
    pub title: String,
    pub industry: String,
    pub job_description: String,
    pub email: Option<String>,
    pub manual_retries: u32,
}

/// Picks the description from the inline flag or reads it from a file.
pub fn read_description(inline: Option<String>, file: Option<&Path>) -> Result<String> {
    match (inline, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read job description from {}", path.display())),
        (None, None) => bail!("Provide --description or --description-file"),
    }
}

pub async fn run(client: HttpAnalysisClient, args: AnalyzeArgs) -> Result<()> {
    let events = Arc::new(BroadcastEventChannel::new());
    events.subscribe(Box::new(|event: HistoryEvent| {
        tracing::debug!(event = event.name(), "History changed");
    }));

    let history = Arc::new(StorageHistoryStore::new(
        Arc::new(MemoryTabStorage::new()),
        events,
    ));
    let orchestrator = Arc::new(SessionOrchestrator::new(Arc::new(client), history));

    let session_id = orchestrator.submit(&args.job_description, &args.industry, &args.title)?;
    println!("🔎 Analyzing \"{}\" ({})", args.title.trim(), session_id);

    let mut retries_left = args.manual_retries;
    loop {
        match orchestrator.submit_email(args.email.clone()).await? {
            SessionState::Results { record } => {
                print_record(&record)?;
                return Ok(());
            }
            SessionState::Error { message, .. } if retries_left > 0 => {
                retries_left -= 1;
                eprintln!("⚠️  {} (retrying, {} left)", message, retries_left);
                orchestrator.retry()?;
            }
            SessionState::Error { message, .. } => bail!("Analysis failed: {}", message),
            other => bail!("Analysis ended in unexpected state: {}", other.name()),
        }
    }
}

fn print_record(record: &SavedAnalysisRecord) -> Result<()> {
    let summary = &record.analysis.executive_summary;
    println!("✅ {} [{}]", record.title, record.industry);
    if let Some(savings) = summary.get("total_annual_savings") {
        println!("   Annual savings:        {}", savings);
    }
    if let Some(potential) = summary.get("automation_potential_percentage") {
        println!("   Automation potential:  {}%", potential);
    }
    if let Some(payback) = summary.get("payback_period_months") {
        println!("   Payback period:        {} months", payback);
    }
    println!(
        "   Saved as {} ({})",
        record.id,
        record.age_label(chrono::Utc::now())
    );
    println!();
    println!("{}", serde_json::to_string_pretty(&record.analysis)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_inline_description_wins() {
        let text = read_description(Some("inline".to_string()), None).unwrap();
        assert_eq!(text, "inline");
    }

    #[test]
    fn test_description_read_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("job.txt");
        fs::write(&path, "Coordinates shipments and reconciles invoices.").unwrap();

        let text = read_description(None, Some(&path)).unwrap();
        assert_eq!(text, "Coordinates shipments and reconciles invoices.");
    }

    #[test]
    fn test_missing_file_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_description(None, Some(&temp_dir.path().join("nope.txt"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read job description"));
    }
}
