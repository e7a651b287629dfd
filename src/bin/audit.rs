use anyhow::{Context, Result};

use nba_daily::augment;
use nba_daily::config::{self, AppConfig};
use nba_daily::gemini::{GeminiClient, GenerateRequest, MODEL_TIERS};
use nba_daily::report;

fn main() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    if let Err(err) = run() {
        eprintln!("[ERROR] {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = AppConfig::from_env()?;
    let picks = report::read_picks(&config.picks_path)?;
    if picks.trim().is_empty() {
        anyhow::bail!("no picks to audit in {}", config.picks_path.display());
    }

    let today = config::eastern_today().format("%Y-%m-%d").to_string();
    let request = GenerateRequest {
        prompt: augment::build_audit_prompt(&today, &picks),
        enable_search: true,
    };

    let client = GeminiClient::new(config.api_key.clone());
    let verdict = augment::generate_validated(&client, MODEL_TIERS, &request, |reply| {
        let trimmed = reply.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
    .context("all model tiers failed, no audit written")?;

    let header = format!("--- PICKS AUDIT ({today}) ---");
    report::write_text_report(&config.audit_report_path, &header, &verdict)?;
    println!(
        "[INFO] audit written to {}",
        config.audit_report_path.display()
    );

    Ok(())
}
