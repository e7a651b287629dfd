use std::fs;

use anyhow::{Context, Result};

use nba_daily::augment;
use nba_daily::config::{self, AppConfig};
use nba_daily::gemini::{GeminiClient, MODEL_TIERS};
use nba_daily::predict;
use nba_daily::render;
use nba_daily::report;
use nba_daily::schedule_fetch;

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
    let date_label = config::date_label(&config.schedule_date);

    // A failed fetch aborts before anything is written, so the previously
    // published page stays up.
    let mut records = schedule_fetch::fetch_schedule(&config.schedule_date)
        .context("scoreboard fetch failed, keeping the published page")?;
    predict::annotate(&mut records);
    println!("[INFO] {} games on {}", records.len(), date_label);

    let client = GeminiClient::new(config.api_key.clone());
    let records = augment::augment_schedule(&client, MODEL_TIERS, &records);

    let header = format!("--- NBA DAILY REPORT ({date_label}) ---");
    report::write_text_report(
        &config.report_path,
        &header,
        &report::schedule_report(&records),
    )?;
    println!("[INFO] report written to {}", config.report_path.display());

    let fragment = render::render_fragment(&records);
    let html = match fs::read_to_string(&config.output_html) {
        Ok(existing) => render::inject_fragment(&existing, &fragment),
        Err(_) => render::render_page(&records, &date_label),
    };
    // The text report already landed; a page failure degrades instead of
    // failing the run.
    match fs::write(&config.output_html, html) {
        Ok(()) => println!("[INFO] published {}", config.output_html.display()),
        Err(err) => eprintln!(
            "[WARN] failed writing {}: {err}",
            config.output_html.display()
        ),
    }

    Ok(())
}
