use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::records::{GameStatus, MatchRecord, Winner};

pub fn read_picks(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("failed reading picks file {}", path.display()))
}

/// Full overwrite each run; the report is a snapshot, not a log.
pub fn write_text_report(path: &Path, header: &str, body: &str) -> Result<()> {
    let mut out = String::with_capacity(header.len() + body.len() + 8);
    out.push_str(header);
    out.push_str("\n\n");
    out.push_str(body);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("failed writing report {}", path.display()))
}

/// Plain-text rendition of the slate for the backup report file.
pub fn schedule_report(records: &[MatchRecord]) -> String {
    if records.is_empty() {
        return "No games scheduled today.\n".to_string();
    }
    let mut out = String::with_capacity(records.len() * 120);
    for record in records {
        out.push_str(&format!(
            "{} ({}) @ {} ({})",
            record.away.abbrev, record.away.record, record.home.abbrev, record.home.record
        ));
        match record.status {
            GameStatus::Final => {
                if let (Some(home), Some(away)) = (record.home.score, record.away.score) {
                    out.push_str(&format!(" | final {away}-{home}"));
                }
            }
            GameStatus::InProgress => out.push_str(" | in progress"),
            GameStatus::Scheduled => out.push_str(&format!(" | {}", record.start_display)),
        }
        if let Some(prediction) = &record.prediction {
            let pick = match prediction.winner {
                Winner::Home => &record.home.abbrev,
                Winner::Away => &record.away.abbrev,
            };
            out.push_str(&format!(" | pick {pick}"));
            match prediction.correct {
                Some(true) => out.push_str(" (hit)"),
                Some(false) => out.push_str(" (miss)"),
                None => {}
            }
        }
        out.push('\n');
        if let Some(narrative) = &record.narrative {
            if !narrative.bet.trim().is_empty() {
                out.push_str(&format!("    bet: {}\n", narrative.bet.trim()));
            }
        }
    }
    out
}
