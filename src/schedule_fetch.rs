use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::http_client::http_client;
use crate::records::{GameStatus, MatchRecord, TeamSide};
use crate::teams;

const SCOREBOARD_URL: &str =
    "https://site.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard";

// Display offset for US Eastern time. Fixed; DST drift is accepted.
const EASTERN_UTC_LAG_HOURS: i64 = 5;

/// Fetch one day's slate. `date` is `YYYYMMDD`. Any transport or top-level
/// shape failure is an error so the caller can abort without publishing.
pub fn fetch_schedule(date: &str) -> Result<Vec<MatchRecord>> {
    let client = http_client()?;
    let url = format!("{SCOREBOARD_URL}?dates={date}");
    let resp = client.get(&url).send().context("scoreboard request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading scoreboard body")?;
    if !status.is_success() {
        anyhow::bail!("scoreboard http {}: {}", status, body);
    }
    parse_scoreboard_json(&body)
}

#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    // Events stay opaque here so one malformed entry never sinks the batch.
    #[serde(default)]
    events: Vec<Value>,
}

/// Normalize a raw scoreboard document. Events that are missing their
/// competition or competitor substructure are skipped; upstream order is
/// preserved for the rest.
pub fn parse_scoreboard_json(raw: &str) -> Result<Vec<MatchRecord>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let data: ScoreboardResponse =
        serde_json::from_str(trimmed).context("invalid scoreboard json")?;
    Ok(data.events.iter().filter_map(normalize_event).collect())
}

fn normalize_event(event: &Value) -> Option<MatchRecord> {
    let competition = event.get("competitions")?.get(0)?;
    let competitors = competition.get("competitors")?.as_array()?;
    let home = competitors.iter().find(|c| role(c) == Some("home"))?;
    let away = competitors.iter().find(|c| role(c) == Some("away"))?;

    let status = parse_status(event.get("status"))?;
    let home = normalize_side(home, status)?;
    let away = normalize_side(away, status)?;

    let start_raw = pick_string(event, &["date"])
        .or_else(|| pick_string(competition, &["date"]))
        .unwrap_or_default();
    let start_display = eastern_display_time(&start_raw).unwrap_or(start_raw);

    let status_detail = event
        .get("status")
        .and_then(|s| s.get("type"))
        .and_then(|t| t.get("shortDetail"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| default_status_detail(status, &start_display));

    Some(MatchRecord {
        home,
        away,
        start_display,
        status,
        status_detail,
        prediction: None,
        narrative: None,
    })
}

fn role(competitor: &Value) -> Option<&str> {
    competitor.get("homeAway").and_then(|v| v.as_str())
}

fn parse_status(status: Option<&Value>) -> Option<GameStatus> {
    let state = status?
        .get("type")?
        .get("state")?
        .as_str()?
        .trim()
        .to_lowercase();
    match state.as_str() {
        "pre" => Some(GameStatus::Scheduled),
        "in" => Some(GameStatus::InProgress),
        "post" => Some(GameStatus::Final),
        _ => None,
    }
}

fn normalize_side(competitor: &Value, status: GameStatus) -> Option<TeamSide> {
    let team = competitor.get("team")?;
    let name = pick_string(team, &["displayName", "shortDisplayName", "name"])?;
    let abbrev = pick_string(team, &["abbreviation"]).unwrap_or_else(|| teams::abbreviate(&name));
    let logo = pick_string(team, &["logo"]).unwrap_or_else(|| teams::logo_url(&abbrev));
    let record = overall_record(competitor.get("records")).unwrap_or_else(|| "0-0".to_string());
    let score = if status == GameStatus::Scheduled {
        None
    } else {
        parse_score(competitor.get("score"))
    };

    Some(TeamSide {
        name,
        abbrev,
        logo,
        record,
        score,
    })
}

// The records array mixes overall/home/road splits; "total" is the overall one.
fn overall_record(records: Option<&Value>) -> Option<String> {
    let list = records?.as_array()?;
    let overall = list.iter().find(|r| {
        let kind = r.get("type").and_then(|v| v.as_str()).unwrap_or_default();
        let name = r.get("name").and_then(|v| v.as_str()).unwrap_or_default();
        kind == "total" || name.eq_ignore_ascii_case("overall")
    });
    let entry = overall.or_else(|| list.first())?;
    pick_string(entry, &["summary"])
}

fn parse_score(score: Option<&Value>) -> Option<u32> {
    match score? {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().map(|v| v as u32),
        _ => None,
    }
}

/// Scoreboard timestamps come as `2026-01-29T00:00Z` (seconds optional).
/// Shift to Eastern and format for display; unparseable input falls through
/// to the raw string at the call site.
fn eastern_display_time(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let parsed = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%MZ")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%SZ"))
        .ok()?;
    let local = parsed - ChronoDuration::hours(EASTERN_UTC_LAG_HOURS);
    Some(local.format("%-I:%M %p ET").to_string())
}

fn default_status_detail(status: GameStatus, start_display: &str) -> String {
    match status {
        GameStatus::Scheduled => start_display.to_string(),
        GameStatus::InProgress => "In Progress".to_string(),
        GameStatus::Final => "Final".to_string(),
    }
}

fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(found) = value.get(*key).and_then(|v| v.as_str()) {
            let trimmed = found.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eastern_display_time_shifts_and_formats() {
        assert_eq!(
            eastern_display_time("2026-01-29T00:00Z").as_deref(),
            Some("7:00 PM ET")
        );
        assert_eq!(
            eastern_display_time("2026-01-29T17:30:00Z").as_deref(),
            Some("12:30 PM ET")
        );
        assert!(eastern_display_time("tonight").is_none());
    }

    #[test]
    fn score_accepts_string_and_number() {
        assert_eq!(parse_score(Some(&serde_json::json!("110"))), Some(110));
        assert_eq!(parse_score(Some(&serde_json::json!(98))), Some(98));
        assert_eq!(parse_score(Some(&serde_json::json!("n/a"))), None);
        assert_eq!(parse_score(None), None);
    }

    #[test]
    fn overall_record_prefers_total_split() {
        let records = serde_json::json!([
            { "name": "Home", "type": "home", "summary": "6-4" },
            { "name": "overall", "type": "total", "summary": "12-8" }
        ]);
        assert_eq!(overall_record(Some(&records)).as_deref(), Some("12-8"));
    }

    #[test]
    fn unknown_status_state_drops_the_event() {
        let status = serde_json::json!({ "type": { "state": "postponed" } });
        assert_eq!(parse_status(Some(&status)), None);
    }
}
