use std::thread;
use std::time::Duration;

use serde::Deserialize;

use crate::gemini::{
    GenerateRequest, ModelTier, TextGenerator, extract_json_array, strip_code_fences,
};
use crate::records::{GameStatus, MatchRecord, Narrative, Winner};

// Token pause between fallback attempts; not a backoff policy.
const TIER_PAUSE_MS: u64 = 250;

/// Walk the tier list: attempt, validate, advance. Returns the first
/// validated value, or None once every tier has been tried.
pub fn generate_validated<T>(
    backend: &dyn TextGenerator,
    tiers: &[ModelTier],
    request: &GenerateRequest,
    mut validate: impl FnMut(&str) -> Option<T>,
) -> Option<T> {
    for (idx, tier) in tiers.iter().enumerate() {
        match backend.generate(tier.id, request) {
            Ok(reply) => match validate(&reply) {
                Some(value) => return Some(value),
                None => eprintln!(
                    "[WARN] {} ({}) reply failed validation, trying next tier",
                    tier.id, tier.capability
                ),
            },
            Err(err) => eprintln!("[WARN] {} ({}) failed: {err:#}", tier.id, tier.capability),
        }
        if idx + 1 < tiers.len() {
            thread::sleep(Duration::from_millis(TIER_PAUSE_MS));
        }
    }
    None
}

/// Ask the model for per-game commentary and merge it in. Any failure mode
/// degrades to returning the input unchanged; this never fails the run.
pub fn augment_schedule(
    backend: &dyn TextGenerator,
    tiers: &[ModelTier],
    records: &[MatchRecord],
) -> Vec<MatchRecord> {
    if records.is_empty() {
        return Vec::new();
    }
    let request = GenerateRequest {
        prompt: build_slate_prompt(records),
        enable_search: false,
    };
    let entries = generate_validated(backend, tiers, &request, |reply| {
        validated_entries(reply, records.len())
    });
    match entries {
        Some(entries) => merge_narratives(records, entries),
        None => {
            eprintln!("[WARN] all model tiers exhausted, publishing without narratives");
            records.to_vec()
        }
    }
}

/// One commentary object per game, same order as the slate. Unknown keys are
/// ignored and missing ones default so a sparse reply still merges.
#[derive(Debug, Default, Deserialize)]
struct NarrativeEntry {
    #[serde(default)]
    analysis: String,
    #[serde(default)]
    bet: String,
    #[serde(default)]
    home_form: String,
    #[serde(default)]
    away_form: String,
}

fn validated_entries(reply: &str, expected: usize) -> Option<Vec<NarrativeEntry>> {
    let cleaned = strip_code_fences(reply);
    let sliced = extract_json_array(cleaned)?;
    let entries: Vec<NarrativeEntry> = serde_json::from_str(sliced).ok()?;
    (entries.len() == expected).then_some(entries)
}

fn merge_narratives(records: &[MatchRecord], entries: Vec<NarrativeEntry>) -> Vec<MatchRecord> {
    records
        .iter()
        .cloned()
        .zip(entries)
        .map(|(mut record, entry)| {
            record.narrative = Some(Narrative {
                analysis: entry.analysis,
                bet: entry.bet,
                home_form: entry.home_form,
                away_form: entry.away_form,
            });
            record
        })
        .collect()
}

pub fn build_slate_prompt(records: &[MatchRecord]) -> String {
    let mut prompt = String::with_capacity(records.len() * 160 + 512);
    prompt.push_str("You are an NBA betting analyst. Tonight's slate:\n\n");
    for (idx, record) in records.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. {} ({}) at {} ({})",
            idx + 1,
            record.away.name,
            record.away.record,
            record.home.name,
            record.home.record,
        ));
        match record.status {
            GameStatus::Scheduled => {
                prompt.push_str(&format!(", tips off {}", record.start_display));
            }
            GameStatus::InProgress => prompt.push_str(", in progress"),
            GameStatus::Final => {
                if let (Some(home), Some(away)) = (record.home.score, record.away.score) {
                    prompt.push_str(&format!(", final {away}-{home}"));
                }
            }
        }
        if let Some(prediction) = &record.prediction {
            let pick = match prediction.winner {
                Winner::Home => &record.home.abbrev,
                Winner::Away => &record.away.abbrev,
            };
            prompt.push_str(&format!(", statistical pick: {pick}"));
        }
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "\nReturn ONLY a JSON array with exactly {} objects, one per game in \
         the order above. Each object has the string keys \"analysis\" (two \
         sentences on injuries and matchup), \"bet\" (one recommended bet), \
         \"home_form\" and \"away_form\" (recent form like \"W-L-W-W-L\"). \
         No markdown, no text outside the array.\n",
        records.len()
    ));
    prompt
}

/// Prompt for the picks audit job: verify each user pick against fresh
/// injury news and flag it risky or approved.
pub fn build_audit_prompt(today: &str, picks: &str) -> String {
    let mut prompt = String::with_capacity(picks.len() + 512);
    prompt.push_str(&format!("Today's date (NBA time): {today}.\n"));
    prompt.push_str("My statistical picks for today:\n");
    prompt.push_str(picks.trim());
    prompt.push_str(
        "\n\nTask:\n\
         1. Use the search tool to check the NBA injury report and the \
         latest news from the last 6 hours for the games above.\n\
         2. Confirm whether the key players are active.\n\
         3. If a pick is threatened, write: [RISKY - reason].\n\
         4. If everything holds, write: [APPROVED].\n\
         5. Finish with the two most confident picks of the day.\n",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use anyhow::anyhow;

    use super::*;
    use crate::gemini::MODEL_TIERS;
    use crate::records::TeamSide;

    struct ScriptedBackend {
        replies: RefCell<VecDeque<anyhow::Result<String>>>,
        calls: RefCell<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<anyhow::Result<String>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl TextGenerator for ScriptedBackend {
        fn generate(&self, model_id: &str, _request: &GenerateRequest) -> anyhow::Result<String> {
            self.calls.borrow_mut().push(model_id.to_string());
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("script exhausted")))
        }
    }

    fn side(abbrev: &str, record: &str) -> TeamSide {
        TeamSide {
            name: abbrev.to_string(),
            abbrev: abbrev.to_string(),
            logo: String::new(),
            record: record.to_string(),
            score: None,
        }
    }

    fn slate(n: usize) -> Vec<MatchRecord> {
        (0..n)
            .map(|i| MatchRecord {
                home: side(&format!("H{i}"), "10-10"),
                away: side(&format!("A{i}"), "12-8"),
                start_display: "7:00 PM ET".to_string(),
                status: GameStatus::Scheduled,
                status_detail: "7:00 PM ET".to_string(),
                prediction: None,
                narrative: None,
            })
            .collect()
    }

    fn entry_json(analysis: &str) -> String {
        format!(
            "{{\"analysis\": \"{analysis}\", \"bet\": \"b\", \
             \"home_form\": \"W-W\", \"away_form\": \"L-L\"}}"
        )
    }

    #[test]
    fn first_valid_reply_wins() {
        let records = slate(2);
        let reply = format!("[{}, {}]", entry_json("one"), entry_json("two"));
        let backend = ScriptedBackend::new(vec![Ok(reply)]);

        let out = augment_schedule(&backend, MODEL_TIERS, &records);
        assert_eq!(backend.calls.borrow().len(), 1);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].narrative.as_ref().unwrap().analysis, "one");
        assert_eq!(out[1].narrative.as_ref().unwrap().bet, "b");
    }

    #[test]
    fn fenced_reply_is_accepted() {
        let records = slate(1);
        let reply = format!("```json\n[{}]\n```", entry_json("fenced"));
        let backend = ScriptedBackend::new(vec![Ok(reply)]);

        let out = augment_schedule(&backend, MODEL_TIERS, &records);
        assert_eq!(out[0].narrative.as_ref().unwrap().analysis, "fenced");
    }

    #[test]
    fn invalid_then_wrong_length_then_error_falls_all_the_way_through() {
        let records = slate(2);
        let backend = ScriptedBackend::new(vec![
            Ok("the model apologizes instead of answering".to_string()),
            Ok(format!("[{}]", entry_json("only one"))),
            Err(anyhow!("quota exceeded")),
        ]);

        let out = augment_schedule(&backend, MODEL_TIERS, &records);

        assert_eq!(
            *backend.calls.borrow(),
            vec![
                "gemini-2.0-flash".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-1.5-flash".to_string(),
            ]
        );
        // Exhaustion degrades to a field-for-field pass-through.
        assert_eq!(out, records);
    }

    #[test]
    fn second_tier_rescues_the_run() {
        let records = slate(1);
        let backend = ScriptedBackend::new(vec![
            Err(anyhow!("model not found")),
            Ok(format!("noted!\n[{}]\ncheers", entry_json("rescued"))),
        ]);

        let out = augment_schedule(&backend, MODEL_TIERS, &records);
        assert_eq!(backend.calls.borrow().len(), 2);
        assert_eq!(out[0].narrative.as_ref().unwrap().analysis, "rescued");
    }

    #[test]
    fn sparse_entry_fields_default_to_empty() {
        let records = slate(1);
        let backend = ScriptedBackend::new(vec![Ok(
            "[{\"analysis\": \"only analysis\"}]".to_string()
        )]);

        let out = augment_schedule(&backend, MODEL_TIERS, &records);
        let narrative = out[0].narrative.as_ref().unwrap();
        assert_eq!(narrative.analysis, "only analysis");
        assert_eq!(narrative.bet, "");
    }

    #[test]
    fn empty_slate_never_calls_the_model() {
        let backend = ScriptedBackend::new(vec![Ok("[]".to_string())]);
        let out = augment_schedule(&backend, MODEL_TIERS, &[]);
        assert!(out.is_empty());
        assert!(backend.calls.borrow().is_empty());
    }

    #[test]
    fn slate_prompt_names_every_game_and_the_shape() {
        let mut records = slate(2);
        records[1].status = GameStatus::Final;
        records[1].home.score = Some(110);
        records[1].away.score = Some(102);

        let prompt = build_slate_prompt(&records);
        assert!(prompt.contains("1. A0 (12-8) at H0 (10-10)"));
        assert!(prompt.contains("final 102-110"));
        assert!(prompt.contains("exactly 2 objects"));
        assert!(prompt.contains("\"home_form\""));
    }

    #[test]
    fn audit_prompt_embeds_date_and_picks() {
        let prompt = build_audit_prompt("2026-01-29", "Knicks -3.5\nHeat ML");
        assert!(prompt.contains("2026-01-29"));
        assert!(prompt.contains("Knicks -3.5"));
        assert!(prompt.contains("[RISKY"));
        assert!(prompt.contains("[APPROVED]"));
    }
}
