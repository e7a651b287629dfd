use crate::records::{GameStatus, MatchRecord, Winner};

/// Marker pair bounding the replaceable card-grid region of a published page.
pub const FRAGMENT_BEGIN: &str = "<!-- nba-daily:begin -->";
pub const FRAGMENT_END: &str = "<!-- nba-daily:end -->";

const PLACEHOLDER_ANALYSIS: &str = "No analysis available for this game yet.";
const PLACEHOLDER_BET: &str = "No recommended bet.";
const PLACEHOLDER_FORM: &str = "n/a";

/// Escape text for element content and double-quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The card-grid fragment, bounded by the marker pair so a later run can
/// splice a fresh slate into an already-published page.
pub fn render_fragment(records: &[MatchRecord]) -> String {
    let mut out = String::with_capacity(records.len() * 1024 + 256);
    out.push_str(FRAGMENT_BEGIN);
    out.push('\n');
    out.push_str("<div class=\"games\">\n");
    if records.is_empty() {
        out.push_str("  <p class=\"empty\">No games scheduled today.</p>\n");
    }
    for record in records {
        render_card(&mut out, record);
    }
    out.push_str("</div>\n");
    out.push_str(FRAGMENT_END);
    out
}

fn render_card(out: &mut String, record: &MatchRecord) {
    // Detail text travels in data attributes; the modal script reads them
    // back with textContent so model-written text stays inert.
    let narrative = record.narrative.as_ref();
    let analysis = narrative
        .map(|n| n.analysis.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(PLACEHOLDER_ANALYSIS);
    let bet = narrative
        .map(|n| n.bet.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(PLACEHOLDER_BET);
    let home_form = narrative
        .map(|n| n.home_form.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(PLACEHOLDER_FORM);
    let away_form = narrative
        .map(|n| n.away_form.as_str())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(PLACEHOLDER_FORM);

    out.push_str(&format!(
        "  <article class=\"card\" data-matchup=\"{}\" data-analysis=\"{}\" \
         data-bet=\"{}\" data-home-form=\"{}\" data-away-form=\"{}\">\n",
        escape_html(&record.matchup_label()),
        escape_html(analysis),
        escape_html(bet),
        escape_html(home_form),
        escape_html(away_form),
    ));

    out.push_str("    <div class=\"teams\">\n");
    render_team(out, record, Winner::Away);
    out.push_str("      <span class=\"vs\">@</span>\n");
    render_team(out, record, Winner::Home);
    out.push_str("    </div>\n");

    out.push_str(&format!(
        "    <div class=\"meta\"><span class=\"status\">{}</span>{}</div>\n",
        escape_html(&record.status_detail),
        render_pick(record),
    ));
    out.push_str("  </article>\n");
}

fn render_team(out: &mut String, record: &MatchRecord, side: Winner) {
    let team = match side {
        Winner::Home => &record.home,
        Winner::Away => &record.away,
    };
    let mut classes = String::from("team");
    classes.push_str(match side {
        Winner::Home => " home",
        Winner::Away => " away",
    });
    // Win/loss distinction only once the game is final and decided.
    if record.status == GameStatus::Final {
        match record.actual_winner() {
            Some(winner) if winner == side => classes.push_str(" won"),
            Some(_) => classes.push_str(" lost"),
            None => {}
        }
    }

    out.push_str(&format!(
        "      <div class=\"{classes}\">\n        <img src=\"{}\" alt=\"{}\" />\n",
        escape_html(&team.logo),
        escape_html(&team.abbrev),
    ));
    out.push_str(&format!(
        "        <span class=\"abbr\">{}</span>\n        <span class=\"rec\">{}</span>\n",
        escape_html(&team.abbrev),
        escape_html(&team.record),
    ));
    if let Some(score) = team.score {
        out.push_str(&format!("        <span class=\"score\">{score}</span>\n"));
    }
    out.push_str("      </div>\n");
}

fn render_pick(record: &MatchRecord) -> String {
    let Some(prediction) = &record.prediction else {
        return String::new();
    };
    let pick = match prediction.winner {
        Winner::Home => &record.home.abbrev,
        Winner::Away => &record.away.abbrev,
    };
    let badge = match prediction.correct {
        Some(true) => " <span class=\"hit\">&#10003;</span>",
        Some(false) => " <span class=\"miss\">&#10007;</span>",
        None => "",
    };
    format!(
        "<span class=\"pick\">Pick: {}{}</span>",
        escape_html(pick),
        badge
    )
}

/// Full self-contained document. Deterministic for a given record list: the
/// date label is computed once by the caller, never inside the renderer.
pub fn render_page(records: &[MatchRecord], date_label: &str) -> String {
    let mut out = String::with_capacity(records.len() * 1024 + 4096);
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    out.push_str("<meta charset=\"UTF-8\" />\n");
    out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />\n");
    out.push_str(&format!(
        "<title>NBA Daily Report - {}</title>\n",
        escape_html(date_label)
    ));
    out.push_str("<style>\n");
    out.push_str(PAGE_CSS);
    out.push_str("</style>\n</head>\n<body>\n");
    out.push_str("<h1>&#127936; NBA Daily Report</h1>\n");
    out.push_str(&format!(
        "<p class=\"updated\">Slate for {}</p>\n",
        escape_html(date_label)
    ));
    out.push_str(&render_fragment(records));
    out.push('\n');
    out.push_str(MODAL_HTML);
    out.push_str(MODAL_SCRIPT);
    out.push_str("<p class=\"footer\">Generated automatically.</p>\n");
    out.push_str("</body>\n</html>\n");
    out
}

/// Splice a fresh fragment into an existing document: replace the
/// marker-bounded region when present, otherwise insert before the closing
/// body tag, otherwise append.
pub fn inject_fragment(existing: &str, fragment: &str) -> String {
    if let (Some(begin), Some(end)) = (existing.find(FRAGMENT_BEGIN), existing.rfind(FRAGMENT_END))
    {
        if begin <= end {
            let tail = &existing[end + FRAGMENT_END.len()..];
            return format!("{}{}{}", &existing[..begin], fragment, tail);
        }
    }
    if let Some(anchor) = existing.rfind("</body>") {
        return format!("{}{}\n{}", &existing[..anchor], fragment, &existing[anchor..]);
    }
    let mut out = existing.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(fragment);
    out.push('\n');
    out
}

const PAGE_CSS: &str = "\
body { background: #111; color: #eee; font-family: sans-serif; margin: 0; padding: 20px; text-align: center; }
h1 { color: #f39c12; margin-bottom: 4px; }
.updated { color: #888; margin-top: 0; }
.games { display: flex; flex-wrap: wrap; gap: 16px; justify-content: center; max-width: 960px; margin: 24px auto; }
.empty { color: #888; }
.card { background: #222; border: 1px solid #444; border-radius: 8px; padding: 16px; width: 260px; cursor: pointer; }
.card:hover { border-color: #f39c12; }
.teams { display: flex; align-items: center; justify-content: space-between; }
.team { display: flex; flex-direction: column; align-items: center; gap: 2px; }
.team img { width: 48px; height: 48px; }
.team .abbr { font-weight: bold; }
.team .rec { color: #888; font-size: 0.8em; }
.team .score { font-size: 1.4em; }
.team.won .score { color: #2ecc71; font-weight: bold; }
.team.lost .score { color: #888; }
.vs { color: #666; }
.meta { margin-top: 12px; display: flex; justify-content: space-between; font-size: 0.85em; }
.status { color: #f39c12; }
.pick { color: #ccc; }
.hit { color: #2ecc71; }
.miss { color: #e74c3c; }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.7); display: flex; align-items: center; justify-content: center; }
.modal[hidden] { display: none; }
.modal-box { background: #222; border: 1px solid #444; border-radius: 8px; max-width: 420px; padding: 24px; text-align: left; }
.modal-box h2 { color: #f39c12; margin-top: 0; }
.modal-box button { background: #333; border: 1px solid #555; border-radius: 4px; color: #eee; cursor: pointer; padding: 6px 16px; }
.footer { color: #666; font-size: 0.8em; }
";

const MODAL_HTML: &str = "\
<div id=\"modal\" class=\"modal\" hidden>
  <div class=\"modal-box\">
    <h2 id=\"modal-title\"></h2>
    <p id=\"modal-analysis\"></p>
    <p id=\"modal-bet\"></p>
    <p id=\"modal-form\"></p>
    <button id=\"modal-close\" type=\"button\">Close</button>
  </div>
</div>
";

// One delegated listener per card; detail text is assigned via textContent so
// nothing from the data attributes is ever parsed as markup.
const MODAL_SCRIPT: &str = "\
<script>
(function () {
  var modal = document.getElementById('modal');
  document.querySelectorAll('.card').forEach(function (card) {
    card.addEventListener('click', function () {
      document.getElementById('modal-title').textContent = card.dataset.matchup;
      document.getElementById('modal-analysis').textContent = card.dataset.analysis;
      document.getElementById('modal-bet').textContent = card.dataset.bet;
      document.getElementById('modal-form').textContent =
        'Form: ' + card.dataset.homeForm + ' vs ' + card.dataset.awayForm;
      modal.hidden = false;
    });
  });
  document.getElementById('modal-close').addEventListener('click', function () {
    modal.hidden = true;
  });
  modal.addEventListener('click', function (ev) {
    if (ev.target === modal) { modal.hidden = true; }
  });
})();
</script>
";
