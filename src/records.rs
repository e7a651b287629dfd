use serde::Deserialize;

/// One side of a matchup as rendered on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamSide {
    pub name: String,
    pub abbrev: String,
    pub logo: String,
    /// Overall win-loss record as reported upstream, e.g. "10-10".
    pub record: String,
    /// Present once the game has started.
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Home,
    Away,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub winner: Winner,
    /// Raw (un-bonused) win fractions backing the pick.
    pub home_fraction: f64,
    pub away_fraction: f64,
    /// Set once the game is final with a decisive score.
    pub correct: Option<bool>,
}

/// Model-supplied commentary. Every field is optional upstream and defaults
/// to empty so a sparse reply never breaks the merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Narrative {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub bet: String,
    #[serde(default)]
    pub home_form: String,
    #[serde(default)]
    pub away_form: String,
}

/// Normalized view of one scoreboard event plus derived prediction fields.
/// Rebuilt from the API on every run, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub home: TeamSide,
    pub away: TeamSide,
    /// Tip-off time rendered for display, e.g. "7:00 PM ET".
    pub start_display: String,
    pub status: GameStatus,
    /// Upstream short status text ("Final", "7:00 PM EST", ...).
    pub status_detail: String,
    pub prediction: Option<Prediction>,
    pub narrative: Option<Narrative>,
}

impl MatchRecord {
    /// "AWY @ HOM" label used in reports and the detail modal.
    pub fn matchup_label(&self) -> String {
        format!("{} @ {}", self.away.abbrev, self.home.abbrev)
    }

    /// Side with the higher score, once both are known. A tied or partial
    /// score yields None.
    pub fn actual_winner(&self) -> Option<Winner> {
        let home = self.home.score?;
        let away = self.away.score?;
        if home > away {
            Some(Winner::Home)
        } else if away > home {
            Some(Winner::Away)
        } else {
            None
        }
    }
}
