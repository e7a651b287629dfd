use crate::records::{GameStatus, MatchRecord, Prediction, Winner};

/// Fixed bump added to the home side's win fraction before comparison.
pub const HOME_COURT_BONUS: f64 = 0.05;

/// Parse an overall record string like "10-10" into a win fraction in [0, 1].
/// Malformed input and 0-0 records both count as 0.0.
pub fn win_fraction(record: &str) -> f64 {
    let Some((wins, losses)) = split_record(record) else {
        return 0.0;
    };
    let total = wins + losses;
    if total == 0 {
        return 0.0;
    }
    f64::from(wins) / f64::from(total)
}

fn split_record(record: &str) -> Option<(u32, u32)> {
    let (wins, losses) = record.trim().split_once('-')?;
    Some((wins.trim().parse().ok()?, losses.trim().parse().ok()?))
}

/// Home wins the pick only with a strictly higher bonus-adjusted fraction;
/// an exact tie goes to the away side.
pub fn predict_winner(home_record: &str, away_record: &str) -> Winner {
    if win_fraction(home_record) + HOME_COURT_BONUS > win_fraction(away_record) {
        Winner::Home
    } else {
        Winner::Away
    }
}

/// Attach a prediction to every record. Finals with a decisive score also
/// get the correctness flag; anything else leaves it unset.
pub fn annotate(records: &mut [MatchRecord]) {
    for record in records.iter_mut() {
        let winner = predict_winner(&record.home.record, &record.away.record);
        let correct = match (record.status, record.actual_winner()) {
            (GameStatus::Final, Some(actual)) => Some(actual == winner),
            _ => None,
        };
        record.prediction = Some(Prediction {
            winner,
            home_fraction: win_fraction(&record.home.record),
            away_fraction: win_fraction(&record.away.record),
            correct,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::TeamSide;

    fn side(abbrev: &str, record: &str, score: Option<u32>) -> TeamSide {
        TeamSide {
            name: abbrev.to_string(),
            abbrev: abbrev.to_string(),
            logo: String::new(),
            record: record.to_string(),
            score,
        }
    }

    fn game(
        home: TeamSide,
        away: TeamSide,
        status: GameStatus,
    ) -> MatchRecord {
        MatchRecord {
            home,
            away,
            start_display: "7:00 PM ET".to_string(),
            status,
            status_detail: String::new(),
            prediction: None,
            narrative: None,
        }
    }

    #[test]
    fn win_fraction_well_formed() {
        assert_eq!(win_fraction("10-10"), 0.5);
        assert_eq!(win_fraction("12-8"), 0.6);
        assert_eq!(win_fraction("20-0"), 1.0);
        assert_eq!(win_fraction(" 3-1 "), 0.75);
    }

    #[test]
    fn win_fraction_degenerate_is_zero() {
        assert_eq!(win_fraction("0-0"), 0.0);
        assert_eq!(win_fraction(""), 0.0);
        assert_eq!(win_fraction("ten-two"), 0.0);
        assert_eq!(win_fraction("10"), 0.0);
        assert_eq!(win_fraction("10-"), 0.0);
    }

    #[test]
    fn bonus_is_not_enough_against_stronger_away() {
        // 0.5 + 0.05 = 0.55 against 0.6: the away side keeps the pick.
        assert_eq!(predict_winner("10-10", "12-8"), Winner::Away);
    }

    #[test]
    fn bonus_flips_an_even_matchup() {
        assert_eq!(predict_winner("10-10", "10-10"), Winner::Home);
    }

    #[test]
    fn exact_adjusted_tie_goes_away() {
        // 0.50 + 0.05 == 0.55 exactly.
        assert_eq!(predict_winner("2-2", "11-9"), Winner::Away);
    }

    #[test]
    fn final_correctness_hit() {
        let mut records = vec![game(
            side("NYK", "12-8", Some(110)),
            side("NOP", "10-10", Some(102)),
            GameStatus::Final,
        )];
        annotate(&mut records);
        let prediction = records[0].prediction.as_ref().unwrap();
        assert_eq!(prediction.winner, Winner::Home);
        assert_eq!(prediction.correct, Some(true));
    }

    #[test]
    fn final_correctness_miss() {
        let mut records = vec![game(
            side("MIA", "12-8", Some(98)),
            side("DEN", "11-9", Some(101)),
            GameStatus::Final,
        )];
        annotate(&mut records);
        let prediction = records[0].prediction.as_ref().unwrap();
        assert_eq!(prediction.winner, Winner::Home);
        assert_eq!(prediction.correct, Some(false));
    }

    #[test]
    fn scheduled_games_have_no_correctness() {
        let mut records = vec![game(
            side("BOS", "15-5", None),
            side("CHI", "8-12", None),
            GameStatus::Scheduled,
        )];
        annotate(&mut records);
        let prediction = records[0].prediction.as_ref().unwrap();
        assert_eq!(prediction.winner, Winner::Home);
        assert_eq!(prediction.correct, None);
    }

    #[test]
    fn tied_feed_score_leaves_correctness_unset() {
        let mut records = vec![game(
            side("LAL", "10-10", Some(100)),
            side("LAC", "10-10", Some(100)),
            GameStatus::Final,
        )];
        annotate(&mut records);
        assert_eq!(records[0].prediction.as_ref().unwrap().correct, None);
    }
}
