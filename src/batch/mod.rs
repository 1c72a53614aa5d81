//! Batch processing of pending match records
//!
//! The runner walks the pending matches in store order, rates each one, and
//! writes both updated player rows back. Matches are applied sequentially:
//! a player's second match in the same batch sees the rating their first
//! match produced. Malformed or unresolvable records are skipped with a
//! warning and the batch continues.

use crate::error::Result;
use crate::rating::RatingCalculator;
use crate::store::{MatchRecord, RecordStore};
use crate::types::{clamp_rating, Grade, MatchResult, PlayerId, Winner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// One player's rating change from one rated match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingUpdate {
    pub player_id: PlayerId,
    pub old_rating: f64,
    pub delta: f64,
    pub new_rating: f64,
    pub grade: Grade,
}

/// Summary of a completed batch pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub updates: Vec<RatingUpdate>,
    pub processed: usize,
    pub skipped: usize,
    pub dry_run: bool,
}

/// Runs rating updates over all pending matches in a record store
pub struct BatchRunner {
    store: Arc<dyn RecordStore>,
    calculator: Arc<dyn RatingCalculator>,
}

impl BatchRunner {
    pub fn new(store: Arc<dyn RecordStore>, calculator: Arc<dyn RatingCalculator>) -> Self {
        Self { store, calculator }
    }

    /// Rate every pending match and write back the results.
    ///
    /// In dry-run mode everything is computed and reported but nothing is
    /// written and the pending matches stay queued.
    pub fn run(&self, dry_run: bool) -> Result<BatchReport> {
        let matches = self.store.pending_matches()?;
        info!(count = matches.len(), dry_run, "starting batch run");

        let mut report = BatchReport {
            updates: Vec::with_capacity(matches.len() * 2),
            processed: 0,
            skipped: 0,
            dry_run,
        };

        for record in matches {
            match self.rate_match(&record, dry_run) {
                Ok(Some((winner, loser))) => {
                    report.updates.push(winner);
                    report.updates.push(loser);
                    report.processed += 1;
                }
                Ok(None) => report.skipped += 1,
                Err(error) => return Err(error),
            }
        }

        if !dry_run {
            self.store.clear_matches()?;
            self.store.persist()?;
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            "batch run finished"
        );
        Ok(report)
    }

    /// Rate one match. Returns None when the record cannot be used.
    fn rate_match(
        &self,
        record: &MatchRecord,
        dry_run: bool,
    ) -> Result<Option<(RatingUpdate, RatingUpdate)>> {
        let Some(mut winner) = self.store.find_player(&record.winner_id)? else {
            warn!(player_id = %record.winner_id, "skipping match: winner not on record");
            return Ok(None);
        };
        let Some(mut loser) = self.store.find_player(&record.opponent_id)? else {
            warn!(player_id = %record.opponent_id, "skipping match: opponent not on record");
            return Ok(None);
        };

        let result = match MatchResult::new(
            winner.rating,
            loser.rating,
            Winner::FirstPlayer,
            record.handicap,
            record.class,
        ) {
            Ok(result) => result,
            Err(error) => {
                warn!(
                    winner_id = %record.winner_id,
                    opponent_id = %record.opponent_id,
                    %error,
                    "skipping match: invalid inputs"
                );
                return Ok(None);
            }
        };

        // An InvariantViolation here is a formula defect and aborts the
        // whole batch rather than being skipped.
        let deltas = self.calculator.compute_deltas(&result)?;

        let winner_update = Self::apply(&mut winner, deltas.first);
        let loser_update = Self::apply(&mut loser, deltas.second);

        info!(player = %winner.last_name, delta = deltas.first, "rating updated");
        info!(player = %loser.last_name, delta = deltas.second, "rating updated");

        if !dry_run {
            self.store.update_player(winner)?;
            self.store.update_player(loser)?;
        }
        Ok(Some((winner_update, loser_update)))
    }

    fn apply(record: &mut crate::store::PlayerRecord, delta: f64) -> RatingUpdate {
        let old_rating = record.rating;
        // Clamp into the representable range, then store to one decimal as
        // the records have always been kept.
        let new_rating = (clamp_rating(old_rating + delta) * 10.0).round() / 10.0;
        record.set_rating(new_rating);
        RatingUpdate {
            player_id: record.id.clone(),
            old_rating,
            delta,
            new_rating,
            grade: record.grade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rating::{EgfRatingCalculator, MockRatingCalculator};
    use crate::store::{InMemoryRecordStore, PlayerRecord};
    use crate::types::TournamentClass;

    fn store_with_players(players: &[(&str, f64)]) -> Arc<InMemoryRecordStore> {
        let store = Arc::new(InMemoryRecordStore::new());
        for (id, rating) in players {
            store
                .add_player(PlayerRecord::new(
                    (*id).into(),
                    format!("Last{id}"),
                    format!("First{id}"),
                    *rating,
                ))
                .unwrap();
        }
        store
    }

    fn runner(store: Arc<InMemoryRecordStore>) -> BatchRunner {
        BatchRunner::new(store, Arc::new(EgfRatingCalculator::new()))
    }

    #[test]
    fn test_single_match_updates_both_players() {
        let store = store_with_players(&[("123", 2400.0), ("456", 2400.0)]);
        store.record_game("123", "456+0a").unwrap();

        let report = runner(store.clone()).run(false).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 0);

        assert_eq!(store.find_player("123").unwrap().unwrap().rating, 2407.6);
        assert_eq!(store.find_player("456").unwrap().unwrap().rating, 2392.6);
        assert!(store.pending_matches().unwrap().is_empty());
    }

    #[test]
    fn test_floor_clamp_and_grade_recompute() {
        let store = store_with_players(&[("123", 400.0), ("456", 105.0)]);
        store.record_game("123", "456+0a").unwrap();

        runner(store.clone()).run(false).unwrap();

        let loser = store.find_player("456").unwrap().unwrap();
        assert_eq!(loser.rating, 100.0);
        assert_eq!(loser.grade, Grade::Kyu(20));

        let winner = store.find_player("123").unwrap().unwrap();
        assert!(winner.rating > 400.0);
        assert_eq!(winner.grade, Grade::Kyu(17));
    }

    #[test]
    fn test_ceiling_clamp() {
        let store = store_with_players(&[("123", 2799.0), ("456", 2798.0)]);
        let mock = Arc::new(MockRatingCalculator::new());
        mock.set_fixed_deltas(crate::types::RatingDeltas {
            first: 50.0,
            second: -50.0,
        });
        let report = {
            store.record_game("123", "456+0a").unwrap();
            BatchRunner::new(store.clone(), mock).run(false).unwrap()
        };

        assert_eq!(report.updates[0].new_rating, 2799.0);
        assert_eq!(store.find_player("123").unwrap().unwrap().rating, 2799.0);
    }

    #[test]
    fn test_sequential_same_player_matches() {
        let store = store_with_players(&[("100", 320.0), ("200", 400.0), ("300", 400.0)]);
        store.record_game("100", "200+0a").unwrap();
        store.record_game("100", "300+0a").unwrap();

        let report = runner(store.clone()).run(false).unwrap();
        assert_eq!(report.processed, 2);

        // first match moves 320 by +63.68; the second is rated from the
        // already-updated value, not the original 320
        assert_eq!(report.updates[0].old_rating, 320.0);
        assert_eq!(report.updates[0].new_rating, 383.7);
        assert_eq!(report.updates[2].old_rating, 383.7);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let store = store_with_players(&[("123", 2400.0), ("456", 2400.0)]);
        store.record_game("123", "456+0a").unwrap();

        let report = runner(store.clone()).run(true).unwrap();
        assert_eq!(report.processed, 1);
        assert!(report.dry_run);
        assert!((report.updates[0].delta - 7.62).abs() < 0.005);

        assert_eq!(store.find_player("123").unwrap().unwrap().rating, 2400.0);
        assert_eq!(store.pending_matches().unwrap().len(), 1);
    }

    #[test]
    fn test_unknown_opponent_skipped() {
        let store = store_with_players(&[("123", 1500.0), ("456", 1600.0)]);
        store.record_game("123", "999+0a").unwrap();
        store.record_game("123", "456+0a").unwrap();

        let report = runner(store.clone()).run(false).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn test_calculator_sees_match_inputs() {
        let store = store_with_players(&[("123", 1500.0), ("456", 1600.0)]);
        store.record_game("123", "456+3b").unwrap();

        let mock = Arc::new(MockRatingCalculator::new());
        BatchRunner::new(store, mock.clone()).run(true).unwrap();

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].rating_a, 1500.0);
        assert_eq!(calls[0].rating_b, 1600.0);
        assert_eq!(calls[0].handicap, 3);
        assert_eq!(calls[0].class, TournamentClass::B);
        assert_eq!(calls[0].winner, Winner::FirstPlayer);
    }
}
