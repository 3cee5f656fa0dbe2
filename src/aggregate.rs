//! Folding the model over an encounter list, and the capability boundary
//! standing in for the out-of-scope raw-game aggregation.

use crate::kernel::xpect;
use crate::types::Encounter;

/// Which encounters a re-aggregation pass should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationMode {
    /// Include every pairing.
    Full,
    /// Drop any encounter that touches a flagged player.
    NoFlagged,
}

/// Capability boundary standing in for the out-of-scope raw-game
/// aggregation (PGN parsing, player-name interning, etc). The Conductor
/// calls `aggregate` whenever the legacy source re-derives `ENC` rows from
/// `Score`/`Whiteplayer`/`Blackplayer`; this crate neither owns nor cares
/// how an implementor gets from raw games to encounters.
pub trait EncounterSource {
    fn aggregate(&self, mode: AggregationMode) -> Vec<Encounter>;
}

/// Zeroes `expected` and `playedby`, then folds the model over `enc`.
///
/// For each encounter `e`, `f = xpect(ratingof[e.wh] + white_advantage,
/// ratingof[e.bl], beta)`; accumulates `f * played` into `expected[wh]` and
/// `(1-f) * played` into `expected[bl]`, with `playedby` accumulated the
/// same way from `played` alone.
pub fn calc_expected(
    enc: &[Encounter],
    ratingof: &[f64],
    white_advantage: f64,
    beta: f64,
    expected: &mut [f64],
    playedby: &mut [u32],
) {
    expected.iter_mut().for_each(|e| *e = 0.0);
    playedby.iter_mut().for_each(|p| *p = 0);

    for e in enc {
        let f = xpect(ratingof[e.wh] + white_advantage, ratingof[e.bl], beta);
        expected[e.wh] += f * e.played as f64;
        expected[e.bl] += (1.0 - f) * e.played as f64;
        playedby[e.wh] += e.played;
        playedby[e.bl] += e.played;
    }
}

/// Recomputes `obtained` (observed score) and `playedby` from `enc` alone,
/// independent of any rating values. Called once per outer pass before the
/// rating-update inner loop, and again whenever encounters are
/// re-aggregated.
pub fn calc_obtained_playedby(enc: &[Encounter], obtained: &mut [f64], playedby: &mut [u32]) {
    obtained.iter_mut().for_each(|o| *o = 0.0);
    playedby.iter_mut().for_each(|p| *p = 0);

    for e in enc {
        obtained[e.wh] += e.wscore;
        obtained[e.bl] += e.played as f64 - e.wscore;
        playedby[e.wh] += e.played;
        playedby[e.bl] += e.played;
    }
}

/// A plain in-memory reference [`EncounterSource`] built from per-game
/// white/black player indices and scores, grouped into `ENC` rows on
/// construction. This is a demo/test adapter, not part of the core's
/// contract — real embedders own their own ingestion pipeline.
pub struct InMemoryGameLog {
    games: Vec<(usize, usize, f64)>,
    flagged: Vec<bool>,
}

impl InMemoryGameLog {
    /// `games` is `(white, black, white_score)` per game, `white_score` one
    /// of `1.0`, `0.5`, `0.0`.
    pub fn new(games: Vec<(usize, usize, f64)>, flagged: Vec<bool>) -> Self {
        InMemoryGameLog { games, flagged }
    }
}

impl EncounterSource for InMemoryGameLog {
    fn aggregate(&self, mode: AggregationMode) -> Vec<Encounter> {
        use std::collections::BTreeMap;

        let mut rows: BTreeMap<(usize, usize), (u32, u32, u32)> = BTreeMap::new();
        for &(wh, bl, score) in &self.games {
            if mode == AggregationMode::NoFlagged && (self.flagged[wh] || self.flagged[bl]) {
                continue;
            }
            let entry = rows.entry((wh, bl)).or_insert((0, 0, 0));
            if score == 1.0 {
                entry.0 += 1;
            } else if score == 0.5 {
                entry.1 += 1;
            } else {
                entry.2 += 1;
            }
        }

        rows.into_iter()
            .map(|((wh, bl), (w, d, l))| Encounter::from_counts(wh, bl, w, d, l))
            .collect()
    }
}
