//! SuperPlayerRater: rates players whose cumulative score sits exactly on
//! the all-win or all-loss boundary, where ModelKernel's squared-error
//! descent has no gradient to follow (§4.9).

use crate::error::FitError;
use crate::kernel::{wdl, xpect};
use crate::types::{Encounter, PerformanceType};
use crate::update::saturating_step;

const SEED_PHASES: usize = 20;
const SEED_ITERATIONS_PER_PHASE: usize = 10_000;
const SEED_START_DELTA: f64 = 200.0;
const SEED_START_KAPPA: f64 = 0.05;
const SEED_TERMINAL_DEVIATION: f64 = 1e-6;
const SEED_OFFSET: f64 = 0.25;

const REFINE_MAX_ITERATIONS: usize = 2_000;
const REFINE_START_DELTA: f64 = 200.0;
const REFINE_TERMINAL_UNFITNESS: f64 = 1e-10;

/// One `(opponent_rating_adjusted, games)` pair, white-advantage already
/// rotated onto the opponent's side so the rest of the math can ignore
/// which color the super-player actually played.
#[derive(Debug, Clone, Copy, PartialEq)]
struct OpponentPair {
    rating: f64,
    games: u32,
}

/// Builds the per-opponent pairs for player `j` from its own encounter
/// index list, rotating the white-advantage sign onto the opponent so the
/// rest of the math can treat every pairing as colorless.
fn collect_opponent_pairs(
    j: usize,
    enc: &[Encounter],
    encounter_indices: &[usize],
    ratingof: &[f64],
    white_advantage: f64,
) -> Result<Vec<OpponentPair>, FitError> {
    let mut pairs = Vec::with_capacity(encounter_indices.len());
    for &idx in encounter_indices {
        let e = enc.get(idx).ok_or(FitError::DanglingEncounterPlayer { encounter_index: idx })?;
        if e.wh == j {
            pairs.push(OpponentPair { rating: ratingof[e.bl] - white_advantage, games: e.played });
        } else if e.bl == j {
            pairs.push(OpponentPair { rating: ratingof[e.wh] + white_advantage, games: e.played });
        } else {
            return Err(FitError::DanglingEncounterPlayer { encounter_index: idx });
        }
    }
    Ok(pairs)
}

/// Seeds a super-player's rating by minimizing `(S - Σ wᵢ·xpect(x, rᵢ, β))²`
/// in `x` via the saturating-step descent of [`crate::update`], run over
/// `SEED_PHASES` phases that each halve the step and double the damping.
fn calc_ind_rating(seed: f64, target_score: f64, pairs: &[OpponentPair], beta: f64) -> f64 {
    let mut x = seed;
    let mut delta = SEED_START_DELTA;
    let mut kappa = SEED_START_KAPPA;

    for _phase in 0..SEED_PHASES {
        for _ in 0..SEED_ITERATIONS_PER_PHASE {
            let f_x: f64 = pairs.iter().map(|p| p.games as f64 * xpect(x, p.rating, beta)).sum();
            let deviation = (target_score - f_x).powi(2);
            if deviation < SEED_TERMINAL_DEVIATION {
                return x;
            }
            let (step, _y) = saturating_step(f_x, target_score, delta, kappa);
            x += step;
        }
        delta /= 2.0;
        kappa *= 2.0;
    }

    x
}

/// `P(all-win) = Π pwinᵢ^wᵢ` for SuperWinner, or the loss analog for
/// SuperLoser, reading `pwin`/`ploss` off [`crate::kernel::wdl`]'s squared-
/// form decomposition so a super-player's single-game win probability
/// agrees with the same `pwin = f^2` identity ModelKernel uses everywhere
/// else a win probability (as opposed to an expected score) is needed.
fn probability_of_the_run(x: f64, pairs: &[OpponentPair], beta: f64, performance_type: PerformanceType) -> f64 {
    pairs
        .iter()
        .map(|p| {
            let (pwin, _pdraw, ploss) = wdl(x - p.rating, beta);
            let base = match performance_type {
                PerformanceType::SuperWinner => pwin,
                PerformanceType::SuperLoser => ploss,
                PerformanceType::Normal => unreachable!("refine is only ever called for a super-player"),
            };
            base.powi(p.games as i32)
        })
        .product()
}

/// Refines the seeded rating by maximizing the probability of the observed
/// all-one-outcome run via fixed-sign step descent, reverting and halving
/// the step whenever it worsens unfitness.
fn calc_ind_rating_superplayer(seed: f64, pairs: &[OpponentPair], beta: f64, performance_type: PerformanceType) -> f64 {
    let mut x = seed;
    let mut delta = REFINE_START_DELTA;
    let mut unfitness = 1.0 - probability_of_the_run(x, pairs, beta, performance_type);

    for _ in 0..REFINE_MAX_ITERATIONS {
        if unfitness < REFINE_TERMINAL_UNFITNESS {
            break;
        }

        let p = probability_of_the_run(x, pairs, beta, performance_type);
        let d = match performance_type {
            PerformanceType::SuperWinner => 0.5 - p,
            PerformanceType::SuperLoser => p - 0.5,
            PerformanceType::Normal => unreachable!("refine is only ever called for a super-player"),
        };
        let sign = if d >= 0.0 { 1.0 } else { -1.0 };
        let candidate = x + sign * delta;
        let candidate_unfitness = 1.0 - probability_of_the_run(candidate, pairs, beta, performance_type);

        if candidate_unfitness > unfitness {
            delta /= 2.0;
        } else {
            x = candidate;
            unfitness = candidate_unfitness;
        }
    }

    x
}

/// Rates a single super-player `j`, seeding from `ratingof[j]` and its
/// `cume_score` (`obtained[j]`, the player's total score across every
/// encounter). Does not clear `flagged[j]` — the Conductor does that once
/// every super-player in the round has been rated.
pub fn rate_super_player(
    j: usize,
    enc: &[Encounter],
    encounter_indices: &[usize],
    ratingof: &[f64],
    white_advantage: f64,
    beta: f64,
    performance_type: PerformanceType,
    cume_score: f64,
) -> Result<f64, FitError> {
    let pairs = collect_opponent_pairs(j, enc, encounter_indices, ratingof, white_advantage)?;

    let target_score = match performance_type {
        PerformanceType::SuperWinner => cume_score - SEED_OFFSET,
        PerformanceType::SuperLoser => cume_score + SEED_OFFSET,
        PerformanceType::Normal => cume_score,
    };

    let seed = calc_ind_rating(ratingof[j], target_score, &pairs, beta);
    Ok(calc_ind_rating_superplayer(seed, &pairs, beta, performance_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_encounter_index_is_reported() {
        let enc = vec![Encounter::from_counts(0, 1, 5, 0, 0)];
        let ratingof = vec![2000.0, 2000.0, 2000.0];
        let result = rate_super_player(2, &enc, &[0], &ratingof, 0.0, 1.0 / 200.0, PerformanceType::SuperWinner, 5.0);
        assert_eq!(result, Err(FitError::DanglingEncounterPlayer { encounter_index: 0 }));
    }

    #[test]
    fn out_of_range_encounter_index_is_reported() {
        let enc = vec![Encounter::from_counts(0, 1, 5, 0, 0)];
        let ratingof = vec![2000.0, 2000.0];
        let result = rate_super_player(0, &enc, &[7], &ratingof, 0.0, 1.0 / 200.0, PerformanceType::SuperWinner, 5.0);
        assert_eq!(result, Err(FitError::DanglingEncounterPlayer { encounter_index: 7 }));
    }

    #[test]
    fn super_winner_rating_exceeds_every_opponent() {
        let beta = 1.0 / 200.0;
        // Player 0 beat every other player every game: a clean SUPERWINNER.
        let enc = vec![
            Encounter::from_counts(0, 1, 10, 0, 0),
            Encounter::from_counts(0, 2, 10, 0, 0),
            Encounter::from_counts(0, 3, 10, 0, 0),
        ];
        let ratingof = vec![2000.0, 1900.0, 2100.0, 1800.0];
        let rating = rate_super_player(
            0,
            &enc,
            &[0, 1, 2],
            &ratingof,
            0.0,
            beta,
            PerformanceType::SuperWinner,
            30.0,
        )
        .expect("valid encounter list");
        assert!(rating > 2100.0, "rating={rating}");
    }

    #[test]
    fn super_loser_rating_falls_below_every_opponent() {
        let beta = 1.0 / 200.0;
        let enc = vec![Encounter::from_counts(1, 0, 0, 0, 10), Encounter::from_counts(2, 0, 0, 0, 10)];
        let ratingof = vec![2000.0, 1900.0, 2100.0];
        let rating = rate_super_player(
            0,
            &enc,
            &[0, 1],
            &ratingof,
            0.0,
            beta,
            PerformanceType::SuperLoser,
            0.0,
        )
        .expect("valid encounter list");
        assert!(rating < 1900.0, "rating={rating}");
    }
}
