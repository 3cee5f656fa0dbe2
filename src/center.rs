//! CenterAdjuster: picks an additive offset applied to all non-flagged,
//! non-anchored ratings that reduces Deviation, compensating for the mean
//! drift a RatingUpdater pass introduces (§4.5).

use crate::aggregate::calc_expected;
use crate::deviation::deviation;
use crate::linmin::quadfit1d;
use crate::types::Encounter;

/// Copies `ratingof` into `ratingtmp`, adds `excess` to every non-flagged,
/// non-anchored entry, and leaves the rest untouched.
fn apply_excess(
    excess: f64,
    flagged: &[bool],
    prefed: &[bool],
    ratingof: &[f64],
    ratingtmp: &mut [f64],
) {
    ratingtmp.copy_from_slice(ratingof);
    for j in 0..ratingtmp.len() {
        if !flagged[j] && !prefed[j] {
            ratingtmp[j] += excess;
        }
    }
}

/// `U(c)`: hypothetical Deviation after shifting every non-flagged,
/// non-anchored rating by `c`.
#[allow(clippy::too_many_arguments)]
fn unfitness_fcenter(
    excess: f64,
    enc: &[Encounter],
    flagged: &[bool],
    prefed: &[bool],
    ratingof: &[f64],
    white_advantage: f64,
    beta: f64,
    obtained: &[f64],
    expected: &mut [f64],
    playedby: &mut [u32],
    ratingtmp: &mut [f64],
) -> f64 {
    apply_excess(excess, flagged, prefed, ratingof, ratingtmp);
    calc_expected(enc, ratingtmp, white_advantage, beta, expected, playedby);
    deviation(flagged, expected, obtained, playedby)
}

/// Searches `[-bracket, +bracket]` for the best additive offset `c`,
/// terminating the line search at width `min_resol`. Scratch buffers
/// `expected`/`playedby`/`ratingtmp` are reused across every closure call;
/// callers must recompute their own canonical `expected`/`playedby` after
/// this returns if they intend to keep using them (the Conductor does so
/// immediately after applying the chosen offset).
#[allow(clippy::too_many_arguments)]
pub fn optimum_centerdelta(
    bracket: f64,
    min_resol: f64,
    enc: &[Encounter],
    flagged: &[bool],
    prefed: &[bool],
    ratingof: &[f64],
    white_advantage: f64,
    beta: f64,
    obtained: &[f64],
    expected: &mut [f64],
    playedby: &mut [u32],
    ratingtmp: &mut [f64],
) -> f64 {
    let mut f = |c: f64| {
        unfitness_fcenter(
            c,
            enc,
            flagged,
            prefed,
            ratingof,
            white_advantage,
            beta,
            obtained,
            expected,
            playedby,
            ratingtmp,
        )
    };
    quadfit1d(min_resol, -bracket, bracket, &mut f)
}

/// Applies `excess` to every non-flagged, non-anchored rating in place —
/// the offset CenterAdjuster decided was worth keeping.
pub fn apply_center_offset(excess: f64, flagged: &[bool], prefed: &[bool], ratingof: &mut [f64]) {
    for j in 0..ratingof.len() {
        if !flagged[j] && !prefed[j] {
            ratingof[j] += excess;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_zero_offset_when_already_centered() {
        let enc = vec![Encounter::from_counts(0, 1, 5, 0, 5)];
        let flagged = vec![false, false];
        let prefed = vec![true, false];
        let ratingof = vec![2000.0, 2000.0];
        let obtained = vec![5.0, 5.0];
        let mut expected = vec![0.0; 2];
        let mut playedby = vec![0; 2];
        let mut ratingtmp = vec![0.0; 2];

        let c = optimum_centerdelta(
            100.0, 1e-6, &enc, &flagged, &prefed, &ratingof, 0.0, 1.0 / 200.0, &obtained, &mut expected,
            &mut playedby, &mut ratingtmp,
        );
        assert!(c.abs() < 1e-3, "c={c}");
    }

    #[test]
    fn finds_nonzero_offset_that_reduces_deviation() {
        // Player 1 is underrated relative to what their score implies.
        let enc = vec![Encounter::from_counts(0, 1, 9, 0, 1)];
        let flagged = vec![false, false];
        let prefed = vec![true, false];
        let ratingof = vec![2000.0, 2000.0];
        let obtained = vec![9.0, 1.0];
        let mut expected = vec![0.0; 2];
        let mut playedby = vec![0; 2];
        let mut ratingtmp = vec![0.0; 2];

        let c = optimum_centerdelta(
            100.0, 1e-6, &enc, &flagged, &prefed, &ratingof, 0.0, 1.0 / 200.0, &obtained, &mut expected,
            &mut playedby, &mut ratingtmp,
        );
        // Player 1 (non-anchored) should move down since they are scoring
        // poorly; CenterAdjuster only shifts non-anchored players, so the
        // offset should be negative.
        assert!(c < 0.0, "c={c}");
    }
}
