//! DrawRateFitter: optimizes the equal-strength draw rate `dr0` against the
//! squared expected-vs-observed WDL error (§4.8), reusing
//! [`crate::kernel::draw_rate_fperf`] for the draw-probability model.

use crate::kernel::{draw_rate_fperf, xpect};
use crate::types::Encounter;

const START_DELTA: f64 = 0.5;
const START_DRAWRATE: f64 = 0.5;
const TERMINAL_DELTA: f64 = 0.0001;

/// `E(dr) = Σ_e [D·(1 − d_exp)² + (played − D)·d_exp²]` where
/// `d_exp = draw_rate_fperf(f, dr)`, matching `overallerrorE_fdrawrate`.
pub fn draw_rate_error(enc: &[Encounter], ratingof: &[f64], white_advantage: f64, beta: f64, dr: f64) -> f64 {
    let mut dp2 = 0.0;
    for e in enc {
        let f = xpect(ratingof[e.wh] + white_advantage, ratingof[e.bl], beta);
        let dexp = draw_rate_fperf(f, dr);
        dp2 += e.d as f64 * (1.0 - dexp) * (1.0 - dexp) + (e.played as f64 - e.d as f64) * dexp * dexp;
    }
    dp2
}

/// Optimizes `dr0` for a fixed `white_advantage`, always seeding `dr = 0.5`
/// with `delta = 0.5`. Terminates once `delta <= 0.0001`.
pub fn adjust_draw_rate(white_advantage: f64, ratingof: &[f64], enc: &[Encounter], beta: f64) -> f64 {
    let mut delta = START_DELTA;
    let mut dr = START_DRAWRATE;

    loop {
        let ei = draw_rate_error(enc, ratingof, white_advantage, beta, dr - delta);
        let ej = draw_rate_error(enc, ratingof, white_advantage, beta, dr);
        let ek = draw_rate_error(enc, ratingof, white_advantage, beta, dr + delta);

        if ei >= ej && ej <= ek {
            delta /= 2.0;
        } else if ej >= ei && ei <= ek {
            dr -= delta;
        } else if ei >= ek && ek <= ej {
            dr += delta;
        }

        if !(delta > TERMINAL_DELTA) {
            break;
        }
    }

    dr.clamp(0.0, 1.0)
}
