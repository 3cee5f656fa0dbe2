//! WhiteAdvantageFitter: optimizes the first-mover bonus against squared
//! expected-vs-observed error (§4.7).
//!
//! Unlike CenterAdjuster, this does not hand off to [`crate::linmin`]'s
//! Stage B refinement — it runs its own coarser ternary directly on the
//! aggregated WDL error, matching the legacy `adjust_wadv`.

use crate::kernel::xpect;
use crate::types::Encounter;

pub const START_DELTA: f64 = 100.0;
const TERMINAL_DELTA: f64 = 0.01;
const BOUND: f64 = 1000.0;

/// `E(w) = sum over e of [W*(1-f)^2 + D*(0.5-f)^2 + L*(0-f)^2]` with
/// `f = xpect(ratingof[wh] + w, ratingof[bl], beta)`.
pub fn white_advantage_error(enc: &[Encounter], ratingof: &[f64], beta: f64, w: f64) -> f64 {
    let mut dp2 = 0.0;
    for e in enc {
        let f = xpect(ratingof[e.wh] + w, ratingof[e.bl], beta);
        dp2 += e.w as f64 * (1.0 - f).powi(2) + e.d as f64 * (0.5 - f).powi(2) + e.l as f64 * f.powi(2);
    }
    dp2
}

/// Optimizes `w` starting from `start_wadv` with initial step `start_delta`
/// (`START_DELTA` the first call of a fit, the previous pass's resolution
/// thereafter). Terminates when `delta <= 0.01` or `|w| >= 1000`.
pub fn adjust_white_advantage(
    start_wadv: f64,
    ratingof: &[f64],
    enc: &[Encounter],
    beta: f64,
    start_delta: f64,
) -> f64 {
    let mut delta = start_delta;
    let mut wa = start_wadv;

    loop {
        let ei = white_advantage_error(enc, ratingof, beta, wa - delta);
        let ej = white_advantage_error(enc, ratingof, beta, wa);
        let ek = white_advantage_error(enc, ratingof, beta, wa + delta);

        if ei >= ej && ej <= ek {
            delta /= 2.0;
        } else if ej >= ei && ei <= ek {
            wa -= delta;
        } else if ei >= ek && ek <= ej {
            wa += delta;
        }

        if !(delta > TERMINAL_DELTA && -BOUND < wa && wa < BOUND) {
            break;
        }
    }

    wa
}
