//! RatingUpdater: one coordinate-descent pass across all non-anchored
//! players, damped by a saturating multiplier, followed by re-centering.

/// Computes the saturating multiplier `y = d / (kappa + d)` for an absolute
/// per-game error `d = |expected - obtained| / playedby`, and the signed
/// step `delta * y` to apply (negative when `expected > obtained`).
///
/// Shared by the full-population [`adjust_rating`] pass and the
/// single-scalar descent used by [`crate::superplayer::calc_ind_rating`].
pub fn saturating_step(expected: f64, obtained: f64, delta: f64, kappa: f64) -> (f64, f64) {
    let d = (expected - obtained).abs();
    let y = d / (kappa + d);
    let signed = if expected > obtained { -delta * y } else { delta * y };
    (signed, y)
}

/// One RatingUpdater pass (§4.4). Adjusts every non-flagged, non-anchored
/// `ratingof[j]` in place and returns the pass's *resolution*:
/// `max_j(y) * delta`.
///
/// Re-centers afterward so that either `ratingof[anchor] == general_average`
/// (single anchor) or the mean over non-flagged, non-anchored players equals
/// `general_average`; skipped entirely when `multiple_anchors_present`.
#[allow(clippy::too_many_arguments)]
pub fn adjust_rating(
    delta: f64,
    kappa: f64,
    flagged: &[bool],
    prefed: &[bool],
    expected: &[f64],
    obtained: &[f64],
    playedby: &[u32],
    general_average: f64,
    multiple_anchors_present: bool,
    anchor_use: bool,
    anchor: usize,
    ratingof: &mut [f64],
) -> f64 {
    let mut ymax = 0.0_f64;

    for j in 0..ratingof.len() {
        if flagged[j] || prefed[j] {
            continue;
        }
        let d = (expected[j] - obtained[j]).abs() / playedby[j] as f64;
        let y = d / (kappa + d);
        if y > ymax {
            ymax = y;
        }
        if expected[j] > obtained[j] {
            ratingof[j] -= delta * y;
        } else {
            ratingof[j] += delta * y;
        }
    }

    recenter(
        flagged,
        prefed,
        general_average,
        multiple_anchors_present,
        anchor_use,
        anchor,
        ratingof,
    );

    ymax * delta
}

/// Re-centers `ratingof` to `general_average`, either by subtracting the
/// anchor's excess (single-anchor mode) or the mean excess over non-flagged,
/// non-anchored players. No-op when `multiple_anchors_present`.
pub fn recenter(
    flagged: &[bool],
    prefed: &[bool],
    general_average: f64,
    multiple_anchors_present: bool,
    anchor_use: bool,
    anchor: usize,
    ratingof: &mut [f64],
) {
    if multiple_anchors_present {
        return;
    }

    let excess = if anchor_use {
        ratingof[anchor] - general_average
    } else {
        let mut accum = 0.0;
        let mut count = 0usize;
        for j in 0..ratingof.len() {
            if !flagged[j] {
                accum += ratingof[j];
                count += 1;
            }
        }
        accum / count as f64 - general_average
    };

    for j in 0..ratingof.len() {
        if !flagged[j] && !prefed[j] {
            ratingof[j] -= excess;
        }
    }
}

/// Re-centers `ratingof` against the anchor alone, the way the Conductor's
/// end-of-pass cleanup does (§4.10 step 7) — unlike [`recenter`], this is a
/// no-op when there is no single anchor in use (no fallback to the
/// population mean).
pub fn apply_anchor_recenter(anchor_use: bool, anchor: usize, general_average: f64, flagged: &[bool], prefed: &[bool], ratingof: &mut [f64]) {
    if !anchor_use {
        return;
    }
    let excess = ratingof[anchor] - general_average;
    for j in 0..ratingof.len() {
        if !flagged[j] && !prefed[j] {
            ratingof[j] -= excess;
        }
    }
}
