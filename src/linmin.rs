//! A bracketed 1-D minimizer combining adaptive bracket expansion with a
//! parabolic-fit refinement (§4.6). Used for the white-advantage,
//! center-offset, and draw-rate sub-problems.
//!
//! The legacy source passes a `(double, const void*) -> double` function
//! pointer plus an opaque context pointer; here the objective is simply an
//! `FnMut(f64) -> f64` closure, letting callers capture whatever scratch
//! they need instead of threading a raw pointer.

/// Denominator cutoff below which the parabolic fit is rejected as
/// numerically unreliable, and the gap-size cutoff below which a bracket is
/// considered too narrow to fit a parabola through at all.
const PARABOLA_DENOM_CUTOFF: f64 = 1e-64;
const BRACKET_GAP_EPSILON: f64 = 0.0000001;

/// Vertex of the parabola interpolating three sorted samples
/// `(x[1],y[1]), (x[2],y[2]), (x[3],y[3])`, or `None` if the fit is
/// unreliable (denominator below cutoff) or not a minimum (concave down,
/// tested via `x12*y13 <= y12*x13`).
///
/// Subtracts the bracket midpoint before computing, to reduce cancellation
/// error the way the legacy `find_parabolic_min_x` does.
fn find_parabolic_min_x(x: &[f64; 4], y: &[f64; 4]) -> Option<f64> {
    let reference = (x[1] + x[3]) / 2.0;
    let x1 = x[1] - reference;
    let x2 = x[2] - reference;
    let x3 = x[3] - reference;

    let y12 = y[1] - y[2];
    let x12 = x1 - x2;
    let y13 = y[1] - y[3];
    let x13 = x1 - x3;
    let s12 = x1 * x1 - x2 * x2;
    let s13 = x1 * x1 - x3 * x3;

    if x12 * y13 <= y12 * x13 {
        return None;
    }

    let d1 = y13 * x12;
    let d2 = y12 * x13;
    let den = d1 - d2;
    if den < PARABOLA_DENOM_CUTOFF {
        return None;
    }

    let res = ((y13 * s12 - y12 * s13) / den) / 2.0;
    if !res.is_finite() {
        return None;
    }
    Some(res + reference)
}

/// The parabolic vertex when the bracket is wide enough and well-formed,
/// falling back to the bracket midpoint otherwise.
fn optimum_center(x: &[f64; 4], y: &[f64; 4]) -> f64 {
    let wide_enough = (x[3] - x[1]) > BRACKET_GAP_EPSILON
        && (x[2] - x[1]) > BRACKET_GAP_EPSILON
        && (x[3] - x[2]) > BRACKET_GAP_EPSILON;

    if wide_enough {
        if let Some(result) = find_parabolic_min_x(x, y) {
            return result;
        }
    }
    (x[3] + x[1]) / 2.0
}

/// Stage B: interior refinement of an already-unimodal bracket `[a, b]`
/// down to a width of `limit`, returning the best interior point found.
fn quadfit1d_2(limit: f64, a: f64, b: f64, f: &mut impl FnMut(f64) -> f64) -> f64 {
    let mut rightchop = 0i32;
    let mut leftchop = 0i32;
    let mut x = [0.0_f64; 4];
    let mut y = [0.0_f64; 4];

    x[1] = a.min(b);
    x[3] = a.max(b);
    x[2] = (a + b) / 2.0;

    for i in 1..4 {
        y[i] = f(x[i]);
    }

    x[0] = optimum_center(&x, &y);
    y[0] = f(x[0]);

    loop {
        let mut equality = false;

        if x[0] < x[2] && y[0] <= y[2] {
            rightchop += 1;
            leftchop = 0;
            x[3] = x[2];
            y[3] = y[2];
            x[2] = x[0];
            y[2] = y[0];
        } else if x[0] > x[2] && y[0] > y[2] {
            rightchop += 1;
            leftchop = 0;
            x[3] = x[0];
            y[3] = y[0];
        } else if x[0] < x[2] && y[0] > y[2] {
            rightchop = 0;
            leftchop += 1;
            x[1] = x[0];
            y[1] = y[0];
        } else if x[0] > x[2] && y[0] <= y[2] {
            rightchop = 0;
            leftchop += 1;
            x[1] = x[2];
            y[1] = y[2];
            x[2] = x[0];
            y[2] = y[0];
        } else {
            equality = true;
            if x[3] - x[2] > x[2] - x[1] {
                x[0] = x[2] + 0.01 * (x[3] - x[2]);
            } else {
                x[0] = x[2] - 0.01 * (x[2] - x[1]);
            }
        }

        if equality {
            y[0] = f(x[0]);
        } else if rightchop < 3 && leftchop < 3 {
            x[0] = optimum_center(&x, &y);
            y[0] = f(x[0]);
        } else {
            let half = (x[3] + x[1]) / 2.0;
            x[0] = x[2];

            if x[3] - x[2] > 2.0 * (x[2] - x[1]) {
                loop {
                    x[0] += x[0] - x[1];
                    y[0] = f(x[0]);
                    if !(x[0] < half && y[0] <= y[2]) {
                        break;
                    }
                }
            } else if x[3] - x[2] < (x[2] - x[1]) / 2.0 {
                loop {
                    x[0] -= x[3] - x[0];
                    y[0] = f(x[0]);
                    if !(x[0] > half && y[0] <= y[2]) {
                        break;
                    }
                }
            } else {
                x[0] = (x[2] + if leftchop == 0 { x[1] } else { x[3] }) / 2.0;
                y[0] = f(x[0]);
            }
        }

        if (x[3] - x[1]).abs() <= limit {
            break;
        }
    }

    x[2]
}

/// Stage A: expands a bracket around `(a+b)/2` until it contains a local
/// minimum, then hands off to [`quadfit1d_2`] for the interior refinement.
/// This is the entry point for CenterAdjuster (§4.5).
pub fn quadfit1d(limit: f64, a: f64, b: f64, f: &mut impl FnMut(f64) -> f64) -> f64 {
    let cente = (a + b) / 2.0;
    let mut delta_neg = (b - a).abs() / 2.0;
    let mut delta_pos = delta_neg;

    let mut ei = f(cente - delta_neg);
    let mut ej = f(cente);
    let mut ek = f(cente + delta_pos);

    loop {
        if ei >= ej && ej <= ek {
            return quadfit1d_2(limit, cente - delta_neg, cente + delta_pos, f);
        } else if ej >= ei && ei <= ek {
            delta_neg *= 2.0;
            ek = ej;
            ej = ei;
            ei = f(cente - delta_neg);
        } else if ei >= ek && ek <= ej {
            delta_pos *= 2.0;
            ei = ej;
            ej = ek;
            ek = f(cente + delta_pos);
        } else {
            // Every other branch above is exhaustive for three real
            // samples; a NaN objective is the only way to reach here.
            return cente;
        }
    }
}
