//! Conductor: the outer loop sequencing RatingUpdater → CenterAdjuster to
//! convergence, then WhiteAdvantageFitter, DrawRateFitter, and
//! SuperPlayerRater, repeating until white advantage stops moving (§4.10).

use crate::aggregate::{calc_expected, calc_obtained_playedby, AggregationMode, EncounterSource};
use crate::center::{apply_center_offset, optimum_centerdelta};
use crate::deviation::{deviation, normalized_deviation};
use crate::draw_rate::adjust_draw_rate;
use crate::error::FitError;
use crate::observer::{FitObserver, IterationReport};
use crate::schedule::FitConfig;
use crate::superplayer::rate_super_player;
use crate::types::{Encounter, FitOutcome, FitScalars, PerformanceType, PlayerMeta};
use crate::update::{adjust_rating, apply_anchor_recenter};
use crate::white_advantage::adjust_white_advantage;

/// The `MIN_RESOL` the legacy source keeps fixed at `1e-6` regardless of the
/// loosened bracket width fed into `optimum_centerdelta` on the first two
/// outer passes — see `rating.c`'s `changed = absol(cd) > MIN_RESOL`.
const CENTER_OFFSET_EPSILON: f64 = 1e-6;

/// Every dense array and scalar a fit owns for its duration, allocated once
/// up front and released when the `FitContext` drops. Not `Send`-shared
/// across fits: a bootstrap resample constructs one of these per resample
/// (§5, §4.16).
pub struct FitContext {
    pub enc: Vec<Encounter>,
    pub ratingof: Vec<f64>,
    obtained: Vec<f64>,
    playedby: Vec<u32>,
    expected: Vec<f64>,
    ratingbk: Vec<f64>,
    ratingtmp: Vec<f64>,
    flagged: Vec<bool>,
    prefed: Vec<bool>,
    performance_type: Vec<PerformanceType>,
    names: Vec<String>,
    pub scalars: FitScalars,
}

impl FitContext {
    /// Allocates a fresh scratch set for `players.len()` players over the
    /// initial encounter list `enc`. `ratingof` is seeded from each
    /// `PlayerMeta`'s caller-provided initial rating via `initial_ratings`,
    /// kept separate from `PlayerMeta` since the legacy source treats rating
    /// as a distinct dense array from classification.
    pub fn new(players: Vec<PlayerMeta>, initial_ratings: Vec<f64>, enc: Vec<Encounter>, scalars: FitScalars) -> Result<Self, FitError> {
        let n = players.len();
        if initial_ratings.len() != n {
            return Err(FitError::Allocation { n_players: n });
        }

        let mut flagged = Vec::with_capacity(n);
        let mut prefed = Vec::with_capacity(n);
        let mut performance_type = Vec::with_capacity(n);
        let mut names = Vec::with_capacity(n);
        for p in players {
            flagged.push(p.flagged);
            prefed.push(p.prefed);
            performance_type.push(p.performance_type);
            names.push(p.name);
        }

        Ok(FitContext {
            enc,
            ratingof: initial_ratings,
            obtained: vec![0.0; n],
            playedby: vec![0; n],
            expected: vec![0.0; n],
            ratingbk: vec![0.0; n],
            ratingtmp: vec![0.0; n],
            flagged,
            prefed,
            performance_type,
            names,
            scalars,
        })
    }

    pub fn n_players(&self) -> usize {
        self.ratingof.len()
    }

    /// Whether player `j` is currently excluded from the optimization.
    pub fn is_flagged(&self, j: usize) -> bool {
        self.flagged[j]
    }
}

/// Runs a fit to convergence against `ctx`, using `source` to re-aggregate
/// encounters around the super-player pass, reporting progress to
/// `observer`. Mutates `ctx.ratingof` and `ctx.scalars` in place; the
/// returned [`FitOutcome`] mirrors what's left in `ctx.scalars` for
/// convenience.
pub fn run(
    ctx: &mut FitContext,
    source: &dyn EncounterSource,
    config: &FitConfig,
    observer: &mut dyn FitObserver,
) -> Result<FitOutcome, FitError> {
    let schedule = &config.schedule;

    let times_ori = if config.adjust_white_advantage { schedule.outer_rounds } else { 1 };
    let mut times = times_ori;
    let mut wa_progress = crate::white_advantage::START_DELTA;
    let mut wa_previous = ctx.scalars.white_advantage;
    let mut done_once = false;

    while times > 0 && wa_progress > schedule.white_advantage_terminal {
        times -= 1;
        let outer_pass = times_ori - times - 1;
        observer.on_outer_pass_start(outer_pass, times);

        let mut delta = schedule.start_delta;
        let mut kappa = schedule.start_kappa;
        let min_resol = schedule.min_resol_for(times);

        calc_obtained_playedby(&ctx.enc, &mut ctx.obtained, &mut ctx.playedby);
        calc_expected(&ctx.enc, &ctx.ratingof, ctx.scalars.white_advantage, ctx.scalars.beta, &mut ctx.expected, &mut ctx.playedby);
        let mut olddev = deviation(&ctx.flagged, &ctx.expected, &ctx.obtained, &ctx.playedby);
        let n_games: u32 = ctx.enc.iter().map(|e| e.played).sum();

        let mut resol = 0.0;
        let mut phase = 0;
        while phase < schedule.phases {
            let mut kk = 1.0_f64;
            let mut iteration = 0;

            while iteration < schedule.rounds {
                ctx.ratingbk.copy_from_slice(&ctx.ratingof);

                resol = adjust_rating(
                    delta,
                    kappa * kk,
                    &ctx.flagged,
                    &ctx.prefed,
                    &ctx.expected,
                    &ctx.obtained,
                    &ctx.playedby,
                    ctx.scalars.general_average,
                    ctx.scalars.multiple_anchors_present,
                    ctx.scalars.anchor_use,
                    ctx.scalars.anchor,
                    &mut ctx.ratingof,
                );

                calc_expected(&ctx.enc, &ctx.ratingof, ctx.scalars.white_advantage, ctx.scalars.beta, &mut ctx.expected, &mut ctx.playedby);
                let mut curdev = deviation(&ctx.flagged, &ctx.expected, &ctx.obtained, &ctx.playedby);

                let mut failed = false;
                if curdev >= olddev {
                    ctx.ratingof.copy_from_slice(&ctx.ratingbk);
                    calc_expected(&ctx.enc, &ctx.ratingof, ctx.scalars.white_advantage, ctx.scalars.beta, &mut ctx.expected, &mut ctx.playedby);
                    curdev = deviation(&ctx.flagged, &ctx.expected, &ctx.obtained, &ctx.playedby);
                    let tolerance = f64::EPSILON.sqrt() * olddev.abs().max(1.0);
                    debug_assert!(
                        (curdev - olddev).abs() <= tolerance,
                        "rollback should restore the prior deviation within tolerance"
                    );
                    failed = true;
                }

                let c = optimum_centerdelta(
                    schedule.center_bracket,
                    min_resol,
                    &ctx.enc,
                    &ctx.flagged,
                    &ctx.prefed,
                    &ctx.ratingof,
                    ctx.scalars.white_advantage,
                    ctx.scalars.beta,
                    &ctx.obtained,
                    &mut ctx.expected,
                    &mut ctx.playedby,
                    &mut ctx.ratingtmp,
                );
                let changed = c.abs() > CENTER_OFFSET_EPSILON;
                if changed {
                    apply_center_offset(c, &ctx.flagged, &ctx.prefed, &mut ctx.ratingof);
                    calc_expected(&ctx.enc, &ctx.ratingof, ctx.scalars.white_advantage, ctx.scalars.beta, &mut ctx.expected, &mut ctx.playedby);
                    curdev = deviation(&ctx.flagged, &ctx.expected, &ctx.obtained, &ctx.playedby);
                }
                failed = failed && !changed;

                olddev = curdev;

                if failed {
                    break;
                }

                let outputdev = normalized_deviation(curdev, n_games.max(1));
                observer.on_iteration(IterationReport {
                    outer_pass,
                    phase,
                    iteration,
                    normalized_deviation: outputdev,
                    resolution: resol,
                });

                if outputdev < schedule.min_devia || (resol + c) < min_resol {
                    break;
                }

                kk *= schedule.kk_decay;
                iteration += 1;
            }

            delta /= schedule.kappa_decay;
            kappa *= schedule.kappa_decay;
            let outputdev = normalized_deviation(olddev, n_games.max(1));
            observer.on_phase_end(outer_pass, phase);
            phase += 1;

            if outputdev < schedule.min_devia || resol < min_resol {
                break;
            }
        }

        if config.adjust_white_advantage {
            let seed_delta = if done_once { resol } else { crate::white_advantage::START_DELTA };
            ctx.scalars.white_advantage = adjust_white_advantage(
                ctx.scalars.white_advantage,
                &ctx.ratingof,
                &ctx.enc,
                ctx.scalars.beta,
                seed_delta,
            );
            done_once = true;
            wa_progress = (wa_previous - ctx.scalars.white_advantage).abs();
            wa_previous = ctx.scalars.white_advantage;
            observer.on_white_advantage_fitted(outer_pass, ctx.scalars.white_advantage, wa_progress);
        }

        if config.adjust_draw_rate {
            ctx.scalars.draw_rate = adjust_draw_rate(ctx.scalars.white_advantage, &ctx.ratingof, &ctx.enc, ctx.scalars.beta);
            observer.on_draw_rate_fitted(outer_pass, ctx.scalars.draw_rate);
        }

        ctx.enc = source.aggregate(AggregationMode::Full);
        calc_obtained_playedby(&ctx.enc, &mut ctx.obtained, &mut ctx.playedby);
        rate_all_super_players(ctx, observer)?;
        ctx.enc = source.aggregate(AggregationMode::NoFlagged);
        calc_obtained_playedby(&ctx.enc, &mut ctx.obtained, &mut ctx.playedby);

        if !ctx.scalars.multiple_anchors_present {
            apply_anchor_recenter(
                ctx.scalars.anchor_use,
                ctx.scalars.anchor,
                ctx.scalars.general_average,
                &ctx.flagged,
                &ctx.prefed,
                &mut ctx.ratingof,
            );
        }
    }

    let outcome = FitOutcome {
        n_enc: ctx.enc.len(),
        white_advantage: ctx.scalars.white_advantage,
        draw_rate: ctx.scalars.draw_rate,
    };
    observer.on_fit_complete(outcome.n_enc, outcome.white_advantage, outcome.draw_rate);
    Ok(outcome)
}

/// Rates every super-player found in `ctx.performance_type`, building each
/// one's own-encounter index list from the current `ctx.enc` and clearing
/// its flagged bit once rated (§4.9).
fn rate_all_super_players(ctx: &mut FitContext, observer: &mut dyn FitObserver) -> Result<(), FitError> {
    for j in 0..ctx.n_players() {
        let performance_type = ctx.performance_type[j];
        if performance_type == PerformanceType::Normal {
            continue;
        }

        let encounter_indices: Vec<usize> =
            ctx.enc.iter().enumerate().filter(|(_, e)| e.wh == j || e.bl == j).map(|(idx, _)| idx).collect();

        let rating = rate_super_player(
            j,
            &ctx.enc,
            &encounter_indices,
            &ctx.ratingof,
            ctx.scalars.white_advantage,
            ctx.scalars.beta,
            performance_type,
            ctx.obtained[j],
        )?;
        ctx.ratingof[j] = rating;
        ctx.flagged[j] = false;
        observer.on_super_player_rated(j, &ctx.names[j], rating);
    }
    Ok(())
}
