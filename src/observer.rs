//! `FitObserver`: translates the legacy `printf` convergence trace into a
//! capability the Conductor calls instead of printing directly, so
//! embedders can log, render a progress bar, or stay silent (§4.14).

/// One RatingUpdater+CenterAdjuster inner-iteration result, as reported to
/// an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationReport {
    pub outer_pass: u32,
    pub phase: u32,
    pub iteration: u32,
    pub normalized_deviation: f64,
    pub resolution: f64,
}

/// Callbacks the Conductor fires over the course of a fit. The default
/// implementation is a no-op; [`TracingObserver`] is the library default
/// used unless a caller installs something else.
pub trait FitObserver {
    fn on_outer_pass_start(&mut self, _outer_pass: u32, _times_remaining: u32) {}
    fn on_iteration(&mut self, _report: IterationReport) {}
    fn on_phase_end(&mut self, _outer_pass: u32, _phase: u32) {}
    fn on_white_advantage_fitted(&mut self, _outer_pass: u32, _white_advantage: f64, _progress: f64) {}
    fn on_draw_rate_fitted(&mut self, _outer_pass: u32, _draw_rate: f64) {}
    fn on_super_player_rated(&mut self, _player: usize, _name: &str, _rating: f64) {}
    fn on_fit_complete(&mut self, _n_enc: usize, _white_advantage: f64, _draw_rate: f64) {}
}

/// No-op observer, used when a caller doesn't want any reporting.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl FitObserver for NullObserver {}

/// Default library observer: emits `tracing` events at `trace`/`debug`
/// level instead of the legacy `printf` trace.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FitObserver for TracingObserver {
    fn on_outer_pass_start(&mut self, outer_pass: u32, times_remaining: u32) {
        tracing::debug!(outer_pass, times_remaining, "starting outer pass");
    }

    fn on_iteration(&mut self, report: IterationReport) {
        tracing::trace!(
            outer_pass = report.outer_pass,
            phase = report.phase,
            iteration = report.iteration,
            normalized_deviation = report.normalized_deviation,
            resolution = report.resolution,
            "inner iteration"
        );
    }

    fn on_phase_end(&mut self, outer_pass: u32, phase: u32) {
        tracing::debug!(outer_pass, phase, "phase ended");
    }

    fn on_white_advantage_fitted(&mut self, outer_pass: u32, white_advantage: f64, progress: f64) {
        tracing::debug!(outer_pass, white_advantage, progress, "white advantage fitted");
    }

    fn on_draw_rate_fitted(&mut self, outer_pass: u32, draw_rate: f64) {
        tracing::debug!(outer_pass, draw_rate, "draw rate fitted");
    }

    fn on_super_player_rated(&mut self, player: usize, name: &str, rating: f64) {
        tracing::debug!(player, name, rating, "super-player rated");
    }

    fn on_fit_complete(&mut self, n_enc: usize, white_advantage: f64, draw_rate: f64) {
        tracing::info!(n_enc, white_advantage, draw_rate, "fit complete");
    }
}
