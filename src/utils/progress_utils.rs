use indicatif::{ProgressBar, ProgressStyle};

use crate::observer::{FitObserver, IterationReport};
use crate::schedule::FitSchedule;

pub fn progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    bar
}

/// A [`FitObserver`] that renders one progress bar per outer pass, tracking
/// phases completed out of the schedule's total. Built for the demo CLI;
/// the library's own default is [`crate::observer::TracingObserver`].
pub struct IndicatifObserver {
    phases_per_pass: u64,
    bar: Option<ProgressBar>,
}

impl IndicatifObserver {
    pub fn new(schedule: &FitSchedule) -> Self {
        IndicatifObserver { phases_per_pass: schedule.phases as u64, bar: None }
    }
}

impl FitObserver for IndicatifObserver {
    fn on_outer_pass_start(&mut self, outer_pass: u32, _times_remaining: u32) {
        let bar = progress_bar(self.phases_per_pass);
        bar.set_message(format!("outer pass {outer_pass}"));
        self.bar = Some(bar);
    }

    fn on_iteration(&mut self, report: IterationReport) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("deviation {:.6}", report.normalized_deviation));
        }
    }

    fn on_phase_end(&mut self, _outer_pass: u32, _phase: u32) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn on_white_advantage_fitted(&mut self, _outer_pass: u32, white_advantage: f64, progress: f64) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(format!("white advantage {white_advantage:.2} (progress {progress:.4})"));
        }
    }

    fn on_fit_complete(&mut self, n_enc: usize, white_advantage: f64, draw_rate: f64) {
        tracing::info!(n_enc, white_advantage, draw_rate, "fit complete");
    }
}
