//! `FitSchedule`/`FitConfig`: the plain-data record the legacy source kept
//! as hard-coded locals and `#define`s, now overridable without touching
//! Conductor internals.

/// The outer-loop schedule. `Default` reproduces the legacy constants
/// bit-for-bit; tests and embedders override individual fields (e.g.
/// shrinking `outer_rounds` for a fast smoke test) via struct-update syntax.
#[derive(Debug, Clone, PartialEq)]
pub struct FitSchedule {
    /// Inner iterations per phase.
    pub rounds: u32,
    /// Phases per outer pass.
    pub phases: u32,
    /// Initial RatingUpdater step size.
    pub start_delta: f64,
    /// Initial RatingUpdater saturation constant.
    pub start_kappa: f64,
    /// Divides `delta`/multiplies `kappa` after each phase (2.0 legacy).
    pub kappa_decay: f64,
    /// Per-iteration multiplier applied to `kappa` within a phase (0.995 legacy).
    pub kk_decay: f64,
    /// Normalized-deviation threshold below which a phase stops early.
    pub min_devia: f64,
    /// Default CenterAdjuster terminal bracket width.
    pub min_resol_default: f64,
    /// `(times_remaining, min_resol)` loosenings applied on the first two
    /// outer passes (`times == 9` then `times == 8` counting down from the
    /// default `outer_rounds = 10`).
    pub min_resol_overrides: [(u32, f64); 2],
    /// Outer pass budget (`times_ori`/`times` in the legacy source).
    pub outer_rounds: u32,
    /// CenterAdjuster search half-width.
    pub center_bracket: f64,
    /// WhiteAdvantageFitter terminal step size.
    pub white_advantage_terminal: f64,
    /// DrawRateFitter terminal step size.
    pub draw_rate_terminal: f64,
    /// SuperPlayerRater refinement terminal unfitness.
    pub super_player_terminal: f64,
}

impl Default for FitSchedule {
    fn default() -> Self {
        FitSchedule {
            rounds: 10_000,
            phases: 20,
            start_delta: 200.0,
            start_kappa: 0.05,
            kappa_decay: 2.0,
            kk_decay: 0.995,
            min_devia: 1e-9,
            min_resol_default: 1e-6,
            min_resol_overrides: [(9, 10.0), (8, 0.1)],
            outer_rounds: 10,
            center_bracket: 100.0,
            white_advantage_terminal: 0.01,
            draw_rate_terminal: 1e-4,
            super_player_terminal: 1e-10,
        }
    }
}

impl FitSchedule {
    /// The `min_resol` in force for the outer pass with `times` passes
    /// remaining (counting down from `outer_rounds`), applying the
    /// first-two-pass loosenings before falling back to the default.
    pub fn min_resol_for(&self, times_remaining: u32) -> f64 {
        for &(times, resol) in &self.min_resol_overrides {
            if times_remaining == times {
                return resol;
            }
        }
        self.min_resol_default
    }
}

/// Behavior flags plus the schedule, read by the Conductor at the start of
/// every fit.
#[derive(Debug, Clone, PartialEq)]
pub struct FitConfig {
    pub schedule: FitSchedule,
    pub adjust_white_advantage: bool,
    pub adjust_draw_rate: bool,
}

impl Default for FitConfig {
    fn default() -> Self {
        FitConfig { schedule: FitSchedule::default(), adjust_white_advantage: true, adjust_draw_rate: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_matches_legacy_constants() {
        let schedule = FitSchedule::default();
        assert_eq!(schedule.rounds, 10_000);
        assert_eq!(schedule.phases, 20);
        assert_eq!(schedule.start_delta, 200.0);
        assert_eq!(schedule.start_kappa, 0.05);
        assert_eq!(schedule.min_devia, 1e-9);
        assert_eq!(schedule.min_resol_default, 1e-6);
        assert_eq!(schedule.outer_rounds, 10);
    }

    #[test]
    fn min_resol_loosens_on_first_two_outer_passes() {
        let schedule = FitSchedule::default();
        assert_eq!(schedule.min_resol_for(9), 10.0);
        assert_eq!(schedule.min_resol_for(8), 0.1);
        assert_eq!(schedule.min_resol_for(7), 1e-6);
        assert_eq!(schedule.min_resol_for(10), 1e-6);
    }
}
