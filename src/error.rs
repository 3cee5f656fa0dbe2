//! The fit's typed error surface.
//!
//! Non-descent (a RatingUpdater step that increases Deviation) is NOT an
//! error here — it is expected behavior as the schedule tightens, handled
//! internally by rollback. Only the two fatal conditions from the design
//! doc's error-handling section produce a [`FitError`].

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FitError {
    /// Scratch allocation for the per-player arrays failed.
    #[error("failed to allocate fit scratch for {n_players} players")]
    Allocation { n_players: usize },

    /// A super-player's own encounter list referenced a player index that is
    /// neither `wh` nor `bl` of that encounter — a data-integrity violation
    /// upstream of the core.
    #[error("encounter {encounter_index} does not reference the super-player it was collected for")]
    DanglingEncounterPlayer { encounter_index: usize },

    /// The parabolic-minimizer vertex came out non-finite despite the
    /// denominator cutoff guard (`optimum_center`'s defensive invariant).
    #[error("parabolic minimizer produced a non-finite vertex")]
    NonFiniteParabolicVertex,
}
