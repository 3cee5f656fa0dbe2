//! Core data model: encounters, the player table's scratch shape, and the
//! small set of scalars the Conductor threads through a fit.

/// An aggregated row for an ordered pair `(white, black)`.
///
/// Encounters are unique per ordered pair within a single aggregation pass;
/// re-aggregating (see [`crate::aggregate::AggregationMode`]) produces a
/// fresh list rather than mutating rows in place.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Encounter {
    /// Index of the first-mover (white) player.
    pub wh: usize,
    /// Index of the second-mover (black) player.
    pub bl: usize,
    /// Total games in this pairing.
    pub played: u32,
    /// Total score accumulated by `wh` across `played` games.
    pub wscore: f64,
    /// Win count for `wh`.
    pub w: u32,
    /// Draw count.
    pub d: u32,
    /// Loss count for `wh`.
    pub l: u32,
}

impl Encounter {
    /// Builds an encounter from game counts, deriving `played` and `wscore`.
    ///
    /// Panics in debug builds if `w + d + l` doesn't fit the invariant; this
    /// mirrors the legacy assumption that encounter aggregation already
    /// enforces `W + D + L == played` before the core ever sees a row.
    pub fn from_counts(wh: usize, bl: usize, w: u32, d: u32, l: u32) -> Self {
        let played = w + d + l;
        let wscore = w as f64 + 0.5 * d as f64;
        debug_assert!(played > 0, "encounter must have at least one game");
        Encounter {
            wh,
            bl,
            played,
            wscore,
            w,
            d,
            l,
        }
    }

    /// `true` when `W + D + L == played` and `2*wscore == 2W + D`, the two
    /// invariants every encounter must satisfy (§3, §8).
    pub fn is_consistent(&self) -> bool {
        self.w + self.d + self.l == self.played
            && (2.0 * self.wscore - (2 * self.w + self.d) as f64).abs() < 1e-9
    }
}

/// Classification of a player's rating problem, derived upstream of the core.
///
/// A super-winner or super-loser has a boundary observed score (all wins or
/// all losses against their recorded opposition) for which the ordinary
/// expected-score objective has no finite maximum-likelihood rating; see
/// [`crate::superplayer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PerformanceType {
    Normal,
    SuperWinner,
    SuperLoser,
}

/// Per-player classification and fit-control flags, held alongside the
/// dense rating arrays in [`crate::conductor::FitContext`].
#[derive(Debug, Clone)]
pub struct PlayerMeta {
    /// Excluded from the optimization entirely (e.g. isolated component).
    pub flagged: bool,
    /// Rating held fixed through the fit (an anchor).
    pub prefed: bool,
    pub performance_type: PerformanceType,
    /// Display name, used only when logging super-player identification.
    pub name: String,
}

impl PlayerMeta {
    pub fn normal(name: impl Into<String>) -> Self {
        PlayerMeta {
            flagged: false,
            prefed: false,
            performance_type: PerformanceType::Normal,
            name: name.into(),
        }
    }
}

/// The scalars threaded through a fit alongside the dense arrays.
#[derive(Debug, Clone, Copy)]
pub struct FitScalars {
    /// Additive bias applied to the first-mover's rating.
    pub white_advantage: f64,
    /// Equal-strength draw rate, in `[0, 1]`.
    pub draw_rate: f64,
    /// Fixed logistic scale.
    pub beta: f64,
    /// Target for mean-centering when no single anchor exists.
    pub general_average: f64,
    /// Index of the single anchor, valid iff `anchor_use && !multiple_anchors_present`.
    pub anchor: usize,
    pub anchor_use: bool,
    pub multiple_anchors_present: bool,
}

/// `{N_enc, white_advantage, draw_rate}` — the Conductor's terminal result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    pub n_enc: usize,
    pub white_advantage: f64,
    pub draw_rate: f64,
}
