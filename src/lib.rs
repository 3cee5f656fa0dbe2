pub mod aggregate;
pub mod args;
pub mod bootstrap;
pub mod center;
pub mod conductor;
pub mod deviation;
pub mod draw_rate;
pub mod error;
pub mod kernel;
pub mod linmin;
pub mod observer;
pub mod schedule;
pub mod superplayer;
pub mod types;
pub mod update;
pub mod utils;
pub mod white_advantage;

pub use conductor::{run, FitContext};
pub use error::FitError;
pub use schedule::{FitConfig, FitSchedule};
pub use types::{Encounter, FitOutcome, FitScalars, PerformanceType, PlayerMeta};
