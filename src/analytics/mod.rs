// Analytics core: pure functions over a league snapshot.
//
// No I/O, no shared state. Each function takes the snapshot by reference and
// returns freshly computed values; re-running with the same inputs produces
// the same output.

pub mod lineup;
pub mod luck;
pub mod power;
pub mod recap;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("insufficient data: {teams} team(s), {weeks} completed week(s)")]
    InsufficientData { teams: usize, weeks: u16 },

    #[error("week {week} is outside the completed range 1..={completed}")]
    InvalidWeek { week: u16, completed: u16 },

    #[error("unknown team `{name}`")]
    UnknownTeam { name: String },

    #[error("roster for team {team_id} week {week} has no usable players")]
    MalformedRoster { team_id: crate::league::TeamId, week: u16 },
}

/// Min-max normalize a signal to [0, 100).
///
/// Every value maps to `99.99 * (x - min) / (max - min)`. When the signal is
/// constant (all teams tied) every value maps to 50.0 rather than dividing by
/// zero. Applying this to an already-normalized signal yields identical
/// values, since the endpoints 0 and 99.99 map back onto themselves.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    let Some(min) = values.iter().cloned().reduce(f64::min) else {
        return Vec::new();
    };
    let max = values.iter().cloned().reduce(f64::max).unwrap_or(min);
    if (max - min).abs() < f64::EPSILON {
        return vec![50.0; values.len()];
    }
    values
        .iter()
        .map(|v| 99.99 * (v - min) / (max - min))
        .collect()
}
