// Operation dispatch: map a named operation plus arguments onto the
// analytics layer and render the result as chat text.
//
// Both entry points go through here: the scheduler posts the operation a
// timer fired for, and the CLI's `send`/`show` commands parse the operation
// name from the command line.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::analytics::lineup::optimal_scores;
use crate::analytics::luck::{activity_ranking, luck_index, win_matrix};
use crate::analytics::power::power_rankings;
use crate::analytics::recap::weekly_recap;
use crate::analytics::AnalyticsError;
use crate::league::{LeagueSnapshot, TeamId};
use crate::report;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown operation `{0}`")]
    UnknownOperation(String),

    #[error("operation `{op}` requires {what}")]
    MissingArgument { op: Operation, what: &'static str },

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Scoreboard,
    Projections,
    Standings,
    Matchups,
    CloseScores,
    PowerRankings,
    OptimalScores,
    Lineup,
    WinMatrix,
    LuckIndex,
    Monitor,
    Waivers,
    Trophies,
}

impl Operation {
    pub const ALL: &'static [Operation] = &[
        Operation::Scoreboard,
        Operation::Projections,
        Operation::Standings,
        Operation::Matchups,
        Operation::CloseScores,
        Operation::PowerRankings,
        Operation::OptimalScores,
        Operation::Lineup,
        Operation::WinMatrix,
        Operation::LuckIndex,
        Operation::Monitor,
        Operation::Waivers,
        Operation::Trophies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Scoreboard => "scoreboard",
            Operation::Projections => "projections",
            Operation::Standings => "standings",
            Operation::Matchups => "matchups",
            Operation::CloseScores => "close-scores",
            Operation::PowerRankings => "power-rankings",
            Operation::OptimalScores => "optimal-scores",
            Operation::Lineup => "lineup",
            Operation::WinMatrix => "win-matrix",
            Operation::LuckIndex => "luck-index",
            Operation::Monitor => "monitor",
            Operation::Waivers => "waivers",
            Operation::Trophies => "trophies",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scoreboard" | "scores" => Ok(Operation::Scoreboard),
            "projections" | "projected" => Ok(Operation::Projections),
            "standings" => Ok(Operation::Standings),
            "matchups" => Ok(Operation::Matchups),
            "close-scores" | "close_scores" => Ok(Operation::CloseScores),
            "power-rankings" | "power_rankings" | "power" => Ok(Operation::PowerRankings),
            "optimal-scores" | "optimal_scores" | "optimal" => Ok(Operation::OptimalScores),
            "lineup" => Ok(Operation::Lineup),
            "win-matrix" | "win_matrix" => Ok(Operation::WinMatrix),
            "luck-index" | "luck_index" | "luck" => Ok(Operation::LuckIndex),
            "monitor" => Ok(Operation::Monitor),
            "waivers" | "waiver-report" => Ok(Operation::Waivers),
            "trophies" | "recap" => Ok(Operation::Trophies),
            other => Err(DispatchError::UnknownOperation(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// One operation invocation. Unset fields fall back to sensible defaults:
/// live operations use the current week, retrospective ones the last
/// completed week, and the waiver report uses today's date.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    pub op: Operation,
    pub week: Option<u16>,
    pub team: Option<&'a str>,
    pub date: Option<NaiveDate>,
}

impl<'a> Request<'a> {
    pub fn new(op: Operation) -> Self {
        Self {
            op,
            week: None,
            team: None,
            date: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct Dispatcher {
    timezone: Tz,
}

impl Dispatcher {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Render one operation against a snapshot.
    pub fn render(
        &self,
        snapshot: &LeagueSnapshot,
        request: &Request<'_>,
    ) -> Result<String, DispatchError> {
        let live_week = request.week.unwrap_or(snapshot.current_week);
        let done_week = request
            .week
            .unwrap_or_else(|| snapshot.completed_weeks().max(1));

        let text = match request.op {
            Operation::Scoreboard => report::scoreboard(snapshot, live_week),
            Operation::Projections => report::projected_scoreboard(snapshot, live_week),
            Operation::Standings => report::standings(snapshot),
            Operation::Matchups => report::matchups(snapshot, live_week),
            Operation::CloseScores => report::close_scores(snapshot, live_week),
            Operation::Monitor => report::monitor(snapshot, live_week),
            Operation::Waivers => {
                let date = request.date.unwrap_or_else(|| {
                    Utc::now().with_timezone(&self.timezone).date_naive()
                });
                report::waiver_report(snapshot, date, self.timezone)
            }
            Operation::PowerRankings => {
                let entries = power_rankings(snapshot, done_week, self.prior_order(snapshot, done_week).as_deref())?;
                report::power_rankings(snapshot, &entries)
            }
            Operation::OptimalScores => {
                let analyses = optimal_scores(snapshot, done_week)?;
                report::optimal_scores(snapshot, &analyses)
            }
            Operation::Lineup => {
                let Some(team) = request.team else {
                    return Err(DispatchError::MissingArgument {
                        op: request.op,
                        what: "a team name",
                    });
                };
                let analysis =
                    crate::analytics::lineup::team_lineup_analysis(snapshot, team, done_week)?;
                report::lineup_efficiency(snapshot, &analysis)
            }
            Operation::WinMatrix => {
                let matrix = win_matrix(snapshot);
                report::win_matrix_report(snapshot, &matrix)
            }
            Operation::LuckIndex => {
                let entries = luck_index(snapshot)?;
                report::luck_report(snapshot, &entries)
            }
            Operation::Trophies => {
                let recap = weekly_recap(snapshot, done_week)?;
                // Lineup data may be unavailable for past weeks; the recap
                // stands on its own without the efficiency awards.
                let analyses = optimal_scores(snapshot, done_week).unwrap_or_default();
                let activity = activity_ranking(snapshot);
                report::trophies(snapshot, &recap, &analyses, &activity)
            }
        };
        Ok(text)
    }

    /// Ranking order for the preceding week, for the delta column. A week
    /// without a computable prior ranking yields no deltas.
    fn prior_order(&self, snapshot: &LeagueSnapshot, week: u16) -> Option<Vec<TeamId>> {
        if week < 2 {
            return None;
        }
        let prior = power_rankings(snapshot, week - 1, None).ok()?;
        if prior.is_empty() {
            return None;
        }
        Some(prior.into_iter().map(|e| e.team_id).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{Matchup, MatchupSide, Team};

    fn team(id: TeamId, name: &str, abbrev: &str, scores: Vec<f64>, against: Vec<f64>) -> Team {
        let wins = scores
            .iter()
            .zip(&against)
            .filter(|(f, a)| f > a)
            .count() as u32;
        let losses = scores.len() as u32 - wins;
        Team {
            id,
            name: name.to_string(),
            abbrev: abbrev.to_string(),
            wins,
            losses,
            ties: 0,
            scores_for: scores,
            scores_against: against,
        }
    }

    fn snapshot() -> LeagueSnapshot {
        let side = |id: TeamId, score: f64| MatchupSide {
            team_id: id,
            score,
            projected: Some(score),
        };
        LeagueSnapshot {
            league_name: "Test".into(),
            season: 2025,
            current_week: 3,
            teams: vec![
                team(1, "Gridlock", "GRID", vec![110.0, 102.0], vec![95.0, 88.0]),
                team(2, "Punt Squad", "PUNT", vec![95.0, 88.0], vec![110.0, 102.0]),
            ],
            matchups: vec![
                Matchup {
                    week: 1,
                    home: side(1, 110.0),
                    away: Some(side(2, 95.0)),
                },
                Matchup {
                    week: 2,
                    home: side(2, 88.0),
                    away: Some(side(1, 102.0)),
                },
            ],
            rosters: vec![],
            transactions: vec![],
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(chrono_tz::America::New_York)
    }

    #[test]
    fn operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.as_str().parse::<Operation>().unwrap(), *op);
        }
    }

    #[test]
    fn operation_aliases() {
        assert_eq!("power".parse::<Operation>().unwrap(), Operation::PowerRankings);
        assert_eq!("luck".parse::<Operation>().unwrap(), Operation::LuckIndex);
        assert_eq!("recap".parse::<Operation>().unwrap(), Operation::Trophies);
    }

    #[test]
    fn unknown_operation_errors() {
        assert!(matches!(
            "frobnicate".parse::<Operation>(),
            Err(DispatchError::UnknownOperation(name)) if name == "frobnicate"
        ));
    }

    #[test]
    fn standings_render() {
        let out = dispatcher()
            .render(&snapshot(), &Request::new(Operation::Standings))
            .unwrap();
        assert!(out.contains("(2-0) Gridlock"));
    }

    #[test]
    fn power_rankings_default_to_last_completed_week() {
        let out = dispatcher()
            .render(&snapshot(), &Request::new(Operation::PowerRankings))
            .unwrap();
        // Gridlock won both weeks, so it ranks first.
        let grid_pos = out.find("GRID").unwrap();
        let punt_pos = out.find("PUNT").unwrap();
        assert!(grid_pos < punt_pos);
    }

    #[test]
    fn explicit_week_is_honored() {
        let mut req = Request::new(Operation::Scoreboard);
        req.week = Some(1);
        let out = dispatcher().render(&snapshot(), &req).unwrap();
        assert!(out.contains("110.00"));
    }

    #[test]
    fn lineup_requires_team() {
        let err = dispatcher()
            .render(&snapshot(), &Request::new(Operation::Lineup))
            .unwrap_err();
        assert!(matches!(
            err,
            DispatchError::MissingArgument {
                op: Operation::Lineup,
                ..
            }
        ));
    }

    #[test]
    fn invalid_week_surfaces_analytics_error() {
        let mut req = Request::new(Operation::Trophies);
        req.week = Some(9);
        let err = dispatcher().render(&snapshot(), &req).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Analytics(AnalyticsError::InvalidWeek { week: 9, .. })
        ));
    }

    #[test]
    fn waivers_with_explicit_date() {
        let mut req = Request::new(Operation::Waivers);
        req.date = NaiveDate::from_ymd_opt(2025, 10, 1);
        let out = dispatcher().render(&snapshot(), &req).unwrap();
        assert_eq!(out, "No waiver transactions");
    }
}
