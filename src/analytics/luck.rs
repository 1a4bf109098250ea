// All-play win matrix, luck index, and roster-activity ranking.
//
// The win matrix answers "how would A have fared against B's score every
// week, regardless of the actual schedule". The luck index compares a team's
// real win count against the schedule-independent expectation implied by its
// weekly scoring ranks.

use std::collections::HashMap;

use crate::analytics::AnalyticsError;
use crate::league::{LeagueSnapshot, TeamId, TransactionKind};

// ---------------------------------------------------------------------------
// Win matrix
// ---------------------------------------------------------------------------

/// Hypothetical head-to-head record for every ordered team pair.
///
/// `cell(a, b)` counts the weeks a's score beat b's; a tied week credits 0.5
/// to each side, so `cell(a, b) + cell(b, a)` always equals the number of
/// weeks both teams have a recorded score.
#[derive(Debug, Clone)]
pub struct WinMatrix {
    /// Team ids in snapshot order; row/column index follows this.
    pub team_ids: Vec<TeamId>,
    cells: Vec<Vec<f64>>,
}

impl WinMatrix {
    pub fn cell(&self, a: TeamId, b: TeamId) -> Option<f64> {
        let ia = self.team_ids.iter().position(|&id| id == a)?;
        let ib = self.team_ids.iter().position(|&id| id == b)?;
        Some(self.cells[ia][ib])
    }

    /// Total hypothetical wins for one team across all opponents.
    pub fn wins(&self, team: TeamId) -> Option<f64> {
        let i = self.team_ids.iter().position(|&id| id == team)?;
        Some(self.cells[i].iter().sum())
    }

    /// Total hypothetical losses: weeks an opponent's score beat this team's.
    pub fn losses(&self, team: TeamId) -> Option<f64> {
        let i = self.team_ids.iter().position(|&id| id == team)?;
        Some(self.cells.iter().map(|row| row[i]).sum())
    }
}

/// Build the all-play win matrix across every completed week.
pub fn win_matrix(snapshot: &LeagueSnapshot) -> WinMatrix {
    let n = snapshot.teams.len();
    let mut cells = vec![vec![0.0_f64; n]; n];

    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            let sa = &snapshot.teams[a].scores_for;
            let sb = &snapshot.teams[b].scores_for;
            for w in 0..sa.len().min(sb.len()) {
                if sa[w] > sb[w] {
                    cells[a][b] += 1.0;
                } else if (sa[w] - sb[w]).abs() < f64::EPSILON {
                    cells[a][b] += 0.5;
                }
            }
        }
    }

    WinMatrix {
        team_ids: snapshot.teams.iter().map(|t| t.id).collect(),
        cells,
    }
}

// ---------------------------------------------------------------------------
// Luck index
// ---------------------------------------------------------------------------

/// Per-team over/under-performance relative to weekly scoring rank.
#[derive(Debug, Clone)]
pub struct LuckEntry {
    pub team_id: TeamId,
    pub actual_wins: f64,
    /// Schedule-independent expected wins: per week, all-play wins divided
    /// by (teams - 1), summed over the season.
    pub expected_wins: f64,
    /// `actual - expected`; positive means lucky.
    pub luck: f64,
}

/// Luck index for every team, sorted luckiest first, ties by team name.
///
/// Requires at least two teams and one completed week.
pub fn luck_index(snapshot: &LeagueSnapshot) -> Result<Vec<LuckEntry>, AnalyticsError> {
    let n = snapshot.teams.len();
    let weeks = snapshot.completed_weeks();
    if n < 2 || weeks == 0 {
        return Err(AnalyticsError::InsufficientData { teams: n, weeks });
    }

    let matrix = win_matrix(snapshot);
    let mut entries: Vec<LuckEntry> = snapshot
        .teams
        .iter()
        .map(|team| {
            let all_play = matrix.wins(team.id).unwrap_or(0.0);
            let expected = all_play / (n as f64 - 1.0);
            let actual = team.wins as f64 + 0.5 * team.ties as f64;
            LuckEntry {
                team_id: team.id,
                actual_wins: actual,
                expected_wins: expected,
                luck: actual - expected,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.luck
            .partial_cmp(&a.luck)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let na = snapshot.team(a.team_id).map(|t| t.name.as_str()).unwrap_or("");
                let nb = snapshot.team(b.team_id).map(|t| t.name.as_str()).unwrap_or("");
                na.cmp(nb)
            })
    });
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Activity ranking
// ---------------------------------------------------------------------------

/// Per-team transaction tally across the season.
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub team_id: TeamId,
    pub adds: u32,
    pub drops: u32,
    pub trades: u32,
}

impl ActivityEntry {
    pub fn total(&self) -> u32 {
        self.adds + self.drops + self.trades
    }
}

/// Transaction counts per team, most active first, ties by team name.
/// Reverse the result for the "laziest" ordering.
pub fn activity_ranking(snapshot: &LeagueSnapshot) -> Vec<ActivityEntry> {
    let mut by_team: HashMap<TeamId, ActivityEntry> = snapshot
        .teams
        .iter()
        .map(|t| {
            (
                t.id,
                ActivityEntry {
                    team_id: t.id,
                    adds: 0,
                    drops: 0,
                    trades: 0,
                },
            )
        })
        .collect();

    for tx in &snapshot.transactions {
        if let Some(entry) = by_team.get_mut(&tx.team_id) {
            match tx.kind {
                TransactionKind::Add => entry.adds += 1,
                TransactionKind::Drop => entry.drops += 1,
                TransactionKind::Trade => entry.trades += 1,
            }
        }
    }

    let mut entries: Vec<ActivityEntry> = by_team.into_values().collect();
    entries.sort_by(|a, b| {
        b.total().cmp(&a.total()).then_with(|| {
            let na = snapshot.team(a.team_id).map(|t| t.name.as_str()).unwrap_or("");
            let nb = snapshot.team(b.team_id).map(|t| t.name.as_str()).unwrap_or("");
            na.cmp(nb)
        })
    });
    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
