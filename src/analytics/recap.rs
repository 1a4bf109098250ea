// Weekly recap statistics: trophy lines for one completed week.
//
// High/low score, biggest blowout, closest win, projection over/under
// achievers, and the lucky/unlucky weekly awards (lowest-scoring winner and
// highest-scoring loser, with their all-play record for the week).

use crate::analytics::AnalyticsError;
use crate::league::{LeagueSnapshot, TeamId};

/// A single-team award with the number that earned it.
#[derive(Debug, Clone, Copy)]
pub struct TeamAward {
    pub team_id: TeamId,
    pub value: f64,
}

/// A two-team award (winner and loser) with the margin between them.
#[derive(Debug, Clone, Copy)]
pub struct MarginAward {
    pub winner: TeamId,
    pub loser: TeamId,
    pub margin: f64,
}

/// The lucky/unlucky award: a weekly result paired with that team's all-play
/// record against the whole league for the week.
#[derive(Debug, Clone, Copy)]
pub struct LuckAward {
    pub team_id: TeamId,
    pub all_play_wins: u32,
    pub all_play_losses: u32,
}

#[derive(Debug, Clone)]
pub struct WeeklyRecap {
    pub week: u16,
    pub high: TeamAward,
    pub low: TeamAward,
    pub blowout: Option<MarginAward>,
    pub closest: Option<MarginAward>,
    /// Largest positive (score - projection); `None` when nobody beat their
    /// projection or no projections were recorded.
    pub overachiever: Option<TeamAward>,
    /// Largest negative (score - projection), stored as the signed value.
    pub underachiever: Option<TeamAward>,
    /// Lowest-scoring team that still won its matchup.
    pub lucky: Option<LuckAward>,
    /// Highest-scoring team that still lost its matchup.
    pub unlucky: Option<LuckAward>,
}

/// Compute the recap for one week. Byes are excluded from the two-team
/// awards; a week with no head-to-head matchups is `InsufficientData`.
pub fn weekly_recap(snapshot: &LeagueSnapshot, week: u16) -> Result<WeeklyRecap, AnalyticsError> {
    let completed = snapshot.completed_weeks();
    if week == 0 || week > completed {
        return Err(AnalyticsError::InvalidWeek { week, completed });
    }

    // (team, score, projected, won) for every side of a non-bye matchup.
    let mut results: Vec<(TeamId, f64, Option<f64>, bool)> = Vec::new();
    let mut blowout: Option<MarginAward> = None;
    let mut closest: Option<MarginAward> = None;

    for m in snapshot.matchups_for_week(week) {
        let Some(away) = &m.away else {
            continue;
        };
        let home = &m.home;
        let home_won = home.score > away.score;
        results.push((home.team_id, home.score, home.projected, home_won));
        results.push((away.team_id, away.score, away.projected, !home_won && away.score > home.score));

        let margin = (home.score - away.score).abs();
        let (winner, loser) = if home.score >= away.score {
            (home.team_id, away.team_id)
        } else {
            (away.team_id, home.team_id)
        };
        if margin > 0.0 && blowout.is_none_or(|b| margin > b.margin) {
            blowout = Some(MarginAward { winner, loser, margin });
        }
        if margin > 0.0 && closest.is_none_or(|c| margin < c.margin) {
            closest = Some(MarginAward { winner, loser, margin });
        }
    }

    if results.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            teams: snapshot.teams.len(),
            weeks: completed,
        });
    }

    let high = results
        .iter()
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|&(id, score, _, _)| TeamAward { team_id: id, value: score })
        .expect("results non-empty");
    let low = results
        .iter()
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|&(id, score, _, _)| TeamAward { team_id: id, value: score })
        .expect("results non-empty");

    // Projection deltas.
    let mut overachiever: Option<TeamAward> = None;
    let mut underachiever: Option<TeamAward> = None;
    for &(id, score, projected, _) in &results {
        let Some(projected) = projected else { continue };
        let delta = score - projected;
        if delta > 0.0 && overachiever.is_none_or(|a| delta > a.value) {
            overachiever = Some(TeamAward { team_id: id, value: delta });
        }
        if delta < 0.0 && underachiever.is_none_or(|a| delta < a.value) {
            underachiever = Some(TeamAward { team_id: id, value: delta });
        }
    }

    // Lucky / unlucky: sort by score descending; the first loser from the top
    // is unlucky, the first winner from the bottom is lucky. The all-play
    // record is the team's rank against everyone who played this week.
    let mut by_score = results.clone();
    by_score.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let n = by_score.len() as u32;

    let unlucky = by_score
        .iter()
        .enumerate()
        .find(|(_, r)| !r.3)
        .map(|(pos, r)| LuckAward {
            team_id: r.0,
            all_play_wins: n - 1 - pos as u32,
            all_play_losses: pos as u32,
        });
    let lucky = by_score
        .iter()
        .enumerate()
        .rev()
        .find(|(_, r)| r.3)
        .map(|(pos, r)| LuckAward {
            team_id: r.0,
            all_play_wins: n - 1 - pos as u32,
            all_play_losses: pos as u32,
        });

    Ok(WeeklyRecap {
        week,
        high,
        low,
        blowout,
        closest,
        overachiever,
        underachiever,
        lucky,
        unlucky,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
