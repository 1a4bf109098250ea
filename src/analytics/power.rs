// Power rankings: two-step dominance blended with raw scoring output.
//
// The ranking rewards teams that beat teams that beat good teams, not just
// teams that feast on weak schedules. Weekly score comparisons feed a binary
// dominance matrix, squared to capture once-removed dominance, then blended
// with total points and average margin of victory at 80/15/5.

use crate::analytics::{normalize, AnalyticsError};
use crate::league::{LeagueSnapshot, TeamId};

const WEIGHT_DOMINANCE: f64 = 0.80;
const WEIGHT_POINTS: f64 = 0.15;
const WEIGHT_MARGIN: f64 = 0.05;

/// One row of the power ranking table.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerRankingEntry {
    pub team_id: TeamId,
    /// Blended score, rounded to 2 decimals.
    pub score: f64,
    /// 1-based rank, contiguous.
    pub rank: usize,
    /// `previous_rank - rank`; positive means the team moved up. `None` when
    /// no prior ordering was supplied or the team wasn't in it.
    pub delta: Option<i32>,
}

/// Compute power rankings through `week`.
///
/// 1. Dominance matrix: `dom[a][b] = 1` when a's weekly scores beat b's more
///    often than the reverse across weeks 1..=week.
/// 2. Two-step dominance weight per team: row sum of `D + D·D`.
/// 3. Blend 80% two-step dominance, 15% total points, 5% average margin of
///    victory, each min-max normalized to [0, 100).
/// 4. Rank descending; ties broken by total points descending, then team
///    name ascending.
///
/// Policy (documented, not an error): fewer than two teams or zero completed
/// weeks yields an empty ranking. A week beyond the completed range is an
/// `InvalidWeek` error.
///
/// `prior` is last week's rank ordering (team ids, best first) and drives the
/// delta column; pass `None` on week 1.
pub fn power_rankings(
    snapshot: &LeagueSnapshot,
    week: u16,
    prior: Option<&[TeamId]>,
) -> Result<Vec<PowerRankingEntry>, AnalyticsError> {
    let completed = snapshot.completed_weeks();
    if week > completed && completed > 0 {
        return Err(AnalyticsError::InvalidWeek { week, completed });
    }
    if snapshot.teams.len() < 2 || completed == 0 || week == 0 {
        return Ok(Vec::new());
    }

    let n = snapshot.teams.len();
    let weeks = week as usize;

    // Step 1: binary dominance matrix from weekly score comparisons.
    let mut dom = vec![vec![0.0_f64; n]; n];
    for a in 0..n {
        for b in 0..n {
            if a == b {
                continue;
            }
            let mut a_wins = 0u32;
            let mut b_wins = 0u32;
            let sa = &snapshot.teams[a].scores_for;
            let sb = &snapshot.teams[b].scores_for;
            for w in 0..weeks.min(sa.len()).min(sb.len()) {
                if sa[w] > sb[w] {
                    a_wins += 1;
                } else if sb[w] > sa[w] {
                    b_wins += 1;
                }
            }
            if a_wins > b_wins {
                dom[a][b] = 1.0;
            }
        }
    }

    // Step 2: two-step dominance weight = row sum of D + D·D.
    let mut dominance = vec![0.0_f64; n];
    for a in 0..n {
        for c in 0..n {
            let mut two_step = 0.0;
            for b in 0..n {
                two_step += dom[a][b] * dom[b][c];
            }
            dominance[a] += dom[a][c] + two_step;
        }
    }

    // Step 3: normalize each signal independently, then blend.
    let points: Vec<f64> = snapshot
        .teams
        .iter()
        .map(|t| t.points_through(week))
        .collect();
    let margins: Vec<f64> = snapshot
        .teams
        .iter()
        .map(|t| t.avg_margin_through(week))
        .collect();

    let dominance_n = normalize(&dominance);
    let points_n = normalize(&points);
    let margins_n = normalize(&margins);

    let mut scored: Vec<(usize, f64)> = (0..n)
        .map(|i| {
            let blended = WEIGHT_DOMINANCE * dominance_n[i]
                + WEIGHT_POINTS * points_n[i]
                + WEIGHT_MARGIN * margins_n[i];
            (i, blended)
        })
        .collect();

    // Step 4: rank descending with deterministic tie-breaks.
    scored.sort_by(|(ia, sa), (ib, sb)| {
        sb.partial_cmp(sa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                points[*ib]
                    .partial_cmp(&points[*ia])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| snapshot.teams[*ia].name.cmp(&snapshot.teams[*ib].name))
    });

    let entries = scored
        .into_iter()
        .enumerate()
        .map(|(pos, (i, blended))| {
            let team_id = snapshot.teams[i].id;
            let rank = pos + 1;
            let delta = prior.and_then(|p| {
                p.iter()
                    .position(|&id| id == team_id)
                    .map(|prev| (prev as i32 + 1) - rank as i32)
            });
            PowerRankingEntry {
                team_id,
                score: (blended * 100.0).round() / 100.0,
                rank,
                delta,
            }
        })
        .collect();

    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
