// Optimal lineup and manager efficiency.
//
// Given a team's full weekly roster (starters, bench, IR), compute the best
// legal rearrangement under the league's starting-slot requirements and the
// ratio of points actually started to that optimum.

use std::collections::BTreeMap;

use crate::analytics::AnalyticsError;
use crate::league::{LeagueSnapshot, Position, RosterSlot, SlotId, TeamId, SLOT_DISPLAY_ORDER};

/// One player chosen for the optimal lineup.
#[derive(Debug, Clone)]
pub struct OptimalSelection {
    pub player: String,
    pub position: Position,
    pub slot: SlotId,
    pub points: f64,
}

/// Optimal-vs-actual summary for one team's week.
#[derive(Debug, Clone)]
pub struct LineupAnalysis {
    pub team_id: TeamId,
    pub week: u16,
    /// Points the manager actually started.
    pub actual: f64,
    /// Points of the best legal lineup from the same player pool.
    pub optimal: f64,
    pub selections: Vec<OptimalSelection>,
    /// `actual / optimal` as a percentage. 100 when both are zero; `None`
    /// when the optimum is zero but points were somehow started (degenerate
    /// data, excluded from reports).
    pub efficiency: Option<f64>,
}

/// True when some starting slot can legally hold this position.
fn is_slottable(position: Position) -> bool {
    SLOT_DISPLAY_ORDER
        .iter()
        .any(|s| s.is_starting() && s.eligible_positions().contains(&position))
}

/// Derive the league's starting-slot requirements from the lineups observed
/// in a given week: for each non-bench slot, the maximum count any single
/// team fielded. Robust against a roster with an empty slot.
pub fn starter_counts(snapshot: &LeagueSnapshot, week: u16) -> BTreeMap<SlotId, usize> {
    let mut counts: BTreeMap<SlotId, usize> = BTreeMap::new();
    for roster in snapshot.rosters.iter().filter(|r| r.week == week) {
        let mut team_counts: BTreeMap<SlotId, usize> = BTreeMap::new();
        for slot in &roster.slots {
            if slot.slot.is_starting() {
                *team_counts.entry(slot.slot).or_insert(0) += 1;
            }
        }
        for (slot, count) in team_counts {
            let entry = counts.entry(slot).or_insert(0);
            if count > *entry {
                *entry = count;
            }
        }
    }
    counts
}

/// Compute the optimal lineup for one roster.
///
/// Greedy by position then flex:
/// 1. Fill each strictly-typed slot with the highest-scoring eligible players
///    not yet assigned (stable on ties, so equal scores keep roster order).
/// 2. Fill flex-type slots (FLEX, then OP) from the remaining pool across all
///    of their eligible positions.
///
/// A player whose position overlaps no modeled slot is skipped, never fatal.
/// Such a player is excluded from the actual sum too, even when found in a
/// starting slot, so the actual never counts points the optimum cannot.
pub fn optimal_lineup(
    team_id: TeamId,
    week: u16,
    roster: &[RosterSlot],
    counts: &BTreeMap<SlotId, usize>,
) -> LineupAnalysis {
    let actual: f64 = roster
        .iter()
        .filter(|s| s.slot.is_starting() && is_slottable(s.position))
        .map(|s| s.points)
        .sum();

    // Indices into `roster`, sorted by points descending. `sort_by` is
    // stable, so ties keep original roster order.
    let mut pool: Vec<usize> = (0..roster.len()).collect();
    pool.sort_by(|&a, &b| {
        roster[b]
            .points
            .partial_cmp(&roster[a].points)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut used = vec![false; roster.len()];
    let mut selections = Vec::new();

    let fill = |slot: SlotId, count: usize, used: &mut Vec<bool>, out: &mut Vec<OptimalSelection>| {
        let eligible = slot.eligible_positions();
        let mut taken = 0;
        for &i in &pool {
            if taken == count {
                break;
            }
            if used[i] || !eligible.contains(&roster[i].position) {
                continue;
            }
            used[i] = true;
            taken += 1;
            out.push(OptimalSelection {
                player: roster[i].player.clone(),
                position: roster[i].position,
                slot,
                points: roster[i].points,
            });
        }
    };

    // Strict slots first, then flexes, in display order for determinism.
    for &slot in SLOT_DISPLAY_ORDER {
        if slot.is_flex() || !slot.is_starting() {
            continue;
        }
        if let Some(&count) = counts.get(&slot) {
            fill(slot, count, &mut used, &mut selections);
        }
    }
    for &slot in SLOT_DISPLAY_ORDER {
        if !slot.is_flex() {
            continue;
        }
        if let Some(&count) = counts.get(&slot) {
            fill(slot, count, &mut used, &mut selections);
        }
    }

    let optimal: f64 = selections.iter().map(|s| s.points).sum();

    let efficiency = if optimal > 0.0 {
        Some(100.0 * actual / optimal)
    } else if actual == 0.0 {
        Some(100.0)
    } else {
        None
    };

    LineupAnalysis {
        team_id,
        week,
        actual,
        optimal,
        selections,
        efficiency,
    }
}

/// Optimal-lineup analysis for every team with a roster in `week`, sorted by
/// efficiency descending (teams without a computable efficiency sink to the
/// bottom), ties broken by team name.
pub fn optimal_scores(
    snapshot: &LeagueSnapshot,
    week: u16,
) -> Result<Vec<LineupAnalysis>, AnalyticsError> {
    let counts = starter_counts(snapshot, week);
    let mut analyses: Vec<LineupAnalysis> = snapshot
        .rosters
        .iter()
        .filter(|r| r.week == week)
        .map(|r| optimal_lineup(r.team_id, week, &r.slots, &counts))
        .collect();

    if analyses.is_empty() {
        return Err(AnalyticsError::InsufficientData {
            teams: snapshot.teams.len(),
            weeks: snapshot.completed_weeks(),
        });
    }

    analyses.sort_by(|a, b| {
        let ea = a.efficiency.unwrap_or(f64::NEG_INFINITY);
        let eb = b.efficiency.unwrap_or(f64::NEG_INFINITY);
        eb.partial_cmp(&ea)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let na = snapshot.team(a.team_id).map(|t| t.name.as_str()).unwrap_or("");
                let nb = snapshot.team(b.team_id).map(|t| t.name.as_str()).unwrap_or("");
                na.cmp(nb)
            })
    });
    Ok(analyses)
}

/// Analysis for a single named team. `UnknownTeam` when the name matches
/// nothing; `MalformedRoster` when the roster exists but no player overlaps
/// any modeled starting slot.
pub fn team_lineup_analysis(
    snapshot: &LeagueSnapshot,
    team_name: &str,
    week: u16,
) -> Result<LineupAnalysis, AnalyticsError> {
    let team = snapshot
        .team_by_name(team_name)
        .ok_or_else(|| AnalyticsError::UnknownTeam {
            name: team_name.to_string(),
        })?;
    let roster = snapshot
        .roster(team.id, week)
        .ok_or(AnalyticsError::InvalidWeek {
            week,
            completed: snapshot.completed_weeks(),
        })?;

    let counts = starter_counts(snapshot, week);
    let analysis = optimal_lineup(team.id, week, &roster.slots, &counts);
    if analysis.selections.is_empty() && !roster.slots.is_empty() {
        return Err(AnalyticsError::MalformedRoster {
            team_id: team.id,
            week,
        });
    }
    Ok(analysis)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::{InjuryStatus, Roster};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn slot(player: &str, position: Position, at: SlotId, points: f64) -> RosterSlot {
        RosterSlot {
            player: player.to_string(),
            position,
            slot: at,
            points,
            projected: Some(points),
            injury_status: InjuryStatus::Active,
            played: true,
            on_bye: false,
        }
    }

    fn counts_1qb_1rb_1flex() -> BTreeMap<SlotId, usize> {
        let mut counts = BTreeMap::new();
        counts.insert(SlotId::Qb, 1);
        counts.insert(SlotId::Rb, 1);
        counts.insert(SlotId::Flex, 1);
        counts
    }

    #[test]
    fn picks_best_quarterback() {
        // One QB slot, two eligible QBs scoring 20 and 15. The 15-point QB
        // was started: efficiency = 15/20 = 75%.
        let mut counts = BTreeMap::new();
        counts.insert(SlotId::Qb, 1);
        let roster = vec![
            slot("Backup QB", Position::Qb, SlotId::Qb, 15.0),
            slot("Stud QB", Position::Qb, SlotId::Bench, 20.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        assert_eq!(analysis.selections.len(), 1);
        assert_eq!(analysis.selections[0].player, "Stud QB");
        assert!(approx_eq(analysis.optimal, 20.0, 1e-9));
        assert!(approx_eq(analysis.actual, 15.0, 1e-9));
        assert!(approx_eq(analysis.efficiency.unwrap(), 75.0, 1e-9));
    }

    #[test]
    fn flex_takes_best_remaining_across_positions() {
        let counts = counts_1qb_1rb_1flex();
        let roster = vec![
            slot("QB1", Position::Qb, SlotId::Qb, 18.0),
            slot("RB1", Position::Rb, SlotId::Rb, 12.0),
            slot("RB2", Position::Rb, SlotId::Bench, 14.0),
            slot("WR1", Position::Wr, SlotId::Flex, 9.0),
            slot("TE1", Position::Te, SlotId::Bench, 11.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        // RB slot takes RB2 (14), flex takes RB1 (12) over WR1 (9) and TE1 (11).
        let flex = analysis
            .selections
            .iter()
            .find(|s| s.slot == SlotId::Flex)
            .unwrap();
        assert_eq!(flex.player, "RB1");
        assert!(approx_eq(analysis.optimal, 18.0 + 14.0 + 12.0, 1e-9));
    }

    #[test]
    fn qb_never_fills_rb_wr_te_flex() {
        let counts = counts_1qb_1rb_1flex();
        let roster = vec![
            slot("QB1", Position::Qb, SlotId::Qb, 30.0),
            slot("QB2", Position::Qb, SlotId::Bench, 29.0),
            slot("RB1", Position::Rb, SlotId::Rb, 5.0),
            slot("WR1", Position::Wr, SlotId::Bench, 4.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        let flex = analysis
            .selections
            .iter()
            .find(|s| s.slot == SlotId::Flex)
            .unwrap();
        assert_eq!(flex.player, "WR1");
    }

    #[test]
    fn efficiency_never_exceeds_100() {
        // Actual lineup happens to be optimal already.
        let counts = counts_1qb_1rb_1flex();
        let roster = vec![
            slot("QB1", Position::Qb, SlotId::Qb, 22.0),
            slot("RB1", Position::Rb, SlotId::Rb, 16.0),
            slot("WR1", Position::Wr, SlotId::Flex, 13.0),
            slot("RB2", Position::Rb, SlotId::Bench, 2.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        let eff = analysis.efficiency.unwrap();
        assert!(eff <= 100.0 + 1e-9);
        assert!(approx_eq(eff, 100.0, 1e-9));
    }

    #[test]
    fn zero_optimal_zero_actual_is_100_percent() {
        let counts = counts_1qb_1rb_1flex();
        let roster = vec![
            slot("QB1", Position::Qb, SlotId::Qb, 0.0),
            slot("RB1", Position::Rb, SlotId::Rb, 0.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        assert!(approx_eq(analysis.efficiency.unwrap(), 100.0, 1e-9));
    }

    #[test]
    fn equal_scores_keep_roster_order() {
        let mut counts = BTreeMap::new();
        counts.insert(SlotId::Rb, 1);
        let roster = vec![
            slot("First RB", Position::Rb, SlotId::Bench, 10.0),
            slot("Second RB", Position::Rb, SlotId::Bench, 10.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        assert_eq!(analysis.selections[0].player, "First RB");
    }

    #[test]
    fn unknown_position_player_is_skipped() {
        let mut counts = BTreeMap::new();
        counts.insert(SlotId::Qb, 1);
        let roster = vec![
            slot("Mystery Guy", Position::Unknown, SlotId::Bench, 50.0),
            slot("QB1", Position::Qb, SlotId::Qb, 12.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        assert_eq!(analysis.selections.len(), 1);
        assert_eq!(analysis.selections[0].player, "QB1");
    }

    #[test]
    fn unslottable_starter_does_not_inflate_actual() {
        // An unmappable player sitting in a starting slot can never be
        // selected into the optimum, so its points must not count as actual
        // either; otherwise efficiency would exceed 100%.
        let mut counts = BTreeMap::new();
        counts.insert(SlotId::Qb, 1);
        counts.insert(SlotId::Flex, 1);
        let roster = vec![
            slot("Mystery Guy", Position::Unknown, SlotId::Flex, 50.0),
            slot("QB1", Position::Qb, SlotId::Qb, 12.0),
        ];
        let analysis = optimal_lineup(1, 1, &roster, &counts);
        assert!(approx_eq(analysis.actual, 12.0, 1e-9));
        assert!(approx_eq(analysis.optimal, 12.0, 1e-9));
        let eff = analysis.efficiency.unwrap();
        assert!(eff <= 100.0 + 1e-9);
        assert!(approx_eq(eff, 100.0, 1e-9));
    }

    #[test]
    fn starter_counts_take_per_slot_max() {
        let snap = LeagueSnapshot {
            league_name: "Test".into(),
            season: 2025,
            current_week: 2,
            teams: vec![],
            matchups: vec![],
            rosters: vec![
                Roster {
                    team_id: 1,
                    week: 1,
                    slots: vec![
                        slot("A", Position::Qb, SlotId::Qb, 1.0),
                        slot("B", Position::Rb, SlotId::Rb, 1.0),
                        slot("C", Position::Rb, SlotId::Rb, 1.0),
                    ],
                },
                Roster {
                    team_id: 2,
                    week: 1,
                    // Empty RB slot this week; QB only.
                    slots: vec![slot("D", Position::Qb, SlotId::Qb, 1.0)],
                },
            ],
            transactions: vec![],
        };
        let counts = starter_counts(&snap, 1);
        assert_eq!(counts.get(&SlotId::Qb), Some(&1));
        assert_eq!(counts.get(&SlotId::Rb), Some(&2));
        assert_eq!(counts.get(&SlotId::Bench), None);
    }

    #[test]
    fn optimal_scores_sorted_by_efficiency() {
        let snap = LeagueSnapshot {
            league_name: "Test".into(),
            season: 2025,
            current_week: 2,
            teams: vec![],
            matchups: vec![],
            rosters: vec![
                Roster {
                    team_id: 1,
                    week: 1,
                    slots: vec![
                        slot("A1", Position::Qb, SlotId::Qb, 10.0),
                        slot("A2", Position::Qb, SlotId::Bench, 20.0),
                    ],
                },
                Roster {
                    team_id: 2,
                    week: 1,
                    slots: vec![slot("B1", Position::Qb, SlotId::Qb, 20.0)],
                },
            ],
            transactions: vec![],
        };
        let analyses = optimal_scores(&snap, 1).unwrap();
        assert_eq!(analyses[0].team_id, 2); // 100%
        assert_eq!(analyses[1].team_id, 1); // 50%
    }

    #[test]
    fn optimal_scores_no_rosters_is_insufficient_data() {
        let snap = LeagueSnapshot {
            league_name: "Test".into(),
            season: 2025,
            current_week: 1,
            teams: vec![],
            matchups: vec![],
            rosters: vec![],
            transactions: vec![],
        };
        assert!(matches!(
            optimal_scores(&snap, 1),
            Err(AnalyticsError::InsufficientData { .. })
        ));
    }
}
