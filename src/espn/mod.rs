// Fantasy API client: fetches one league snapshot per poll.
//
// A snapshot is a single GET against the v3 league endpoint with the five
// views this bot needs (teams, matchup scores, rosters, settings,
// transactions) stacked into one response, then flattened into the
// platform-neutral `LeagueSnapshot` model.

pub mod raw;

use std::collections::HashMap;

use thiserror::Error;
use tracing::debug;

use crate::config::CredentialsConfig;
use crate::league::{
    InjuryStatus, LeagueSnapshot, Matchup, MatchupSide, Position, Roster, RosterSlot, SlotId,
    Team, Transaction, TransactionKind,
};

const BASE_URL: &str = "https://lm-api-reads.fantasy.espn.com/apis/v3/games/ffl";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum EspnError {
    #[error("request to the fantasy API failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response shape: {message}")]
    Shape { message: String },
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

pub struct EspnClient {
    http: reqwest::Client,
    base_url: String,
    league_id: u64,
    season: u16,
    /// `espn_s2=...; SWID=...` for private leagues.
    cookie: Option<String>,
}

impl EspnClient {
    pub fn new(
        league_id: u64,
        season: u16,
        credentials: &CredentialsConfig,
    ) -> Result<Self, EspnError> {
        let http = reqwest::Client::builder()
            .user_agent("league-herald/0.1")
            .build()?;
        let cookie = match (&credentials.espn_s2, &credentials.swid) {
            (Some(s2), Some(swid)) => Some(format!("espn_s2={s2}; SWID={swid}")),
            _ => None,
        };
        Ok(Self {
            http,
            base_url: BASE_URL.to_string(),
            league_id,
            season,
            cookie,
        })
    }

    /// Fetch the full league state as of now.
    pub async fn fetch_snapshot(&self) -> Result<LeagueSnapshot, EspnError> {
        let url = format!(
            "{}/seasons/{}/segments/0/leagues/{}",
            self.base_url, self.season, self.league_id
        );
        debug!(league_id = self.league_id, season = self.season, "fetching league snapshot");

        let mut req = self.http.get(&url).query(&[
            ("view", "mTeam"),
            ("view", "mMatchupScore"),
            ("view", "mRoster"),
            ("view", "mSettings"),
            ("view", "mTransactions2"),
        ]);
        if let Some(cookie) = &self.cookie {
            req = req.header(reqwest::header::COOKIE, cookie.clone());
        }

        let response: raw::LeagueResponse =
            req.send().await?.error_for_status()?.json().await?;
        build_snapshot(response)
    }
}

// ---------------------------------------------------------------------------
// Wire -> model conversion
// ---------------------------------------------------------------------------

/// Flatten a raw league response into a `LeagueSnapshot`.
///
/// Week bookkeeping: `currentMatchupPeriod` is the week in progress, so
/// weeks `1..current` are treated as completed and drive the per-team
/// score vectors. Live totals override final totals for the current week.
pub fn build_snapshot(response: raw::LeagueResponse) -> Result<LeagueSnapshot, EspnError> {
    let current_week = response.status.current_matchup_period;
    if current_week == 0 {
        return Err(EspnError::Shape {
            message: "currentMatchupPeriod is 0".to_string(),
        });
    }
    let completed = current_week - 1;

    // Player identities for transaction lookups come from the rosters.
    let mut players: HashMap<u64, (String, Position)> = HashMap::new();
    for team in &response.teams {
        if let Some(roster) = &team.roster {
            index_players(&mut players, roster);
        }
    }
    for m in &response.schedule {
        for side in [&m.home, &m.away].into_iter().flatten() {
            if let Some(roster) = &side.roster_for_current_scoring_period {
                index_players(&mut players, roster);
            }
        }
    }

    // Weekly scores per team, from the schedule.
    let mut weekly: HashMap<u32, Vec<(f64, f64)>> = response
        .teams
        .iter()
        .map(|t| (t.id, vec![(0.0, 0.0); completed as usize]))
        .collect();
    for m in &response.schedule {
        if m.matchup_period_id == 0 || m.matchup_period_id > completed {
            continue;
        }
        let idx = (m.matchup_period_id - 1) as usize;
        let (home, away) = (&m.home, &m.away);
        let home_pts = home.as_ref().map(|s| s.total_points).unwrap_or(0.0);
        let away_pts = away.as_ref().map(|s| s.total_points).unwrap_or(0.0);
        if let Some(side) = home {
            if let Some(scores) = weekly.get_mut(&side.team_id) {
                scores[idx] = (home_pts, away_pts);
            }
        }
        if let Some(side) = away {
            if let Some(scores) = weekly.get_mut(&side.team_id) {
                scores[idx] = (away_pts, home_pts);
            }
        }
    }

    let teams: Vec<Team> = response
        .teams
        .iter()
        .map(|t| {
            let scores = weekly.remove(&t.id).unwrap_or_default();
            let (wins, losses, ties) = match &t.record {
                Some(r) => (r.overall.wins, r.overall.losses, r.overall.ties),
                None => record_from_scores(&scores),
            };
            Team {
                id: t.id,
                name: t.display_name(),
                abbrev: if t.abbrev.is_empty() {
                    format!("T{}", t.id)
                } else {
                    t.abbrev.clone()
                },
                wins,
                losses,
                ties,
                scores_for: scores.iter().map(|&(f, _)| f).collect(),
                scores_against: scores.iter().map(|&(_, a)| a).collect(),
            }
        })
        .collect();

    // Matchups: every scheduled pairing, bye weeks included. The home side
    // is required; a missing home with a present away is normalized so the
    // lone side is always `home`.
    let mut matchups = Vec::new();
    for m in &response.schedule {
        let week = m.matchup_period_id;
        let is_current = week == current_week;
        let convert = |side: &raw::RawMatchupSide| MatchupSide {
            team_id: side.team_id,
            score: if is_current {
                side.total_points_live.unwrap_or(side.total_points)
            } else {
                side.total_points
            },
            projected: side.total_projected_points_live,
        };
        match (&m.home, &m.away) {
            (Some(home), away) => matchups.push(Matchup {
                week,
                home: convert(home),
                away: away.as_ref().map(convert),
            }),
            (None, Some(away)) => matchups.push(Matchup {
                week,
                home: convert(away),
                away: None,
            }),
            (None, None) => {}
        }
    }

    // Rosters for the current week: prefer the per-matchup roster view,
    // fall back to the team roster (same scoring period).
    let mut rosters: Vec<Roster> = Vec::new();
    for m in &response.schedule {
        if m.matchup_period_id != current_week {
            continue;
        }
        for side in [&m.home, &m.away].into_iter().flatten() {
            if let Some(raw_roster) = &side.roster_for_current_scoring_period {
                rosters.push(convert_roster(side.team_id, current_week, raw_roster));
            }
        }
    }
    for t in &response.teams {
        if rosters.iter().any(|r| r.team_id == t.id) {
            continue;
        }
        if let Some(raw_roster) = &t.roster {
            rosters.push(convert_roster(t.id, current_week, raw_roster));
        }
    }

    let transactions = convert_transactions(&response.transactions, &players);

    Ok(LeagueSnapshot {
        league_name: response.settings.name,
        season: response.season_id,
        current_week,
        teams,
        matchups,
        rosters,
        transactions,
    })
}

fn index_players(players: &mut HashMap<u64, (String, Position)>, roster: &raw::RawRosterEntries) {
    for entry in &roster.entries {
        if let Some(pool) = &entry.player_pool_entry {
            players.insert(
                pool.player.id,
                (
                    pool.player.full_name.clone(),
                    Position::from_espn_id(pool.player.default_position_id),
                ),
            );
        }
    }
}

fn record_from_scores(scores: &[(f64, f64)]) -> (u32, u32, u32) {
    let mut record = (0, 0, 0);
    for &(pf, pa) in scores {
        if pf > pa {
            record.0 += 1;
        } else if pf < pa {
            record.1 += 1;
        } else {
            record.2 += 1;
        }
    }
    record
}

fn convert_roster(team_id: u32, week: u16, raw_roster: &raw::RawRosterEntries) -> Roster {
    let mut slots = Vec::new();
    for entry in &raw_roster.entries {
        // Unmapped lineup slots (IDP leagues) are dropped.
        let Some(slot) = SlotId::from_espn_id(entry.lineup_slot_id) else {
            continue;
        };
        let Some(pool) = &entry.player_pool_entry else {
            continue;
        };
        let player = &pool.player;

        let stat_for = |source: u8| {
            player
                .stats
                .iter()
                .find(|s| s.scoring_period_id == week && s.stat_source_id == source)
                .and_then(|s| s.applied_total)
        };
        let actual = stat_for(0);
        let projected = stat_for(1);

        slots.push(RosterSlot {
            player: player.full_name.clone(),
            position: Position::from_espn_id(player.default_position_id),
            slot,
            points: actual.unwrap_or(0.0),
            projected,
            injury_status: player
                .injury_status
                .as_deref()
                .map(InjuryStatus::parse)
                .unwrap_or(InjuryStatus::Normal),
            // An official stat tuple only appears once the player's game
            // has started.
            played: actual.is_some(),
            // A zero projection with no game played marks a bye week.
            on_bye: actual.is_none() && projected == Some(0.0),
        });
    }
    Roster {
        team_id,
        week,
        slots,
    }
}

fn convert_transactions(
    raw_txs: &[raw::RawTransaction],
    players: &HashMap<u64, (String, Position)>,
) -> Vec<Transaction> {
    let mut out = Vec::new();
    for tx in raw_txs {
        // Pending and vetoed moves are invisible to the league.
        if tx.status.as_deref().is_some_and(|s| s != "EXECUTED") {
            continue;
        }
        let is_trade = tx.kind.starts_with("TRADE");
        let is_waiver = tx.kind == "WAIVER";
        for item in &tx.items {
            let kind = if is_trade {
                TransactionKind::Trade
            } else {
                match item.kind.as_str() {
                    "ADD" => TransactionKind::Add,
                    "DROP" => TransactionKind::Drop,
                    _ => continue,
                }
            };
            let (player, position) = players
                .get(&item.player_id)
                .cloned()
                .unwrap_or_else(|| (format!("Player #{}", item.player_id), Position::Unknown));
            out.push(Transaction {
                team_id: tx.team_id,
                kind,
                player,
                position,
                timestamp_ms: tx.proposed_date.unwrap_or(0),
                faab: if is_waiver && kind == TransactionKind::Add {
                    tx.bid_amount
                } else {
                    None
                },
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture() -> raw::LeagueResponse {
        let body = json!({
            "seasonId": 2025,
            "status": { "currentMatchupPeriod": 3, "latestScoringPeriod": 3 },
            "settings": { "name": "The Gridiron Club" },
            "teams": [
                {
                    "id": 1,
                    "abbrev": "GRID",
                    "name": "Gridlock",
                    "record": { "overall": { "wins": 2, "losses": 0, "ties": 0 } },
                    "roster": { "entries": [
                        {
                            "lineupSlotId": 0,
                            "playerPoolEntry": { "player": {
                                "id": 101,
                                "fullName": "A. Passer",
                                "defaultPositionId": 1,
                                "injuryStatus": "QUESTIONABLE",
                                "stats": [
                                    { "scoringPeriodId": 3, "statSourceId": 1, "appliedTotal": 18.5 }
                                ]
                            }}
                        },
                        {
                            "lineupSlotId": 20,
                            "playerPoolEntry": { "player": {
                                "id": 102,
                                "fullName": "B. Runner",
                                "defaultPositionId": 2,
                                "injuryStatus": "ACTIVE",
                                "stats": [
                                    { "scoringPeriodId": 3, "statSourceId": 0, "appliedTotal": 12.0 },
                                    { "scoringPeriodId": 3, "statSourceId": 1, "appliedTotal": 10.0 }
                                ]
                            }}
                        }
                    ]}
                },
                {
                    "id": 2,
                    "abbrev": "PUNT",
                    "location": "Punt",
                    "nickname": "Squad",
                    "record": { "overall": { "wins": 0, "losses": 2, "ties": 0 } }
                }
            ],
            "schedule": [
                {
                    "matchupPeriodId": 1,
                    "home": { "teamId": 1, "totalPoints": 110.0 },
                    "away": { "teamId": 2, "totalPoints": 95.0 }
                },
                {
                    "matchupPeriodId": 2,
                    "home": { "teamId": 2, "totalPoints": 88.0 },
                    "away": { "teamId": 1, "totalPoints": 102.0 }
                },
                {
                    "matchupPeriodId": 3,
                    "home": {
                        "teamId": 1,
                        "totalPoints": 0.0,
                        "totalPointsLive": 45.5,
                        "totalProjectedPointsLive": 104.0
                    },
                    "away": {
                        "teamId": 2,
                        "totalPoints": 0.0,
                        "totalPointsLive": 51.0,
                        "totalProjectedPointsLive": 99.0
                    }
                }
            ],
            "transactions": [
                {
                    "teamId": 2,
                    "type": "WAIVER",
                    "status": "EXECUTED",
                    "proposedDate": 1758700800000i64,
                    "bidAmount": 12,
                    "items": [
                        { "type": "ADD", "playerId": 102 },
                        { "type": "DROP", "playerId": 999 }
                    ]
                },
                {
                    "teamId": 1,
                    "type": "WAIVER",
                    "status": "VETOED",
                    "items": [ { "type": "ADD", "playerId": 101 } ]
                }
            ]
        });
        serde_json::from_value(body).expect("fixture deserializes")
    }

    #[test]
    fn snapshot_basics() {
        let snap = build_snapshot(fixture()).unwrap();
        assert_eq!(snap.league_name, "The Gridiron Club");
        assert_eq!(snap.season, 2025);
        assert_eq!(snap.current_week, 3);
        assert_eq!(snap.teams.len(), 2);
        assert_eq!(snap.completed_weeks(), 2);
    }

    #[test]
    fn weekly_scores_come_from_schedule() {
        let snap = build_snapshot(fixture()).unwrap();
        let grid = snap.team(1).unwrap();
        assert_eq!(grid.scores_for, vec![110.0, 102.0]);
        assert_eq!(grid.scores_against, vec![95.0, 88.0]);
        assert_eq!(grid.wins, 2);
    }

    #[test]
    fn split_team_name_is_joined() {
        let snap = build_snapshot(fixture()).unwrap();
        assert_eq!(snap.team(2).unwrap().name, "Punt Squad");
    }

    #[test]
    fn current_week_uses_live_totals() {
        let snap = build_snapshot(fixture()).unwrap();
        let m = snap.matchups_for_week(3).next().unwrap();
        assert_eq!(m.home.score, 45.5);
        assert_eq!(m.home.projected, Some(104.0));
        assert_eq!(m.away.as_ref().unwrap().score, 51.0);
    }

    #[test]
    fn roster_entries_map_slots_and_stats() {
        let snap = build_snapshot(fixture()).unwrap();
        let roster = snap.roster(1, 3).unwrap();
        assert_eq!(roster.slots.len(), 2);

        let qb = &roster.slots[0];
        assert_eq!(qb.player, "A. Passer");
        assert_eq!(qb.slot, SlotId::Qb);
        assert_eq!(qb.position, Position::Qb);
        assert_eq!(qb.projected, Some(18.5));
        assert!(!qb.played);
        assert_eq!(qb.injury_status, InjuryStatus::Questionable);

        let rb = &roster.slots[1];
        assert_eq!(rb.slot, SlotId::Bench);
        assert_eq!(rb.points, 12.0);
        assert!(rb.played);
    }

    #[test]
    fn executed_transactions_resolve_player_names() {
        let snap = build_snapshot(fixture()).unwrap();
        // The vetoed waiver is dropped; the executed one yields add + drop.
        assert_eq!(snap.transactions.len(), 2);

        let add = &snap.transactions[0];
        assert_eq!(add.team_id, 2);
        assert_eq!(add.kind, TransactionKind::Add);
        assert_eq!(add.player, "B. Runner");
        assert_eq!(add.faab, Some(12));

        let drop = &snap.transactions[1];
        assert_eq!(drop.kind, TransactionKind::Drop);
        assert_eq!(drop.player, "Player #999");
        assert_eq!(drop.faab, None);
    }

    #[test]
    fn zero_matchup_period_is_rejected() {
        let mut response = fixture();
        response.status.current_matchup_period = 0;
        assert!(matches!(
            build_snapshot(response),
            Err(EspnError::Shape { .. })
        ));
    }
}
