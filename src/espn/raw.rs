// Wire structs for the fantasy v3 league endpoint.
//
// These mirror the JSON shape of a league fetch with the mTeam,
// mMatchupScore, mRoster, mSettings, and mTransactions2 views combined.
// Only the fields this bot consumes are modeled; serde skips the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueResponse {
    pub season_id: u16,
    pub status: Status,
    pub settings: Settings,
    #[serde(default)]
    pub teams: Vec<RawTeam>,
    #[serde(default)]
    pub schedule: Vec<RawMatchup>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub current_matchup_period: u16,
    #[serde(default)]
    pub latest_scoring_period: u16,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub name: String,
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTeam {
    pub id: u32,
    #[serde(default)]
    pub abbrev: String,
    /// Newer seasons carry a single `name`; older ones split it into
    /// `location` + `nickname`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub record: Option<RawRecord>,
    #[serde(default)]
    pub roster: Option<RawRosterEntries>,
}

impl RawTeam {
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }
        match (&self.location, &self.nickname) {
            (Some(loc), Some(nick)) => format!("{loc} {nick}"),
            (Some(loc), None) => loc.clone(),
            (None, Some(nick)) => nick.clone(),
            (None, None) => format!("Team {}", self.id),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawRecord {
    pub overall: RawOverallRecord,
}

#[derive(Debug, Deserialize)]
pub struct RawOverallRecord {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub ties: u32,
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchup {
    pub matchup_period_id: u16,
    #[serde(default)]
    pub home: Option<RawMatchupSide>,
    #[serde(default)]
    pub away: Option<RawMatchupSide>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMatchupSide {
    pub team_id: u32,
    #[serde(default)]
    pub total_points: f64,
    #[serde(default)]
    pub total_points_live: Option<f64>,
    #[serde(default)]
    pub total_projected_points_live: Option<f64>,
    #[serde(default)]
    pub roster_for_current_scoring_period: Option<RawRosterEntries>,
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawRosterEntries {
    #[serde(default)]
    pub entries: Vec<RawRosterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRosterEntry {
    pub lineup_slot_id: u8,
    #[serde(default)]
    pub player_pool_entry: Option<RawPoolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPoolEntry {
    pub player: RawPlayer,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPlayer {
    #[serde(default)]
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub default_position_id: u8,
    #[serde(default)]
    pub injury_status: Option<String>,
    #[serde(default)]
    pub stats: Vec<RawStat>,
}

/// One `stats[]` tuple. `statSourceId` 0 is an official result, 1 is a
/// projection; `scoringPeriodId` is the NFL week.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStat {
    #[serde(default)]
    pub scoring_period_id: u16,
    #[serde(default)]
    pub stat_source_id: u8,
    #[serde(default)]
    pub applied_total: Option<f64>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransaction {
    #[serde(default)]
    pub team_id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub proposed_date: Option<i64>,
    #[serde(default)]
    pub bid_amount: Option<u32>,
    #[serde(default)]
    pub items: Vec<RawTransactionItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub player_id: u64,
}
