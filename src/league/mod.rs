// League snapshot data model.
//
// Everything in this module is a read-only value type: one `LeagueSnapshot`
// is assembled per invocation from the ESPN API response, handed to the
// analytics functions, and dropped. Nothing here is persisted or mutated
// after construction.

pub mod slot;

pub use slot::{Position, SlotId, SLOT_DISPLAY_ORDER};

use serde::{Deserialize, Serialize};

pub type TeamId = u32;

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// One fantasy team with its cumulative record and week-by-week scoring
/// history. `scores_for[0]` is week 1; both histories cover the same weeks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub abbrev: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub scores_for: Vec<f64>,
    pub scores_against: Vec<f64>,
}

impl Team {
    /// Total points scored through `week` (1-based, inclusive).
    pub fn points_through(&self, week: u16) -> f64 {
        self.scores_for
            .iter()
            .take(week as usize)
            .sum()
    }

    /// Average margin of victory through `week`. Zero when no weeks played.
    pub fn avg_margin_through(&self, week: u16) -> f64 {
        let weeks = (week as usize).min(self.scores_for.len());
        if weeks == 0 {
            return 0.0;
        }
        let margin: f64 = self
            .scores_for
            .iter()
            .zip(self.scores_against.iter())
            .take(weeks)
            .map(|(f, a)| f - a)
            .sum();
        margin / weeks as f64
    }
}

// ---------------------------------------------------------------------------
// Matchups
// ---------------------------------------------------------------------------

/// One team's side of a weekly matchup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchupSide {
    pub team_id: TeamId,
    pub score: f64,
    pub projected: Option<f64>,
}

/// A weekly pairing. A missing `away` side is a bye; byes are excluded from
/// head-to-head analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub week: u16,
    pub home: MatchupSide,
    pub away: Option<MatchupSide>,
}

impl Matchup {
    pub fn is_bye(&self) -> bool {
        self.away.is_none()
    }
}

// ---------------------------------------------------------------------------
// Rosters
// ---------------------------------------------------------------------------

/// Player injury designation as reported by ESPN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InjuryStatus {
    Active,
    Normal,
    Questionable,
    Doubtful,
    Out,
    InjuryReserve,
    Suspension,
    Other(String),
}

impl InjuryStatus {
    /// Parse ESPN's SCREAMING_SNAKE status strings.
    pub fn parse(s: &str) -> Self {
        match s {
            "ACTIVE" => InjuryStatus::Active,
            "NORMAL" => InjuryStatus::Normal,
            "QUESTIONABLE" => InjuryStatus::Questionable,
            "DOUBTFUL" => InjuryStatus::Doubtful,
            "OUT" => InjuryStatus::Out,
            "INJURY_RESERVE" => InjuryStatus::InjuryReserve,
            "SUSPENSION" => InjuryStatus::Suspension,
            other => InjuryStatus::Other(other.to_string()),
        }
    }

    /// True for statuses that need no attention in the monitor report.
    pub fn is_healthy(&self) -> bool {
        matches!(self, InjuryStatus::Active | InjuryStatus::Normal)
    }

    /// True for statuses that make a player eligible to sit in an IR slot.
    pub fn is_ir_eligible(&self) -> bool {
        matches!(self, InjuryStatus::InjuryReserve | InjuryStatus::Out)
    }

    /// Human-readable label, e.g. "Injury Reserve".
    pub fn label(&self) -> String {
        match self {
            InjuryStatus::Active => "Active".to_string(),
            InjuryStatus::Normal => "Normal".to_string(),
            InjuryStatus::Questionable => "Questionable".to_string(),
            InjuryStatus::Doubtful => "Doubtful".to_string(),
            InjuryStatus::Out => "Out".to_string(),
            InjuryStatus::InjuryReserve => "Injury Reserve".to_string(),
            InjuryStatus::Suspension => "Suspension".to_string(),
            InjuryStatus::Other(s) => {
                let mut out = String::new();
                for word in s.split('_') {
                    if !out.is_empty() {
                        out.push(' ');
                    }
                    let mut chars = word.chars();
                    if let Some(c) = chars.next() {
                        out.push(c.to_ascii_uppercase());
                        out.extend(chars.flat_map(|c| c.to_lowercase()));
                    }
                }
                out
            }
        }
    }
}

/// A player assignment within one team's weekly lineup. Exactly one slot per
/// rostered player per week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSlot {
    pub player: String,
    pub position: Position,
    pub slot: SlotId,
    pub points: f64,
    /// Projected points for the week; absent for players without a
    /// published projection.
    pub projected: Option<f64>,
    pub injury_status: InjuryStatus,
    /// Whether the player's NFL game has started/completed.
    pub played: bool,
    pub on_bye: bool,
}

/// A team's full lineup (starters + bench + IR) for one week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    pub team_id: TeamId,
    pub week: u16,
    pub slots: Vec<RosterSlot>,
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Add,
    Drop,
    Trade,
}

/// One roster move attributed to a team. Adds carry the FAAB amount spent
/// when the league uses a FAAB waiver budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub team_id: TeamId,
    pub kind: TransactionKind,
    pub player: String,
    pub position: Position,
    pub timestamp_ms: i64,
    pub faab: Option<u32>,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The complete read-only picture of a league at one point in time.
///
/// Built once per invocation by the ESPN client; every analytics function
/// consumes it by shared reference and computes fresh derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub league_name: String,
    pub season: u16,
    /// ESPN's current scoring period (the in-progress week).
    pub current_week: u16,
    pub teams: Vec<Team>,
    /// All matchups with recorded scores, every week, byes included.
    pub matchups: Vec<Matchup>,
    /// Weekly lineups for whichever weeks the caller fetched.
    pub rosters: Vec<Roster>,
    pub transactions: Vec<Transaction>,
}

impl LeagueSnapshot {
    /// Number of fully completed weeks: the shortest scoring history across
    /// all teams. A league with no teams has zero completed weeks.
    pub fn completed_weeks(&self) -> u16 {
        self.teams
            .iter()
            .map(|t| t.scores_for.len())
            .min()
            .unwrap_or(0) as u16
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Look a team up by exact name, falling back to abbreviation.
    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams
            .iter()
            .find(|t| t.name == name)
            .or_else(|| self.teams.iter().find(|t| t.abbrev == name))
    }

    pub fn matchups_for_week(&self, week: u16) -> impl Iterator<Item = &Matchup> {
        self.matchups.iter().filter(move |m| m.week == week)
    }

    pub fn roster(&self, team_id: TeamId, week: u16) -> Option<&Roster> {
        self.rosters
            .iter()
            .find(|r| r.team_id == team_id && r.week == week)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
