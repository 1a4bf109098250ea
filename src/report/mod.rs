// Formatters: analytics results -> fixed-width chat text.
//
// Pure text rendering. Row order always matches the declared output order of
// the analytics function that produced the data, so output is deterministic
// given identical input. Platform length limits are handled downstream by
// `text::split_message`; every row here stays well under 80 columns.

pub mod text;

pub use text::{codeblock, split_message};

use chrono::{NaiveDate, TimeZone};
use chrono_tz::Tz;

use crate::analytics::lineup::LineupAnalysis;
use crate::analytics::luck::{ActivityEntry, LuckEntry, WinMatrix};
use crate::analytics::power::PowerRankingEntry;
use crate::analytics::recap::WeeklyRecap;
use crate::league::{LeagueSnapshot, Roster, SlotId, TeamId, TransactionKind};

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

fn abbrev(snapshot: &LeagueSnapshot, id: TeamId) -> &str {
    snapshot.team(id).map(|t| t.abbrev.as_str()).unwrap_or("????")
}

fn name(snapshot: &LeagueSnapshot, id: TeamId) -> &str {
    snapshot.team(id).map(|t| t.name.as_str()).unwrap_or("Unknown")
}

// ---------------------------------------------------------------------------
// Scoreboard / matchups
// ---------------------------------------------------------------------------

/// Actual scores for a week, one row per head-to-head matchup.
pub fn scoreboard(snapshot: &LeagueSnapshot, week: u16) -> String {
    let mut lines = vec!["Score Update".to_string()];
    for m in snapshot.matchups_for_week(week) {
        let Some(away) = &m.away else { continue };
        lines.push(format!(
            "{:>4} {:6.2} - {:6.2} {}",
            abbrev(snapshot, m.home.team_id),
            m.home.score,
            away.score,
            abbrev(snapshot, away.team_id),
        ));
    }
    lines.join("\n")
}

/// Projected scores for a week.
pub fn projected_scoreboard(snapshot: &LeagueSnapshot, week: u16) -> String {
    let mut lines = vec!["Approximate Projected Scores".to_string()];
    for m in snapshot.matchups_for_week(week) {
        let Some(away) = &m.away else { continue };
        lines.push(format!(
            "{:>4} {:6.2} - {:6.2} {}",
            abbrev(snapshot, m.home.team_id),
            m.home.projected.unwrap_or(0.0),
            away.projected.unwrap_or(0.0),
            abbrev(snapshot, away.team_id),
        ));
    }
    lines.join("\n")
}

/// Weekly pairings: full names, then abbreviations with records.
pub fn matchups(snapshot: &LeagueSnapshot, week: u16) -> String {
    let mut full = Vec::new();
    let mut short = Vec::new();
    for m in snapshot.matchups_for_week(week) {
        let Some(away) = &m.away else { continue };
        full.push(format!(
            "{} vs {}",
            name(snapshot, m.home.team_id),
            name(snapshot, away.team_id)
        ));
        let (hw, hl) = snapshot
            .team(m.home.team_id)
            .map(|t| (t.wins, t.losses))
            .unwrap_or((0, 0));
        let (aw, al) = snapshot
            .team(away.team_id)
            .map(|t| (t.wins, t.losses))
            .unwrap_or((0, 0));
        short.push(format!(
            "{:>4} ({}-{}) vs ({}-{}) {}",
            abbrev(snapshot, m.home.team_id),
            hw,
            hl,
            aw,
            al,
            abbrev(snapshot, away.team_id),
        ));
    }
    let mut lines = vec!["Matchups".to_string()];
    lines.extend(full);
    lines.push(String::new());
    lines.extend(short);
    lines.join("\n")
}

fn all_played(roster: &Roster) -> bool {
    roster
        .slots
        .iter()
        .filter(|s| s.slot.is_starting())
        .all(|s| s.played || s.on_bye)
}

/// Projected matchups within 15 points where at least one lineup still has
/// players left to play. Empty string when nothing qualifies.
pub fn close_scores(snapshot: &LeagueSnapshot, week: u16) -> String {
    let mut rows = Vec::new();
    for m in snapshot.matchups_for_week(week) {
        let Some(away) = &m.away else { continue };
        let (Some(hp), Some(ap)) = (m.home.projected, away.projected) else {
            continue;
        };
        if (hp - ap).abs() > 15.0 {
            continue;
        }
        // Unknown rosters count as still in progress.
        let finished = [m.home.team_id, away.team_id].iter().all(|&id| {
            snapshot
                .roster(id, week)
                .map(all_played)
                .unwrap_or(false)
        });
        if finished {
            continue;
        }
        rows.push(format!(
            "{:>4} {:6.2} - {:6.2} {}",
            abbrev(snapshot, m.home.team_id),
            hp,
            ap,
            abbrev(snapshot, away.team_id),
        ));
    }
    if rows.is_empty() {
        return String::new();
    }
    let mut lines = vec!["Projected Close Scores".to_string()];
    lines.extend(rows);
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Standings
// ---------------------------------------------------------------------------

/// Record-sorted standings: wins desc, losses asc, total points desc, name.
pub fn standings(snapshot: &LeagueSnapshot) -> String {
    let mut teams: Vec<&crate::league::Team> = snapshot.teams.iter().collect();
    teams.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| a.losses.cmp(&b.losses))
            .then_with(|| {
                let pa: f64 = a.scores_for.iter().sum();
                let pb: f64 = b.scores_for.iter().sum();
                pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.name.cmp(&b.name))
    });
    let mut lines = vec!["Current Standings".to_string()];
    for (pos, t) in teams.iter().enumerate() {
        lines.push(format!("{:2}: ({}-{}) {}", pos + 1, t.wins, t.losses, t.name));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Monitor
// ---------------------------------------------------------------------------

/// Starters with an injury designation who haven't played yet, plus IR slots
/// occupied by players who no longer qualify for IR.
pub fn monitor(snapshot: &LeagueSnapshot, week: u16) -> String {
    let mut sections = Vec::new();
    for team in &snapshot.teams {
        let Some(roster) = snapshot.roster(team.id, week) else {
            continue;
        };
        let mut players = Vec::new();
        for s in &roster.slots {
            if s.slot.is_starting() && !s.injury_status.is_healthy() && !s.played {
                players.push(format!(
                    "{} {} - {}",
                    s.position.display_str(),
                    s.player,
                    s.injury_status.label()
                ));
            }
            if s.slot == SlotId::Ir && !s.injury_status.is_ir_eligible() {
                players.push(format!(
                    "{} {} - Not IR eligible",
                    s.position.display_str(),
                    s.player
                ));
            }
        }
        if !players.is_empty() {
            sections.push(format!("{}:\n{}", team.name, players.join("\n")));
        }
    }
    if sections.is_empty() {
        return "No Players to Monitor this week. Good Luck!".to_string();
    }
    let mut lines = vec!["Starting Players to Monitor".to_string()];
    lines.extend(sections);
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Waiver report
// ---------------------------------------------------------------------------

/// Transactions that landed on `date` in the league timezone, grouped by
/// team in snapshot order.
pub fn waiver_report(snapshot: &LeagueSnapshot, date: NaiveDate, tz: Tz) -> String {
    let mut sections = Vec::new();
    for team in &snapshot.teams {
        let mut moves = Vec::new();
        for tx in snapshot.transactions.iter().filter(|t| t.team_id == team.id) {
            let Some(when) = tz.timestamp_millis_opt(tx.timestamp_ms).single() else {
                continue;
            };
            if when.date_naive() != date {
                continue;
            }
            let line = match tx.kind {
                TransactionKind::Add => match tx.faab {
                    Some(bid) => format!(
                        "ADDED {} {} (${bid})",
                        tx.position.display_str(),
                        tx.player
                    ),
                    None => format!("ADDED {} {}", tx.position.display_str(), tx.player),
                },
                TransactionKind::Drop => {
                    format!("DROPPED {} {}", tx.position.display_str(), tx.player)
                }
                TransactionKind::Trade => {
                    format!("TRADED {} {}", tx.position.display_str(), tx.player)
                }
            };
            moves.push(line);
        }
        if !moves.is_empty() {
            sections.push(format!("{}:\n{}", team.name, moves.join("\n")));
        }
    }
    if sections.is_empty() {
        return "No waiver transactions".to_string();
    }
    let mut lines = vec![format!("Waiver Report {date}:")];
    lines.extend(sections);
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Power rankings
// ---------------------------------------------------------------------------

/// Ranked table with blended scores and rank deltas. Row order matches the
/// entries' declared rank order.
pub fn power_rankings(snapshot: &LeagueSnapshot, entries: &[PowerRankingEntry]) -> String {
    if entries.is_empty() {
        return "Power Rankings\n(not enough completed games yet)".to_string();
    }
    let mut lines = vec!["Power Rankings".to_string()];
    for e in entries {
        let delta = match e.delta {
            Some(d) if d > 0 => format!("(+{d})"),
            Some(d) if d < 0 => format!("({d})"),
            Some(_) => "(=)".to_string(),
            None => "    ".to_string(),
        };
        lines.push(format!(
            "{:2}: {:6.2} {:>4} {}",
            e.rank,
            e.score,
            delta,
            abbrev(snapshot, e.team_id),
        ));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Optimal lineups
// ---------------------------------------------------------------------------

/// League-wide optimal score table, best efficiency first.
pub fn optimal_scores(snapshot: &LeagueSnapshot, analyses: &[LineupAnalysis]) -> String {
    let mut lines = vec!["Optimal Scores:  (Actual - % of optimal)".to_string()];
    for (pos, a) in analyses.iter().enumerate() {
        let pct = a
            .efficiency
            .map(|e| format!("{e:.2}%"))
            .unwrap_or_else(|| "n/a".to_string());
        lines.push(format!(
            "{:2}: {:>4}: {:6.2} ({:6.2} - {})",
            pos + 1,
            abbrev(snapshot, a.team_id),
            a.optimal,
            a.actual,
            pct,
        ));
    }
    lines.join("\n")
}

/// One team's efficiency plus its optimal lineup listing.
pub fn lineup_efficiency(snapshot: &LeagueSnapshot, analysis: &LineupAnalysis) -> String {
    let pct = analysis
        .efficiency
        .map(|e| format!("{e:.2}%"))
        .unwrap_or_else(|| "n/a".to_string());
    let mut lines = vec![
        format!(
            "{} Week {} - {:.2} of a possible {:.2} ({pct})",
            name(snapshot, analysis.team_id),
            analysis.week,
            analysis.actual,
            analysis.optimal,
        ),
        "Optimal lineup:".to_string(),
    ];
    for s in &analysis.selections {
        lines.push(format!(
            "{} {:4} - {:6.2}",
            text::fit(&s.player, 20),
            s.slot.label(),
            s.points
        ));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Win matrix / luck
// ---------------------------------------------------------------------------

/// Per-team hypothetical all-play record.
pub fn win_matrix_report(snapshot: &LeagueSnapshot, matrix: &WinMatrix) -> String {
    let mut rows: Vec<(TeamId, f64, f64)> = matrix
        .team_ids
        .iter()
        .map(|&id| {
            (
                id,
                matrix.wins(id).unwrap_or(0.0),
                matrix.losses(id).unwrap_or(0.0),
            )
        })
        .collect();
    rows.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| name(snapshot, a.0).cmp(name(snapshot, b.0)))
    });
    let mut lines = vec!["Hypothetical All-Play Records".to_string()];
    for (id, wins, losses) in rows {
        lines.push(format!(
            "{:>4} {:5.1} - {:5.1}",
            abbrev(snapshot, id),
            wins,
            losses
        ));
    }
    lines.join("\n")
}

/// Per-team luck listing, luckiest first.
pub fn luck_report(snapshot: &LeagueSnapshot, entries: &[LuckEntry]) -> String {
    let mut lines = vec!["Luck Index (actual wins vs scoring rank)".to_string()];
    for e in entries {
        lines.push(format!(
            "{:>4} {:+5.2}  ({:.0} actual, {:.2} expected)",
            abbrev(snapshot, e.team_id),
            e.luck,
            e.actual_wins,
            e.expected_wins,
        ));
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Trophies
// ---------------------------------------------------------------------------

/// Weekly recap: trophy lines, manager efficiency extremes, and the most
/// active / laziest managers.
pub fn trophies(
    snapshot: &LeagueSnapshot,
    recap: &WeeklyRecap,
    analyses: &[LineupAnalysis],
    activity: &[ActivityEntry],
) -> String {
    let mut lines = vec![format!("Trophies of week {}:", recap.week)];

    lines.push("👑 High score 👑".to_string());
    lines.push(format!(
        "{} with {:.2} points",
        name(snapshot, recap.high.team_id),
        recap.high.value
    ));
    lines.push("💩 Low score 💩".to_string());
    lines.push(format!(
        "{} with {:.2} points",
        name(snapshot, recap.low.team_id),
        recap.low.value
    ));

    if let Some(b) = &recap.blowout {
        lines.push("😱 Blow out 😱".to_string());
        lines.push(format!(
            "{} blew out {} by {:.2} points",
            name(snapshot, b.winner),
            name(snapshot, b.loser),
            b.margin
        ));
    }
    if let Some(c) = &recap.closest {
        lines.push("😅 Close win 😅".to_string());
        lines.push(format!(
            "{} barely beat {} by {:.2} points",
            name(snapshot, c.winner),
            name(snapshot, c.loser),
            c.margin
        ));
    }
    if let Some(l) = &recap.lucky {
        lines.push("🍀 Lucky 🍀".to_string());
        lines.push(format!(
            "{} was {}-{} against the league, but still got the win",
            name(snapshot, l.team_id),
            l.all_play_wins,
            l.all_play_losses
        ));
    }
    if let Some(u) = &recap.unlucky {
        lines.push("😡 Unlucky 😡".to_string());
        lines.push(format!(
            "{} was {}-{} against the league, but still took an L",
            name(snapshot, u.team_id),
            u.all_play_wins,
            u.all_play_losses
        ));
    }
    if let Some(o) = &recap.overachiever {
        lines.push("📈 Overachiever 📈".to_string());
        lines.push(format!(
            "{} was {:.2} points over their projection",
            name(snapshot, o.team_id),
            o.value
        ));
    }
    if let Some(u) = &recap.underachiever {
        lines.push("📉 Underachiever 📉".to_string());
        lines.push(format!(
            "{} was {:.2} points under their projection",
            name(snapshot, u.team_id),
            u.value.abs()
        ));
    }

    if let Some(best) = analyses.first() {
        if let Some(eff) = best.efficiency {
            lines.push("🤖 Best Manager 🤖".to_string());
            lines.push(format!(
                "{} scored {:.2}% of their optimal score!",
                name(snapshot, best.team_id),
                eff
            ));
        }
    }
    if analyses.len() > 1 {
        if let Some(worst) = analyses.last() {
            if let Some(eff) = worst.efficiency {
                lines.push("🤡 Worst Manager 🤡".to_string());
                lines.push(format!(
                    "{} left {:.2} points on their bench. Only scoring {:.2}% of their optimal score.",
                    name(snapshot, worst.team_id),
                    worst.optimal - worst.actual,
                    eff
                ));
            }
        }
    }

    if let Some(most) = activity.first() {
        lines.push("🤯 Most Active Manager 🤯".to_string());
        lines.push(format!(
            "{} had {} adds, {} drops, and {} trades!",
            name(snapshot, most.team_id),
            most.adds,
            most.drops,
            most.trades
        ));
    }
    if activity.len() > 1 {
        if let Some(laziest) = activity.last() {
            lines.push("😴 Laziest Manager 😴".to_string());
            lines.push(format!(
                "{} had {} adds, {} drops, and {} trades!",
                name(snapshot, laziest.team_id),
                laziest.adds,
                laziest.drops,
                laziest.trades
            ));
        }
    }

    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
