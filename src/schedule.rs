// Weekly posting schedule.
//
// The cadence follows the NFL week: matchups Thursday evening, projections
// Sunday afternoon, close scores Monday evening, the recap and power
// rankings Tuesday, standings and waivers Wednesday morning. All times are
// in the league's configured timezone.

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use chrono_tz::Tz;
use tracing::{error, info};

use crate::config::{Config, ScheduleConfig};
use crate::dispatch::{Dispatcher, Operation, Request};
use crate::espn::EspnClient;
use crate::sink::{deliver, Sink};

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// One recurring post: an operation fired at a weekly wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Job {
    pub op: Operation,
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

const fn job(op: Operation, weekday: Weekday, hour: u32, minute: u32) -> Job {
    Job {
        op,
        weekday,
        hour,
        minute,
    }
}

/// The standard weekly cadence, filtered by the schedule toggles.
pub fn default_jobs(schedule: &ScheduleConfig) -> Vec<Job> {
    let mut jobs = vec![
        job(Operation::Matchups, Weekday::Thu, 19, 30),
        job(Operation::Scoreboard, Weekday::Fri, 7, 30),
        job(Operation::Projections, Weekday::Sun, 16, 0),
        job(Operation::Projections, Weekday::Sun, 20, 0),
        job(Operation::CloseScores, Weekday::Mon, 18, 30),
        job(Operation::Scoreboard, Weekday::Tue, 7, 30),
        job(Operation::PowerRankings, Weekday::Tue, 18, 30),
        job(Operation::OptimalScores, Weekday::Tue, 18, 31),
        job(Operation::Standings, Weekday::Wed, 7, 30),
    ];
    if schedule.trophies {
        jobs.push(job(Operation::Trophies, Weekday::Tue, 9, 30));
    }
    if schedule.waivers {
        jobs.push(job(Operation::Waivers, Weekday::Wed, 7, 31));
    }
    if schedule.monitor {
        jobs.push(job(Operation::Monitor, Weekday::Thu, 19, 0));
        jobs.push(job(Operation::Monitor, Weekday::Sun, 7, 30));
        jobs.push(job(Operation::Monitor, Weekday::Mon, 19, 0));
    }
    jobs
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// The next time this job fires, strictly after `now`. A wall-clock time
/// erased by a DST transition resolves to the later of the two candidates.
pub fn next_occurrence(job: &Job, now: DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    for day_offset in 0..=7 {
        let date = now.date_naive() + Duration::days(day_offset);
        if date.weekday() != job.weekday {
            continue;
        }
        let Some(naive) = date.and_hms_opt(job.hour, job.minute, 0) else {
            continue;
        };
        let Some(candidate) = tz.from_local_datetime(&naive).latest() else {
            continue;
        };
        if candidate > now {
            return candidate;
        }
    }
    // Unreachable: an 8-day window always contains the weekday once past now.
    now + Duration::days(7)
}

/// The soonest job across the whole schedule.
pub fn next_job(jobs: &[Job], now: DateTime<Tz>) -> Option<(Job, DateTime<Tz>)> {
    jobs.iter()
        .map(|j| (*j, next_occurrence(j, now)))
        .min_by_key(|(_, at)| *at)
}

// ---------------------------------------------------------------------------
// The scheduler loop
// ---------------------------------------------------------------------------

/// Sleep-fetch-post forever. Failures of a single post are logged and the
/// loop keeps going; a bot that dies on one bad poll misses the whole week.
pub async fn run(
    config: &Config,
    client: &EspnClient,
    dispatcher: &Dispatcher,
    sinks: &[Box<dyn Sink>],
) {
    let tz: Tz = match config.league.timezone.parse() {
        Ok(tz) => tz,
        Err(_) => {
            // Config validation rejects bad timezones before we get here.
            error!(timezone = %config.league.timezone, "unparseable timezone, scheduler stopped");
            return;
        }
    };
    let jobs = default_jobs(&config.schedule);
    info!(jobs = jobs.len(), timezone = %tz, "scheduler started");

    loop {
        let now = Utc::now().with_timezone(&tz);
        let Some((next, at)) = next_job(&jobs, now) else {
            error!("schedule is empty, scheduler stopped");
            return;
        };
        let wait = (at - now).to_std().unwrap_or_default();
        info!(op = %next.op, at = %at, "next scheduled post");
        tokio::time::sleep(wait).await;

        let snapshot = match client.fetch_snapshot().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(op = %next.op, error = %e, "snapshot fetch failed, skipping post");
                continue;
            }
        };
        let text = match dispatcher.render(&snapshot, &Request::new(next.op)) {
            Ok(text) => text,
            Err(e) => {
                error!(op = %next.op, error = %e, "render failed, skipping post");
                continue;
            }
        };
        if text.is_empty() {
            info!(op = %next.op, "nothing to post");
            continue;
        }
        for sink in sinks {
            if let Err(e) = deliver(sink.as_ref(), &text).await {
                error!(sink = sink.name(), error = %e, "delivery failed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
