// League herald entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (auto-copying defaults on first run)
// 3. Build the fantasy API client and the configured chat sinks
// 4. Run the requested command: the scheduler loop, a one-shot post,
//    or a local render to stdout

use league_herald::config;
use league_herald::dispatch::{Dispatcher, Operation, Request};
use league_herald::espn::EspnClient;
use league_herald::schedule;
use league_herald::sink;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "league-herald", about = "Fantasy league reports posted to chat", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the weekly posting schedule until interrupted.
    Run,
    /// Render one report and post it to every configured sink.
    Send {
        /// Operation name, e.g. `power-rankings` or `scoreboard`.
        operation: String,
        #[arg(long)]
        week: Option<u16>,
        /// Team name or abbreviation (required by `lineup`).
        #[arg(long)]
        team: Option<String>,
        /// Date for the waiver report, YYYY-MM-DD.
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Render one report to stdout without posting.
    Show {
        operation: String,
        #[arg(long)]
        week: Option<u16>,
        #[arg(long)]
        team: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List the available operations.
    Operations,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    if let Command::Operations = cli.command {
        for op in Operation::ALL {
            println!("{op}");
        }
        return Ok(());
    }

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        league_id = config.league.league_id,
        season = config.league.season,
        "config loaded"
    );

    let timezone: Tz = config
        .league
        .timezone
        .parse()
        .map_err(anyhow::Error::msg)
        .context("failed to parse league timezone")?;
    let client = EspnClient::new(
        config.league.league_id,
        config.league.season,
        &config.credentials,
    )
    .context("failed to build the fantasy API client")?;
    let dispatcher = Dispatcher::new(timezone);

    match cli.command {
        Command::Run => {
            if !config.schedule.enabled {
                bail!("the schedule is disabled in config/league.toml ([schedule] enabled = false)");
            }
            let sinks = sink::from_credentials(&config.credentials);
            if sinks.is_empty() {
                bail!("no chat sinks configured; add a webhook to config/credentials.toml");
            }
            schedule::run(&config, &client, &dispatcher, &sinks).await;
            Ok(())
        }
        Command::Send {
            operation,
            week,
            team,
            date,
        } => {
            let sinks = sink::from_credentials(&config.credentials);
            if sinks.is_empty() {
                bail!("no chat sinks configured; add a webhook to config/credentials.toml");
            }
            let text = render(&client, &dispatcher, &operation, week, team.as_deref(), date).await?;
            if text.is_empty() {
                info!(%operation, "nothing to post");
                return Ok(());
            }
            for s in &sinks {
                sink::deliver(s.as_ref(), &text)
                    .await
                    .with_context(|| format!("failed to post to {}", s.name()))?;
            }
            info!(%operation, sinks = sinks.len(), "report posted");
            Ok(())
        }
        Command::Show {
            operation,
            week,
            team,
            date,
        } => {
            let text = render(&client, &dispatcher, &operation, week, team.as_deref(), date).await?;
            println!("{text}");
            Ok(())
        }
        Command::Operations => unreachable!("handled above"),
    }
}

async fn render(
    client: &EspnClient,
    dispatcher: &Dispatcher,
    operation: &str,
    week: Option<u16>,
    team: Option<&str>,
    date: Option<NaiveDate>,
) -> anyhow::Result<String> {
    let op: Operation = operation
        .parse()
        .context("unrecognized operation; try `league-herald operations`")?;
    let snapshot = client
        .fetch_snapshot()
        .await
        .context("failed to fetch the league snapshot")?;
    let request = Request {
        op,
        week,
        team,
        date,
    };
    dispatcher
        .render(&snapshot, &request)
        .with_context(|| format!("failed to render `{op}`"))
}

/// Initialize tracing to stderr, leaving stdout for `show` output.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("league_herald=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
