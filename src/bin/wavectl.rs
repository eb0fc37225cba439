use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use wavectl::commands::feedback::{self, ApproveOutcome, ListQuery, SortOrder};
use wavectl::commands::scores;
use wavectl::commands::{Page, RemovalOutcome};
use wavectl::render;
use wavectl::{CliTransport, Store};

#[derive(Debug, Parser)]
#[command(name = "wavectl")]
#[command(about = "Operator tools for the hosted game's stored state", long_about = None)]
struct Cli {
    /// Gateway tool used to reach the remote store
    /// (falls back to $WAVECTL_KV_BIN, then `gamekv`).
    #[arg(long, global = true)]
    kv_bin: Option<PathBuf>,

    /// Debug-level logging; JSON exports include sensitive fields.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Player feedback: suggestions, moderation queue, survey stats.
    Feedback {
        #[command(subcommand)]
        cmd: FeedbackCmd,
    },
    /// Leaderboard and play activity.
    Scores {
        #[command(subcommand)]
        cmd: ScoresCmd,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Recent,
    Upvotes,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Recent => SortOrder::Recent,
            SortArg::Upvotes => SortOrder::Upvotes,
        }
    }
}

#[derive(Debug, Subcommand)]
enum FeedbackCmd {
    /// List published suggestions.
    List {
        #[arg(long)]
        json: bool,
        #[arg(long, value_enum, default_value = "recent")]
        sort: SortArg,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Case-insensitive substring match on the suggestion text.
        #[arg(long)]
        search: Option<String>,
    },
    /// Show pending feedback awaiting review, in insertion order.
    Queue {
        #[arg(long)]
        json: bool,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Survey averages and rating distributions.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Publish a pending feedback item as a suggestion.
    Approve {
        id: String,
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long)]
        yes: bool,
    },
    /// Drop a pending feedback item without publishing it.
    Reject {
        id: String,
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long)]
        yes: bool,
    },
    /// Remove a published suggestion.
    Delete {
        id: String,
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum ScoresCmd {
    /// Show the leaderboard, best score first.
    List {
        #[arg(long)]
        json: bool,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Play-activity summary.
    Stats {
        #[arg(long)]
        json: bool,
    },
    /// Remove a leaderboard entry.
    Remove {
        id: String,
        #[arg(long)]
        dry_run: bool,
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let kv_bin = gateway_bin(cli.kv_bin);

    match cli.cmd {
        Command::Feedback { cmd } => match cmd {
            FeedbackCmd::List { json, sort, limit, offset, search } => {
                let store = open(&kv_bin, false);
                let out = feedback::list(
                    &store,
                    &ListQuery {
                        search,
                        sort: sort.into(),
                        page: Page { offset, limit },
                    },
                )?;
                if json {
                    let exports = render::suggestion_exports(&out, cli.verbose);
                    println!("{}", serde_json::to_string_pretty(&exports)?);
                } else {
                    render::suggestion_table(&out);
                }
                Ok(())
            }
            FeedbackCmd::Queue { json, limit, offset } => {
                let store = open(&kv_bin, false);
                let out = feedback::queue(&store, &Page { offset, limit })?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    render::queue_table(&out);
                }
                Ok(())
            }
            FeedbackCmd::Stats { json } => {
                let store = open(&kv_bin, false);
                let report = feedback::stats(&store)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    render::feedback_stats(&report);
                }
                Ok(())
            }
            FeedbackCmd::Approve { id, dry_run, yes } => {
                let store = open(&kv_bin, dry_run);
                match feedback::approve(&store, &id, yes)? {
                    ApproveOutcome::Published(_) if dry_run => {
                        println!("dry-run: would publish {id} and drop it from the queue");
                    }
                    ApproveOutcome::Published(_) => {
                        println!("approved {id}; suggestion published");
                    }
                    ApproveOutcome::Declined => println!("aborted; nothing changed"),
                }
                Ok(())
            }
            FeedbackCmd::Reject { id, dry_run, yes } => {
                let store = open(&kv_bin, dry_run);
                let outcome = feedback::reject(&store, &id, yes)?;
                report_removal(outcome, "pending feedback", &id, dry_run);
                Ok(())
            }
            FeedbackCmd::Delete { id, dry_run, yes } => {
                let store = open(&kv_bin, dry_run);
                let outcome = feedback::delete(&store, &id, yes)?;
                report_removal(outcome, "suggestion", &id, dry_run);
                Ok(())
            }
        },
        Command::Scores { cmd } => match cmd {
            ScoresCmd::List { json, limit, offset } => {
                let store = open(&kv_bin, false);
                let out = scores::list(&store, &Page { offset, limit })?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&out)?);
                } else {
                    render::score_table(&out);
                }
                Ok(())
            }
            ScoresCmd::Stats { json } => {
                let store = open(&kv_bin, false);
                let report = scores::stats(&store, chrono::Utc::now().timestamp_millis())?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    render::activity_stats(&report);
                }
                Ok(())
            }
            ScoresCmd::Remove { id, dry_run, yes } => {
                let store = open(&kv_bin, dry_run);
                let outcome = scores::remove(&store, &id, yes)?;
                report_removal(outcome, "score entry", &id, dry_run);
                Ok(())
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn gateway_bin(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os("WAVECTL_KV_BIN").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("gamekv"))
}

fn open(kv_bin: &Path, dry_run: bool) -> Store {
    Store::new(CliTransport::new(kv_bin), dry_run)
}

fn report_removal(outcome: RemovalOutcome, noun: &str, id: &str, dry_run: bool) {
    match outcome {
        RemovalOutcome::Removed if dry_run => println!("dry-run: would remove {noun} {id}"),
        RemovalOutcome::Removed => println!("removed {noun} {id}"),
        RemovalOutcome::AlreadyAbsent => println!("{noun} {id} is not present; nothing to do"),
        RemovalOutcome::Declined => println!("aborted; nothing changed"),
    }
}
