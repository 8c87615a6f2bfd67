pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{FeedKind, SortOrder, TimeRange};

#[derive(Parser)]
#[command(name = "hnfeed")]
#[command(about = "A terminal Hacker News reader", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/hnfeed/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the TUI (default)
    Tui,
    /// Print a feed
    Feed(FeedArgs),
    /// Print the top-level comments of a story
    Comments {
        /// Story id
        id: u64,

        /// Maximum number of comments (default: feed.comment_limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Print the best picks
    Picks,
}

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// top, new, best, show, ask or job
    pub kind: FeedKind,

    /// Number of pages to load
    #[arg(short, long, default_value_t = 1)]
    pub pages: usize,

    /// Case-insensitive title/url filter
    #[arg(short, long)]
    pub search: Option<String>,

    /// Show top stories up to this day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Only stories newer than 1d, 1m or 1y
    #[arg(short, long)]
    pub range: Option<TimeRange>,

    /// latest or oldest (show, ask and job only)
    #[arg(long)]
    pub sort: Option<SortOrder>,
}
