//! # hnfeed
//!
//! A terminal reader for the public Hacker News API.
//!
//! ## Architecture
//!
//! ```text
//! HnApi (HTTP) → HnClient (cache) → FeedView / CommentsDialog → TUI / CLI
//! ```
//!
//! Views are synchronous state machines. They hand out request values, the
//! caller runs them on the async client, and the results are applied back.
//! A generation counter on every request discards responses that arrive
//! after the view moved on.
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the TUI
//! hnfeed
//!
//! # Print the front page as it looked at the end of a day
//! hnfeed feed top --date 2024-02-29
//!
//! # Print the comments of a story
//! hnfeed comments 8863
//! ```

/// Upstream API access and caching.
///
/// - [`HnApi`](api::HnApi): Async trait over the two upstream endpoints
/// - [`HttpApi`](api::HttpApi): reqwest-based implementation
/// - [`HnClient`](api::HnClient): Deduplicating cache with per-query staleness
pub mod api;

/// Application context and error handling.
pub mod app;

/// Command-line interface using clap.
///
/// - `tui` - Launch the TUI (default)
/// - `feed <kind>` - Print a feed
/// - `comments <id>` - Print the comments of a story
/// - `picks` - Print the best picks
pub mod cli;

/// Comment viewer state.
pub mod comments;

/// Configuration management.
///
/// Loads from `~/.config/hnfeed/config.toml`, supporting:
/// - API location and timeouts
/// - Page size, lookahead cap and cache staleness
/// - Custom colors (named or hex)
/// - Custom keybindings
pub mod config;

/// Core domain models: [`Story`](domain::Story), [`Comment`](domain::Comment)
/// and the feed selectors.
pub mod domain;

/// Paging, filtering and the feed view state machine.
pub mod feed;

pub mod format;

/// Terminal user interface built with ratatui.
///
/// Keybindings: j/k navigate, Tab or 1-6 switch feeds, / searches,
/// h/l step the date, c opens comments, o opens in browser, R refreshes,
/// q quits.
pub mod tui;
