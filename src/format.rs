//! Pure formatting and time helpers shared by the CLI and the TUI.

use chrono::{Local, NaiveDate, TimeZone, Utc};
use url::Url;

use crate::domain::TimeRange;

const FALLBACK_HOST: &str = "news.ycombinator.com";

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Short relative age label: `"10m ago"`, `"5h ago"`, `"3d ago"`.
///
/// Units are floored; future timestamps read as `"0m ago"`.
pub fn time_ago(unix_seconds: i64, now_millis: i64) -> String {
    let diff_secs = (now_millis.saturating_sub(to_millis(unix_seconds)) / 1000).max(0);
    let minutes = diff_secs / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h ago", hours);
    }
    format!("{}d ago", hours / 24)
}

/// Hostname of a story link without a leading `www.`.
///
/// Self posts (no url) and unparsable urls fall back to the HN host.
pub fn host_from_url(url: Option<&str>) -> String {
    url.and_then(|u| Url::parse(u).ok())
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}

/// Whether a unix timestamp is no older than `range`. The boundary is inclusive.
pub fn within_range(unix_seconds: i64, range: TimeRange, now_millis: i64) -> bool {
    now_millis.saturating_sub(to_millis(unix_seconds)) <= range.max_age_millis()
}

/// Unix seconds to milliseconds, clamped at the `i64` bounds.
pub fn to_millis(unix_seconds: i64) -> i64 {
    unix_seconds.saturating_mul(1000)
}

/// 23:59:59.999 local time on `date`, in unix milliseconds.
pub fn end_of_day_millis(date: NaiveDate) -> i64 {
    let naive = date
        .and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or_else(|| date.and_time(chrono::NaiveTime::MIN));
    match Local.from_local_datetime(&naive).latest() {
        Some(dt) => dt.timestamp_millis(),
        None => naive.and_utc().timestamp_millis(),
    }
}

/// Label used by the date stepper, e.g. `"Oct 18"`.
pub fn date_label(date: NaiveDate) -> String {
    date.format("%b %d").to_string()
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Flatten comment HTML into plain text for the terminal.
pub fn strip_html(html: &str) -> String {
    let with_breaks = html.replace("<p>", "\n\n");
    let mut result = String::new();
    let mut in_tag = false;
    let mut last_was_space = false;

    for c in with_breaks.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '\n' if !in_tag => {
                result.push('\n');
                last_was_space = true;
            }
            _ if !in_tag => {
                if c.is_whitespace() {
                    if !last_was_space {
                        result.push(' ');
                        last_was_space = true;
                    }
                } else {
                    result.push(c);
                    last_was_space = false;
                }
            }
            _ => {}
        }
    }

    html_escape::decode_html_entities(result.trim()).to_string()
}
