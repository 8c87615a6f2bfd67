//! Visible-list derivation from loaded pages. No I/O happens here.

use chrono::NaiveDate;

use crate::domain::{FeedKind, SortOrder, Story, TimeRange};
use crate::feed::FeedPage;
use crate::format::{end_of_day_millis, to_millis, within_range};

#[derive(Debug, Clone, PartialEq)]
pub struct FeedFilter {
    pub kind: FeedKind,
    pub search: String,
    pub range: Option<TimeRange>,
    pub selected_date: NaiveDate,
    pub sort: SortOrder,
    pub now_millis: i64,
}

impl FeedFilter {
    pub fn new(kind: FeedKind, selected_date: NaiveDate, now_millis: i64) -> Self {
        Self {
            kind,
            search: String::new(),
            range: None,
            selected_date,
            sort: SortOrder::default(),
            now_millis,
        }
    }

    /// The date cutoff only narrows the `top` feed; other kinds ignore it.
    pub fn passes_date(&self, story: &Story) -> bool {
        if !self.kind.uses_date_filter() {
            return true;
        }
        match story.time {
            Some(secs) => to_millis(secs) <= end_of_day_millis(self.selected_date),
            None => true,
        }
    }

    fn passes_range(&self, story: &Story) -> bool {
        match (self.range, story.time) {
            (Some(range), Some(secs)) => within_range(secs, range, self.now_millis),
            _ => true,
        }
    }

    pub fn accepts(&self, story: &Story, query: &str) -> bool {
        story.matches_search(query) && self.passes_date(story) && self.passes_range(story)
    }
}

/// Flatten pages in order and keep the stories every filter accepts.
pub fn visible_stories(pages: &[FeedPage], filter: &FeedFilter) -> Vec<Story> {
    let query = filter.search.trim().to_lowercase();

    let mut stories: Vec<Story> = pages
        .iter()
        .flat_map(|page| page.stories.iter())
        .filter(|story| filter.accepts(story, &query))
        .cloned()
        .collect();

    if filter.kind.supports_sort() && filter.sort == SortOrder::Oldest {
        stories.sort_by_key(|story| story.time.unwrap_or(0));
    }
    stories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: u64, title: &str, url: Option<&str>, time: Option<i64>) -> Story {
        Story {
            id,
            title: title.to_string(),
            by: Some("pg".to_string()),
            time,
            score: Some(1),
            descendants: None,
            url: url.map(String::from),
            kids: Vec::new(),
            text: None,
            item_type: Some("story".to_string()),
        }
    }

    fn page(stories: Vec<Story>) -> FeedPage {
        FeedPage {
            stories,
            next_offset: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ids(stories: &[Story]) -> Vec<u64> {
        stories.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_url() {
        let pages = vec![page(vec![
            story(1, "Rust 2.0 released", None, None),
            story(2, "Something else", Some("https://rust-lang.org/x"), None),
            story(3, "Unrelated", Some("https://example.com"), None),
        ])];
        let mut filter = FeedFilter::new(FeedKind::New, date(2024, 1, 1), 0);

        filter.search = "  RUST ".to_string();
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 2]);

        filter.search.clear();
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 2, 3]);
    }

    #[test]
    fn test_date_filter_only_applies_to_top() {
        let day = date(2024, 3, 10);
        let cutoff_secs = end_of_day_millis(day) / 1000;
        let pages = vec![page(vec![
            story(1, "late", None, Some(cutoff_secs + 3600)),
            story(2, "on the day", None, Some(cutoff_secs - 60)),
            story(3, "undated", None, None),
        ])];

        let top = FeedFilter::new(FeedKind::Top, day, 0);
        assert_eq!(ids(&visible_stories(&pages, &top)), vec![2, 3]);

        let new = FeedFilter::new(FeedKind::New, day, 0);
        assert_eq!(ids(&visible_stories(&pages, &new)), vec![1, 2, 3]);
    }

    #[test]
    fn test_date_cutoff_is_inclusive_at_end_of_day() {
        let day = date(2024, 3, 10);
        // Whole seconds only; 23:59:59 is on the day.
        let last_second = end_of_day_millis(day) / 1000;
        let pages = vec![page(vec![story(1, "edge", None, Some(last_second))])];
        let filter = FeedFilter::new(FeedKind::Top, day, 0);
        assert_eq!(visible_stories(&pages, &filter).len(), 1);
    }

    #[test]
    fn test_extreme_timestamps_are_filtered_not_panicking() {
        let pages = vec![page(vec![
            story(1, "far future", None, Some(i64::MAX)),
            story(2, "far past", None, Some(i64::MIN)),
        ])];
        let mut top = FeedFilter::new(FeedKind::Top, date(2024, 1, 1), 1_700_000_000_000);
        assert_eq!(ids(&visible_stories(&pages, &top)), vec![2]);

        top.range = Some(TimeRange::Year);
        assert!(visible_stories(&pages, &top).is_empty());
    }

    #[test]
    fn test_range_applies_to_every_kind() {
        let now = 1_700_000_000_000;
        let now_secs = now / 1000;
        let pages = vec![page(vec![
            story(1, "hour old", None, Some(now_secs - 3600)),
            story(2, "week old", None, Some(now_secs - 7 * 86_400)),
            story(3, "undated", None, None),
        ])];
        let mut filter = FeedFilter::new(FeedKind::Ask, date(2024, 1, 1), now);

        filter.range = Some(TimeRange::Day);
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 3]);

        filter.range = Some(TimeRange::Month);
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 2, 3]);
    }

    #[test]
    fn test_oldest_sort_is_stable_and_after_filtering() {
        let pages = vec![
            page(vec![
                story(1, "b", None, Some(300)),
                story(2, "a", None, Some(100)),
            ]),
            page(vec![
                story(3, "c", None, None),
                story(4, "d", None, Some(100)),
            ]),
        ];
        let mut filter = FeedFilter::new(FeedKind::Show, date(2024, 1, 1), 0);
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 2, 3, 4]);

        filter.sort = SortOrder::Oldest;
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_sort_ignored_for_ranked_feeds() {
        let pages = vec![page(vec![
            story(1, "b", None, Some(300)),
            story(2, "a", None, Some(100)),
        ])];
        let mut filter = FeedFilter::new(FeedKind::Best, date(2024, 1, 1), 0);
        filter.sort = SortOrder::Oldest;
        assert_eq!(ids(&visible_stories(&pages, &filter)), vec![1, 2]);
    }

    #[test]
    fn test_no_pages_is_empty() {
        let filter = FeedFilter::new(FeedKind::Top, date(2024, 1, 1), 0);
        assert!(visible_stories(&[], &filter).is_empty());
    }
}
