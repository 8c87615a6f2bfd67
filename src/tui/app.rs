use chrono::NaiveDate;
use ratatui::widgets::ListState;

use crate::comments::CommentsDialog;
use crate::config::FeedConfig;
use crate::domain::{FeedKind, Story};
use crate::feed::{DateStepper, FeedDisplay, FeedView, PageRequest};

const HN_ITEM_URL: &str = "https://news.ycombinator.com/item?id=";
pub const SHOW_HN_RULES_URL: &str = "https://news.ycombinator.com/showhn.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PicksState {
    Loading,
    Loaded(Vec<Story>),
    Failed(String),
}

pub struct TuiApp {
    pub view: FeedView,
    pub dates: DateStepper,
    pub comments: CommentsDialog,
    /// Show HN rules popup.
    pub rules_open: bool,
    pub picks: PicksState,
    /// Snapshot of `view.display()`, refreshed by [`TuiApp::sync`].
    pub display: FeedDisplay,
    pub story_index: usize,
    pub list_state: ListState,
    /// Stories that fit in the list area; set while rendering.
    pub list_capacity: usize,
    pub input_mode: InputMode,
    pub search_input: String,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl TuiApp {
    pub fn new(kind: FeedKind, today: NaiveDate, now_millis: i64, config: &FeedConfig) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));

        Self {
            view: FeedView::new(kind, today, now_millis, config),
            dates: DateStepper::new(today),
            comments: CommentsDialog::new(config.comment_limit),
            rules_open: false,
            picks: PicksState::Loading,
            display: FeedDisplay::Loading,
            story_index: 0,
            list_state,
            list_capacity: 0,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            should_quit: false,
            status_message: None,
        }
    }

    /// Recompute the display snapshot and keep the selection inside it.
    pub fn sync(&mut self) {
        self.display = self.view.display();
        let len = self.stories().len();
        if self.story_index >= len {
            self.story_index = len.saturating_sub(1);
        }
        self.list_state.select(Some(self.story_index));
    }

    pub fn stories(&self) -> &[Story] {
        match &self.display {
            FeedDisplay::Stories(stories) => stories,
            _ => &[],
        }
    }

    pub fn selected_story(&self) -> Option<&Story> {
        self.stories().get(self.story_index)
    }

    /// Link opened in the browser: the story url, or its HN page for self posts.
    pub fn selected_link(&self) -> Option<String> {
        self.selected_story().map(story_link)
    }

    pub fn move_up(&mut self) {
        if self.story_index > 0 {
            self.story_index -= 1;
            self.list_state.select(Some(self.story_index));
        }
    }

    pub fn move_down(&mut self) {
        let len = self.stories().len();
        if len > 0 && self.story_index < len - 1 {
            self.story_index += 1;
            self.list_state.select(Some(self.story_index));
        }
    }

    pub fn next_page(&mut self) {
        let max_index = self.stories().len().saturating_sub(1);
        let new_index = (self.story_index + self.page_step()).min(max_index);
        if new_index != self.story_index {
            self.story_index = new_index;
            self.list_state.select(Some(self.story_index));
        }
    }

    pub fn prev_page(&mut self) {
        let new_index = self.story_index.saturating_sub(self.page_step());
        if new_index != self.story_index {
            self.story_index = new_index;
            self.list_state.select(Some(self.story_index));
        }
    }

    pub fn reset_selection(&mut self) {
        self.story_index = 0;
        self.list_state = ListState::default();
        self.list_state.select(Some(0));
    }

    /// Scroll sentinel check against what the last render showed.
    ///
    /// With no rows the sentinel sits right under the header, so an empty
    /// filtered list keeps paging. Searching and no-qualifying states belong
    /// to the date lookahead and stay quiet.
    pub fn check_sentinel(&mut self) -> Option<PageRequest> {
        let total = self.stories().len();
        if total == 0 {
            return match self.display {
                FeedDisplay::Empty => self.view.on_scroll(0, 0),
                _ => None,
            };
        }
        let last_visible = (self.list_state.offset() + self.list_capacity.max(1) - 1).min(total - 1);
        self.view.on_scroll(last_visible, total)
    }

    /// Open the rules popup. Only the Show feed has one.
    pub fn open_rules(&mut self) -> bool {
        self.rules_open = self.view.kind() == FeedKind::Show;
        self.rules_open
    }

    pub fn close_rules(&mut self) {
        self.rules_open = false;
    }

    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    fn page_step(&self) -> usize {
        self.list_capacity.max(1)
    }
}

pub fn story_link(story: &Story) -> String {
    story
        .url
        .clone()
        .unwrap_or_else(|| format!("{}{}", HN_ITEM_URL, story.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{FeedPage, PageLoad, PageResponse};
    use serde_json::json;
    use std::sync::Arc;

    fn story(id: u64, url: Option<&str>) -> Story {
        let mut value = json!({"id": id, "title": format!("Story {}", id), "time": 1_700_000_000});
        if let Some(url) = url {
            value["url"] = json!(url);
        }
        Story::from_json(value).unwrap()
    }

    fn app_with_stories(count: u64) -> TuiApp {
        app_with_page(count, count, None)
    }

    /// A `new` feed with `total` ids, of which the first `loaded` are on page one.
    fn app_with_page(total: u64, loaded: u64, next_offset: Option<usize>) -> TuiApp {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut app = TuiApp::new(FeedKind::New, today, 0, &FeedConfig::default());
        let request = app.view.start();
        let ids: Vec<u64> = (1..=total).collect();
        let stories = (1..=loaded).map(|id| story(id, None)).collect();

        app.view.apply(PageResponse {
            generation: request.generation,
            kind: request.kind,
            lookahead: false,
            result: Ok(PageLoad {
                ids: Arc::new(ids),
                page: FeedPage {
                    stories,
                    next_offset,
                },
            }),
        });
        app.sync();
        app
    }

    #[test]
    fn test_navigation_stays_in_bounds() {
        let mut app = app_with_stories(3);
        app.move_up();
        assert_eq!(app.story_index, 0);

        for _ in 0..5 {
            app.move_down();
        }
        assert_eq!(app.story_index, 2);
        assert_eq!(app.selected_story().map(|s| s.id), Some(3));
    }

    #[test]
    fn test_paging_uses_list_capacity() {
        let mut app = app_with_stories(30);
        app.list_capacity = 10;
        app.next_page();
        assert_eq!(app.story_index, 10);
        app.next_page();
        app.next_page();
        assert_eq!(app.story_index, 29);
        app.prev_page();
        assert_eq!(app.story_index, 19);
    }

    #[test]
    fn test_sync_clamps_selection_after_search() {
        let mut app = app_with_stories(12);
        app.story_index = 11;
        app.view.set_search("story 1");
        app.sync();
        // "Story 1", "Story 10", "Story 11", "Story 12"
        assert_eq!(app.stories().len(), 4);
        assert_eq!(app.story_index, 3);
    }

    #[test]
    fn test_self_post_links_to_hn() {
        assert_eq!(story_link(&story(42, None)), "https://news.ycombinator.com/item?id=42");
        assert_eq!(
            story_link(&story(43, Some("https://example.com"))),
            "https://example.com"
        );
    }

    #[test]
    fn test_sentinel_without_next_page_is_quiet() {
        let mut app = app_with_stories(3);
        app.list_capacity = 10;
        assert!(app.check_sentinel().is_none());
    }

    #[test]
    fn test_sentinel_keeps_paging_when_search_hides_everything() {
        let mut app = app_with_page(40, 20, Some(20));
        app.view.set_search("zzz-no-match");
        app.sync();
        app.list_capacity = 10;
        assert_eq!(app.display, FeedDisplay::Empty);

        let request = app.check_sentinel().expect("next page requested");
        assert_eq!(request.offset, 20);
        assert!(app.check_sentinel().is_none(), "request in flight");
    }

    #[test]
    fn test_sentinel_quiet_while_loading() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut app = TuiApp::new(FeedKind::New, today, 0, &FeedConfig::default());
        app.view.start();
        app.sync();
        assert_eq!(app.display, FeedDisplay::Loading);
        assert!(app.check_sentinel().is_none());
    }

    #[test]
    fn test_rules_only_open_on_show() {
        let mut app = app_with_stories(1);
        assert!(!app.open_rules());
        assert!(!app.rules_open);

        app.view.set_kind(FeedKind::Show);
        assert!(app.open_rules());
        app.close_rules();
        assert!(!app.rules_open);
    }
}
