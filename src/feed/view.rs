//! Per-feed view state: loaded pages, filters, and the request policy.
//!
//! `FeedView` never performs I/O. Every operation that needs data returns a
//! [`PageRequest`]; the caller runs it (see [`crate::feed::execute`]) and
//! hands the [`PageResponse`] back to [`FeedView::apply`]. Responses carrying
//! an old generation are ignored, which is how a kind switch or refresh
//! cancels work already in flight.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::domain::{FeedKind, SortOrder, Story, TimeRange};
use crate::feed::filter::{visible_stories, FeedFilter};
use crate::feed::{FeedPage, PageRequest, PageResponse};

/// What the feed area should show.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedDisplay {
    Loading,
    Failed(String),
    /// Scanning further pages for stories on `date`.
    Searching { date: NaiveDate, pages_scanned: usize },
    /// The lookahead cap was reached without a story on `date`.
    NoQualifyingYet { date: NaiveDate },
    Empty,
    Stories(Vec<Story>),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Lookahead {
    pages_fetched: usize,
    exhausted: bool,
}

pub struct FeedView {
    filter: FeedFilter,
    generation: u64,
    page_size: usize,
    max_lookahead_pages: usize,
    sentinel_margin_rows: usize,
    ids: Option<Arc<Vec<u64>>>,
    pages: Vec<FeedPage>,
    next_offset: Option<usize>,
    in_flight: bool,
    error: Option<String>,
    lookahead: Lookahead,
}

impl FeedView {
    pub fn new(kind: FeedKind, selected_date: NaiveDate, now_millis: i64, config: &FeedConfig) -> Self {
        Self {
            filter: FeedFilter::new(kind, selected_date, now_millis),
            generation: 0,
            page_size: config.page_size.max(1),
            max_lookahead_pages: config.max_lookahead_pages,
            sentinel_margin_rows: config.sentinel_margin_rows,
            ids: None,
            pages: Vec::new(),
            next_offset: None,
            in_flight: false,
            error: None,
            lookahead: Lookahead::default(),
        }
    }

    pub fn kind(&self) -> FeedKind {
        self.filter.kind
    }

    pub fn filter(&self) -> &FeedFilter {
        &self.filter
    }

    pub fn pages(&self) -> &[FeedPage] {
        &self.pages
    }

    pub fn has_next_page(&self) -> bool {
        self.next_offset.is_some()
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight
    }

    /// Error of the most recent request, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn lookahead_pages(&self) -> usize {
        self.lookahead.pages_fetched
    }

    /// Drop everything loaded and request the first page.
    pub fn start(&mut self) -> PageRequest {
        self.generation += 1;
        self.ids = None;
        self.pages.clear();
        self.next_offset = None;
        self.in_flight = false;
        self.error = None;
        self.lookahead = Lookahead::default();
        self.request(0, false)
    }

    /// Switch feeds. Responses for the previous kind are discarded on arrival.
    pub fn set_kind(&mut self, kind: FeedKind) -> Option<PageRequest> {
        if kind == self.filter.kind {
            return None;
        }
        info!("switching feed {} -> {}", self.filter.kind, kind);
        self.filter.kind = kind;
        Some(self.start())
    }

    /// Change the calendar date. May start (or restart) the lookahead.
    pub fn set_date(&mut self, date: NaiveDate) -> Option<PageRequest> {
        if date == self.filter.selected_date {
            return None;
        }
        self.filter.selected_date = date;
        self.lookahead = Lookahead::default();
        self.decide_lookahead()
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_range(&mut self, range: Option<TimeRange>) {
        self.filter.range = range;
    }

    pub fn cycle_range(&mut self) -> Option<TimeRange> {
        self.filter.range = TimeRange::cycle(self.filter.range);
        self.filter.range
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filter.sort = sort;
    }

    /// Toggle sort order on feeds that support it. Returns whether it changed.
    pub fn toggle_sort(&mut self) -> bool {
        if !self.filter.kind.supports_sort() {
            return false;
        }
        self.filter.sort = self.filter.sort.toggle();
        true
    }

    /// Reference time for the range filter.
    pub fn set_now(&mut self, now_millis: i64) {
        self.filter.now_millis = now_millis;
    }

    /// Fold a finished request into the view and decide what to fetch next.
    pub fn apply(&mut self, response: PageResponse) -> Option<PageRequest> {
        if response.generation != self.generation || response.kind != self.filter.kind {
            debug!(
                "discarding {} page from generation {} (current {})",
                response.kind, response.generation, self.generation
            );
            return None;
        }
        self.in_flight = false;

        match response.result {
            Ok(load) => {
                debug!(
                    "{} page {} applied: {} stories",
                    self.filter.kind,
                    self.pages.len() + 1,
                    load.page.stories.len()
                );
                self.ids = Some(load.ids);
                self.next_offset = load.page.next_offset;
                self.pages.push(load.page);
                self.decide_lookahead()
            }
            Err(e) => {
                warn!("{} page request failed: {}", self.filter.kind, e);
                if response.lookahead {
                    self.lookahead.exhausted = true;
                }
                self.error = Some(e);
                None
            }
        }
    }

    /// Scroll sentinel: request the next page once the last visible row is
    /// within the configured margin of the end of the list.
    ///
    /// After a failed request the sentinel stays quiet; [`FeedView::load_more`]
    /// or a refresh retries.
    pub fn on_scroll(&mut self, last_visible_row: usize, total_rows: usize) -> Option<PageRequest> {
        if self.error.is_some() {
            return None;
        }
        if last_visible_row.saturating_add(self.sentinel_margin_rows) < total_rows {
            return None;
        }
        self.load_more()
    }

    /// Request the next page if one exists and nothing is in flight.
    pub fn load_more(&mut self) -> Option<PageRequest> {
        if self.pages.is_empty() || self.in_flight {
            return None;
        }
        let offset = self.next_offset?;
        Some(self.request(offset, false))
    }

    pub fn visible(&self) -> Vec<Story> {
        visible_stories(&self.pages, &self.filter)
    }

    pub fn display(&self) -> FeedDisplay {
        if self.pages.is_empty() {
            return match &self.error {
                Some(e) => FeedDisplay::Failed(e.clone()),
                None => FeedDisplay::Loading,
            };
        }

        let visible = self.visible();
        if !visible.is_empty() {
            return FeedDisplay::Stories(visible);
        }

        if self.filter.kind.uses_date_filter() && !self.any_story_on_date() {
            let date = self.filter.selected_date;
            if self.lookahead.exhausted && self.error.is_none() {
                return FeedDisplay::NoQualifyingYet { date };
            }
            if self.error.is_none() && (self.in_flight || self.next_offset.is_some()) {
                return FeedDisplay::Searching {
                    date,
                    pages_scanned: self.pages.len(),
                };
            }
        }

        match &self.error {
            Some(e) => FeedDisplay::Failed(e.clone()),
            None => FeedDisplay::Empty,
        }
    }

    fn any_story_on_date(&self) -> bool {
        self.pages
            .iter()
            .flat_map(|page| page.stories.iter())
            .any(|story| self.filter.passes_date(story))
    }

    fn lookahead_eligible(&self) -> bool {
        self.filter.kind.uses_date_filter()
            && !self.pages.is_empty()
            && self.next_offset.is_some()
            && !self.in_flight
            && !self.any_story_on_date()
    }

    fn decide_lookahead(&mut self) -> Option<PageRequest> {
        if !self.lookahead_eligible() {
            return None;
        }
        if self.lookahead.pages_fetched >= self.max_lookahead_pages {
            if !self.lookahead.exhausted {
                info!(
                    "no {} stories on {} after {} extra pages",
                    self.filter.kind, self.filter.selected_date, self.lookahead.pages_fetched
                );
            }
            self.lookahead.exhausted = true;
            return None;
        }

        let offset = self.next_offset?;
        self.lookahead.pages_fetched += 1;
        debug!(
            "lookahead page {} of {} at offset {}",
            self.lookahead.pages_fetched, self.max_lookahead_pages, offset
        );
        Some(self.request(offset, true))
    }

    fn request(&mut self, offset: usize, lookahead: bool) -> PageRequest {
        self.in_flight = true;
        self.error = None;
        PageRequest {
            generation: self.generation,
            kind: self.filter.kind,
            offset,
            page_size: self.page_size,
            ids: self.ids.clone(),
            lookahead,
        }
    }
}
