use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use crate::app::Result;
use crate::comments::CommentsResponse;
use crate::domain::{FeedKind, Story};
use crate::feed::PageResponse;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

/// Results posted back by background request tasks.
pub enum TaskResult {
    Page(PageResponse),
    Comments(CommentsResponse),
    Picks(std::result::Result<Vec<Story>, String>),
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(AppEvent::Key(key));
                }
            }
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    NextFeed,
    PrevFeed,
    SelectFeed(FeedKind),
    OpenComments,
    CloseDialog,
    OpenInBrowser,
    Search,
    PrevDay,
    NextDay,
    Today,
    CycleRange,
    ToggleSort,
    Refresh,
    ShowRules,
    None,
}
