//! Top-level comment viewer for a single story.
//!
//! The dialog only fetches while it is open and has a story. Closing it
//! bumps the generation so a response still in flight cannot repopulate
//! the dialog, or leak into the next story opened.

use tracing::{debug, warn};

use crate::api::HnClient;
use crate::domain::{Comment, Story};

#[derive(Debug, Clone, PartialEq)]
pub enum CommentsState {
    Idle,
    Loading,
    Loaded(Vec<Comment>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentsRequest {
    pub generation: u64,
    pub story_id: u64,
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct CommentsResponse {
    pub generation: u64,
    pub story_id: u64,
    pub result: Result<Vec<Comment>, String>,
}

pub async fn execute(client: &HnClient, request: CommentsRequest) -> CommentsResponse {
    let result = client
        .top_level_comments(request.story_id, request.limit)
        .await
        .map_err(|e| e.to_string());

    CommentsResponse {
        generation: request.generation,
        story_id: request.story_id,
        result,
    }
}

pub struct CommentsDialog {
    open: bool,
    story: Option<Story>,
    generation: u64,
    limit: usize,
    state: CommentsState,
    scroll: u16,
}

impl CommentsDialog {
    pub fn new(limit: usize) -> Self {
        Self {
            open: false,
            story: None,
            generation: 0,
            limit,
            state: CommentsState::Idle,
            scroll: 0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn story(&self) -> Option<&Story> {
        self.story.as_ref()
    }

    pub fn state(&self) -> &CommentsState {
        &self.state
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Open the dialog on `story` and request its comments.
    pub fn open_for(&mut self, story: Story) -> Option<CommentsRequest> {
        self.generation += 1;
        self.open = true;
        self.story = Some(story);
        self.scroll = 0;
        self.activation()
    }

    /// The fetch is active only while the dialog is open with a story.
    pub fn activation(&mut self) -> Option<CommentsRequest> {
        if !self.open {
            return None;
        }
        let story_id = self.story.as_ref()?.id;
        self.state = CommentsState::Loading;
        Some(CommentsRequest {
            generation: self.generation,
            story_id,
            limit: self.limit,
        })
    }

    pub fn close(&mut self) {
        self.open = false;
        self.story = None;
        self.state = CommentsState::Idle;
        self.scroll = 0;
        self.generation += 1;
    }

    pub fn apply(&mut self, response: CommentsResponse) {
        let current = self.story.as_ref().map(|s| s.id);
        if !self.open || response.generation != self.generation || current != Some(response.story_id) {
            debug!("discarding comments for story {}", response.story_id);
            return;
        }

        self.state = match response.result {
            Ok(comments) => CommentsState::Loaded(comments),
            Err(e) => {
                warn!("comments for story {} failed: {}", response.story_id, e);
                CommentsState::Failed(e)
            }
        };
    }
}
