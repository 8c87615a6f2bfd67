pub mod feed;
pub mod story;

pub use feed::{FeedKind, SortOrder, TimeRange};
pub use story::{Comment, Story};
