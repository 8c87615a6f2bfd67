//! Paginated feeds: fetching pages, filtering them, and the view state that
//! decides when to fetch more.

pub mod dates;
pub mod filter;
pub mod pager;
pub mod view;

pub use dates::DateStepper;
pub use filter::{visible_stories, FeedFilter};
pub use pager::{execute, load_page, FeedPage, PageLoad, PageRequest, PageResponse};
pub use view::{FeedDisplay, FeedView};
