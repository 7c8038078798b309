pub mod feed;
pub mod item;
pub mod scope;

pub use feed::FeedConfig;
pub use item::Item;
pub use scope::{build_search_text, MatchMode, MatchPolicy, MatchScope};
