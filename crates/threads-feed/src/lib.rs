//! Feed views, follow graph mutation and paginated search on top of a
//! [`threads_persist::DocumentStore`].
//!
//! Every service takes the store handle at construction; none of them hold
//! state of their own between calls.

pub mod aggregator;
pub mod error;
pub mod feed;
pub mod profile;
pub mod relationships;
pub mod search;
pub mod views;

pub use aggregator::FeedAggregator;
pub use error::{FeedError, Result};
pub use feed::{FeedResult, FeedType};
pub use profile::{ProfileService, UserProfile};
pub use relationships::{ReconcileReport, RelationshipMutator};
pub use search::{PagePolicy, SearchConfig, SearchQuery, SearchService};
pub use views::{MemberView, Page, PostView, ProfileUser, ReplyView};
