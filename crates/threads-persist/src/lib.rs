pub mod models;
pub mod query;
pub mod trait_client;
pub mod populate;
pub mod dbs;
pub mod error;

pub use models::{Community, Post, PostKind, User};
pub use query::{CommunityFilter, FindOptions, ProfileUpdate, SortOrder, TextFilter, UserFilter, UserKey};
pub use trait_client::DocumentStore;
pub use populate::{AuthorRef, CommunityRef, PopulatedPost, PopulatedReply, Populator};
pub use dbs::MemoryStore;
#[cfg(feature = "mongodb")]
pub use dbs::{MongoSettings, MongoStore};
pub use error::{PersistError, Result};
