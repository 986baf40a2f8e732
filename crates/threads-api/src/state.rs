use std::sync::Arc;

use threads_feed::{FeedAggregator, ProfileService, RelationshipMutator, SearchService};
use threads_persist::DocumentStore;

use crate::config::Config;

/// Shared application state passed to all handlers
///
/// Every service shares the one store handle opened at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn DocumentStore>,
    pub feeds: Arc<FeedAggregator>,
    pub relationships: Arc<RelationshipMutator>,
    pub search: Arc<SearchService>,
    pub profiles: Arc<ProfileService>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let search = SearchService::new(store.clone(), config.search.clone());

        Self {
            feeds: Arc::new(FeedAggregator::new(store.clone())),
            relationships: Arc::new(RelationshipMutator::new(store.clone())),
            search: Arc::new(search),
            profiles: Arc::new(ProfileService::new(store.clone())),
            config: Arc::new(config),
            store,
        }
    }
}
