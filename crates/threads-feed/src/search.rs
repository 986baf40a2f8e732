use std::sync::Arc;

use serde::{Deserialize, Serialize};
use threads_persist::{
    Community, CommunityFilter, DocumentStore, FindOptions, SortOrder, TextFilter, User, UserFilter,
};

use crate::error::{FeedError, Result, StoreContext};
use crate::views::Page;

/// What to do with a page number or page size below 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PagePolicy {
    /// Page numbers below 1 become page 1, sizes below 1 become the default size
    #[default]
    Clamp,
    /// Out-of-range values are a validation error
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: i64,
    #[serde(default)]
    pub page_policy: PagePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
            page_policy: PagePolicy::default(),
        }
    }
}

fn default_page_size() -> i64 {
    20
}

fn default_max_page_size() -> i64 {
    100
}

/// Search string, page and sort direction for a listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub search_string: String,
    pub page_number: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort_by: SortOrder,
}

impl SearchQuery {
    pub fn new(search_string: impl Into<String>) -> Self {
        Self {
            search_string: search_string.into(),
            ..Self::default()
        }
    }

    pub fn page(mut self, page_number: i64) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn page_size(mut self, page_size: i64) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn sort_by(mut self, sort_by: SortOrder) -> Self {
        self.sort_by = sort_by;
        self
    }
}

/// Paginated, case-insensitive search over users and communities
pub struct SearchService {
    store: Arc<dyn DocumentStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn DocumentStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Users whose username or name contains the search string
    pub async fn search_users(&self, query: &SearchQuery) -> Result<Page<User>> {
        let filter = UserFilter {
            text: TextFilter::new(&query.search_string),
            exclude_account: None,
        };
        self.users_page(&filter, query, "Failed to search users").await
    }

    /// Like [`SearchService::search_users`], leaving out the current account
    pub async fn fetch_users(&self, current_account_id: &str, query: &SearchQuery) -> Result<Page<User>> {
        let filter = UserFilter {
            text: TextFilter::new(&query.search_string),
            exclude_account: Some(current_account_id.to_string()),
        };
        self.users_page(&filter, query, "Failed to fetch users").await
    }

    /// Communities whose username or name contains the search string
    pub async fn search_communities(&self, query: &SearchQuery) -> Result<Page<Community>> {
        const CONTEXT: &str = "Failed to search communities";

        let options = self.find_options(query)?;
        let filter = CommunityFilter {
            text: TextFilter::new(&query.search_string),
        };

        let total = self.store.count_communities(&filter).await.store_context(CONTEXT)?;
        let items = self.store
            .find_communities(&filter, &options)
            .await
            .store_context(CONTEXT)?;

        Ok(page_of(items, total, &options))
    }

    async fn users_page(&self, filter: &UserFilter, query: &SearchQuery, context: &str) -> Result<Page<User>> {
        let options = self.find_options(query)?;

        let total = self.store.count_users(filter).await.store_context(context)?;
        let items = self.store.find_users(filter, &options).await.store_context(context)?;

        tracing::debug!(
            search = %query.search_string,
            skip = options.skip,
            limit = options.limit,
            total,
            returned = items.len(),
            "User listing"
        );

        Ok(page_of(items, total, &options))
    }

    /// skip = (page - 1) * size, limit = size
    fn find_options(&self, query: &SearchQuery) -> Result<FindOptions> {
        let page_number = query.page_number.unwrap_or(1);
        let page_size = query.page_size.unwrap_or(self.config.default_page_size);

        let (page_number, page_size) = match self.config.page_policy {
            PagePolicy::Clamp => {
                let size = if page_size < 1 { self.config.default_page_size } else { page_size };
                (page_number.max(1), size)
            }
            PagePolicy::Reject => {
                if page_number < 1 {
                    return Err(FeedError::Validation(format!(
                        "page number must be at least 1, got {}",
                        page_number
                    )));
                }
                if page_size < 1 {
                    return Err(FeedError::Validation(format!(
                        "page size must be at least 1, got {}",
                        page_size
                    )));
                }
                (page_number, page_size)
            }
        };
        let page_size = page_size.min(self.config.max_page_size).max(1);

        let skip = ((page_number - 1) as u64).saturating_mul(page_size as u64);
        Ok(FindOptions {
            sort: query.sort_by,
            skip,
            limit: page_size,
        })
    }
}

fn page_of<T>(items: Vec<T>, total: u64, options: &FindOptions) -> Page<T> {
    let has_more = total > options.skip.saturating_add(items.len() as u64);
    Page { items, has_more }
}
