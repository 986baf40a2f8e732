use std::time::Duration;

use async_trait::async_trait;
use mongodb::{bson::doc, options::ClientOptions, Client, Database};

use crate::dbs::mongo::models::{parse_object_id, parse_object_ids, MongoCommunity, MongoPost, MongoUser};
use crate::dbs::mongo::repositories::{MongoCommunityRepository, MongoPostRepository, MongoUserRepository};
use crate::error::{PersistError, Result};
use crate::models::{Community, Post, PostKind, User};
use crate::query::{CommunityFilter, FindOptions, ProfileUpdate, UserFilter, UserKey};
use crate::trait_client::DocumentStore;

/// Connection tuning passed to the driver
#[derive(Debug, Clone, Default)]
pub struct MongoSettings {
    pub max_pool_size: Option<u32>,
    pub server_selection_timeout: Option<Duration>,
}

pub struct MongoStore {
    client: Client,
    database: Database,
    users: MongoUserRepository,
    threads: MongoPostRepository,
    questions: MongoPostRepository,
    communities: MongoCommunityRepository,
}

impl MongoStore {
    /// Connect to MongoDB and create the store
    pub async fn connect(mongodb_uri: &str, database: &str, settings: MongoSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        options.max_pool_size = settings.max_pool_size;
        options.server_selection_timeout = settings.server_selection_timeout;

        let client = Client::with_options(options)
            .map_err(|e| PersistError::Connection(e.to_string()))?;

        tracing::info!(database = %database, "MongoDB client created");

        Ok(Self {
            users: MongoUserRepository::new(&client, database),
            threads: MongoPostRepository::new(&client, database, PostKind::Thread),
            questions: MongoPostRepository::new(&client, database, PostKind::Question),
            communities: MongoCommunityRepository::new(&client, database),
            database: client.database(database),
            client,
        })
    }

    fn posts(&self, kind: PostKind) -> &MongoPostRepository {
        match kind {
            PostKind::Thread => &self.threads,
            PostKind::Question => &self.questions,
        }
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_user(&self, key: &UserKey) -> Result<Option<User>> {
        let user = self.users.find_by_key(key).await?;
        Ok(user.map(|u| u.into()))
    }

    async fn find_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        let users = self.users.find_by_ids(parse_object_ids(ids)?).await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    async fn find_users(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<User>> {
        let users = self.users.find(filter, options).await?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    async fn count_users(&self, filter: &UserFilter) -> Result<u64> {
        self.users.count(filter).await
    }

    async fn save_user(&self, user: &User) -> Result<()> {
        let mongo_user = MongoUser::try_from(user)?;
        self.users.replace(&mongo_user).await
    }

    async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let user = self.users.upsert_profile(update).await?;
        Ok(user.into())
    }

    async fn find_posts_by_ids(&self, kind: PostKind, ids: &[String]) -> Result<Vec<Post>> {
        let posts = self.posts(kind).find_by_ids(parse_object_ids(ids)?).await?;
        Ok(posts.into_iter().map(|p| p.into_post(kind)).collect())
    }

    async fn save_post(&self, post: &Post) -> Result<()> {
        let mongo_post = MongoPost::try_from(post)?;
        self.posts(post.kind).replace(&mongo_post).await
    }

    async fn find_community(&self, id: &str) -> Result<Option<Community>> {
        let community = self.communities.find_by_id(parse_object_id(id)?).await?;
        Ok(community.map(|c| c.into()))
    }

    async fn find_communities_by_ids(&self, ids: &[String]) -> Result<Vec<Community>> {
        let communities = self.communities.find_by_ids(parse_object_ids(ids)?).await?;
        Ok(communities.into_iter().map(|c| c.into()).collect())
    }

    async fn find_communities(
        &self,
        filter: &CommunityFilter,
        options: &FindOptions,
    ) -> Result<Vec<Community>> {
        let communities = self.communities.find(filter, options).await?;
        Ok(communities.into_iter().map(|c| c.into()).collect())
    }

    async fn count_communities(&self, filter: &CommunityFilter) -> Result<u64> {
        self.communities.count(filter).await
    }

    async fn save_community(&self, community: &Community) -> Result<()> {
        let mongo_community = MongoCommunity::try_from(community)?;
        self.communities.replace(&mongo_community).await
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client shut down");
        Ok(())
    }
}
