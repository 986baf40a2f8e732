//! Reference resolution for feed documents.
//!
//! Posts hold their author, community and replies as record ids. The
//! [`Populator`] swaps those ids for the referenced documents with a fixed
//! shape: author and community on every post, and one level of replies, each
//! with its own author. Replies of replies are never followed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::error::Result;
use crate::models::{Community, Post, PostKind, User};
use crate::trait_client::DocumentStore;

/// Author fields selected for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRef {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            account_id: user.account_id.clone(),
            name: user.name.clone(),
            image: user.image.clone(),
        }
    }
}

/// Community fields selected for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunityRef {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub image: Option<String>,
}

impl From<&Community> for CommunityRef {
    fn from(community: &Community) -> Self {
        Self {
            id: community.id.clone(),
            account_id: community.account_id.clone(),
            name: community.name.clone(),
            image: community.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedReply {
    pub post: Post,
    pub author: Option<AuthorRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedPost {
    pub post: Post,
    pub author: Option<AuthorRef>,
    pub community: Option<CommunityRef>,
    pub children: Vec<PopulatedReply>,
}

pub struct Populator<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Populator<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Resolve `ids` into populated posts.
    ///
    /// The result follows the order of `ids`; ids that no longer resolve are
    /// dropped. Authors and communities that do not resolve become `None`.
    pub async fn posts(&self, kind: PostKind, ids: &[String]) -> Result<Vec<PopulatedPost>> {
        let posts = self.ordered_posts(kind, ids).await?;
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let child_ids: Vec<String> = posts
            .iter()
            .flat_map(|p| p.children.iter().cloned())
            .collect();
        let children = index_by_id(
            self.store.find_posts_by_ids(kind, &unique(&child_ids)).await?,
            |p| &p.id,
        );

        let author_ids: Vec<String> = posts
            .iter()
            .map(|p| p.author.clone())
            .chain(children.values().map(|c| c.author.clone()))
            .collect();
        let authors = index_by_id(
            self.store.find_users_by_ids(&unique(&author_ids)).await?,
            |u| &u.id,
        );

        let community_ids: Vec<String> = posts
            .iter()
            .filter_map(|p| p.community.clone())
            .collect();
        let communities = index_by_id(
            self.store.find_communities_by_ids(&unique(&community_ids)).await?,
            |c| &c.id,
        );

        tracing::debug!(
            kind = ?kind,
            posts = posts.len(),
            children = children.len(),
            authors = authors.len(),
            communities = communities.len(),
            "Populated posts"
        );

        let populated = posts
            .into_iter()
            .map(|post| {
                let replies = post
                    .children
                    .iter()
                    .filter_map(|id| children.get(id))
                    .map(|child| PopulatedReply {
                        author: authors.get(&child.author).map(AuthorRef::from),
                        post: child.clone(),
                    })
                    .collect();

                PopulatedPost {
                    author: authors.get(&post.author).map(AuthorRef::from),
                    community: post
                        .community
                        .as_ref()
                        .and_then(|id| communities.get(id))
                        .map(CommunityRef::from),
                    children: replies,
                    post,
                }
            })
            .collect();

        Ok(populated)
    }

    /// Users for `ids`, in the order of `ids`
    pub async fn users(&self, ids: &[String]) -> Result<Vec<User>> {
        let found = self.store.find_users_by_ids(&unique(ids)).await?;
        Ok(in_order(ids, index_by_id(found, |u| &u.id)))
    }

    /// Communities for `ids`, in the order of `ids`
    pub async fn communities(&self, ids: &[String]) -> Result<Vec<Community>> {
        let found = self.store.find_communities_by_ids(&unique(ids)).await?;
        Ok(in_order(ids, index_by_id(found, |c| &c.id)))
    }

    async fn ordered_posts(&self, kind: PostKind, ids: &[String]) -> Result<Vec<Post>> {
        let found = self.store.find_posts_by_ids(kind, &unique(ids)).await?;
        Ok(in_order(ids, index_by_id(found, |p| &p.id)))
    }
}

fn unique(ids: &[String]) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(*id))
        .cloned()
        .collect()
}

fn index_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> &String) -> HashMap<String, T> {
    items.into_iter().map(|item| (id(&item).clone(), item)).collect()
}

fn in_order<T: Clone>(ids: &[String], index: HashMap<String, T>) -> Vec<T> {
    ids.iter().filter_map(|id| index.get(id).cloned()).collect()
}
