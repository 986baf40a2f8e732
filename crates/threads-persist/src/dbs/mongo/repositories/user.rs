use mongodb::{Client, Collection, bson::doc, bson::oid::ObjectId, bson::Document};
use mongodb::bson::DateTime as BsonDateTime;
use mongodb::options::ReturnDocument;
use futures::TryStreamExt;

use crate::dbs::mongo::models::{parse_object_id, MongoUser};
use crate::error::{PersistError, Result};
use crate::query::{FindOptions, ProfileUpdate, UserFilter, UserKey};

use super::{sort_clause, text_alternatives};

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<MongoUser>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("users");
        Self { collection }
    }

    /// Get user by account id or record id
    pub async fn find_by_key(&self, key: &UserKey) -> Result<Option<MongoUser>> {
        let filter = match key {
            UserKey::Account(id) => doc! { "id": id },
            UserKey::Record(id) => doc! { "_id": parse_object_id(id)? },
        };
        Ok(self.collection.find_one(filter).await?)
    }

    pub async fn find_by_ids(&self, ids: Vec<ObjectId>) -> Result<Vec<MongoUser>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = self.collection
            .find(doc! { "_id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    /// Filtered listing sorted by `createdAt`, then skipped and limited
    pub async fn find(&self, filter: &UserFilter, options: &FindOptions) -> Result<Vec<MongoUser>> {
        let users = self.collection
            .find(filter_document(filter))
            .sort(sort_clause(options))
            .skip(options.skip)
            .limit(options.limit)
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    pub async fn count(&self, filter: &UserFilter) -> Result<u64> {
        Ok(self.collection.count_documents(filter_document(filter)).await?)
    }

    /// Replace the whole document, inserting it when missing
    pub async fn replace(&self, user: &MongoUser) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": user.object_id }, user)
            .upsert(true)
            .await?;
        Ok(())
    }

    /// Update profile fields by account id, creating the user if needed
    pub async fn upsert_profile(&self, update: &ProfileUpdate) -> Result<MongoUser> {
        let filter = doc! { "id": &update.account_id };
        let changes = doc! {
            "$set": {
                "username": &update.username,
                "name": &update.name,
                "bio": update.bio.clone(),
                "image": update.image.clone(),
                "onboarded": true,
            },
            "$setOnInsert": {
                "createdAt": BsonDateTime::now(),
                "threads": [],
                "repost": [],
                "questions": [],
                "repostQuestion": [],
                "communities": [],
                "followers": [],
                "followings": [],
            }
        };

        self.collection
            .find_one_and_update(filter, changes)
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?
            .ok_or_else(|| PersistError::Internal(format!(
                "Upsert for account {} returned no document",
                update.account_id
            )))
    }
}

fn filter_document(filter: &UserFilter) -> Document {
    let mut query = Document::new();
    if let Some(account) = &filter.exclude_account {
        query.insert("id", doc! { "$ne": account });
    }
    if let Some(text) = &filter.text {
        query.insert("$or", text_alternatives(text));
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TextFilter;

    #[test]
    fn test_filter_document_without_search_only_excludes() {
        let filter = UserFilter {
            text: None,
            exclude_account: Some("acct_1".to_string()),
        };
        let query = filter_document(&filter);
        assert_eq!(query, doc! { "id": { "$ne": "acct_1" } });
    }

    #[test]
    fn test_filter_document_with_search_adds_or_clause() {
        let filter = UserFilter {
            text: TextFilter::new("ali"),
            exclude_account: None,
        };
        let query = filter_document(&filter);
        assert!(query.contains_key("$or"));
        assert!(!query.contains_key("id"));
    }
}
