use mongodb::{Client, Collection, bson::doc, bson::oid::ObjectId};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoPost;
use crate::error::Result;
use crate::models::PostKind;

/// One repository per post collection (`threads` or `questions`)
#[derive(Clone)]
pub struct MongoPostRepository {
    collection: Collection<MongoPost>,
}

impl MongoPostRepository {
    pub fn new(client: &Client, db_name: &str, kind: PostKind) -> Self {
        let collection = client.database(db_name).collection(kind.collection());
        Self { collection }
    }

    pub async fn find_by_ids(&self, ids: Vec<ObjectId>) -> Result<Vec<MongoPost>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let posts = self.collection
            .find(doc! { "_id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(posts)
    }

    pub async fn replace(&self, post: &MongoPost) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": post.object_id }, post)
            .upsert(true)
            .await?;
        Ok(())
    }
}
