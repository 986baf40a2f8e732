use mongodb::{Client, Collection, bson::doc, bson::oid::ObjectId, bson::Document};
use futures::TryStreamExt;

use crate::dbs::mongo::models::MongoCommunity;
use crate::error::Result;
use crate::query::{CommunityFilter, FindOptions};

use super::{sort_clause, text_alternatives};

#[derive(Clone)]
pub struct MongoCommunityRepository {
    collection: Collection<MongoCommunity>,
}

impl MongoCommunityRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        let collection = client.database(db_name).collection("communities");
        Self { collection }
    }

    pub async fn find_by_id(&self, id: ObjectId) -> Result<Option<MongoCommunity>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn find_by_ids(&self, ids: Vec<ObjectId>) -> Result<Vec<MongoCommunity>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let communities = self.collection
            .find(doc! { "_id": { "$in": ids } })
            .await?
            .try_collect()
            .await?;
        Ok(communities)
    }

    pub async fn find(
        &self,
        filter: &CommunityFilter,
        options: &FindOptions,
    ) -> Result<Vec<MongoCommunity>> {
        let communities = self.collection
            .find(filter_document(filter))
            .sort(sort_clause(options))
            .skip(options.skip)
            .limit(options.limit)
            .await?
            .try_collect()
            .await?;
        Ok(communities)
    }

    pub async fn count(&self, filter: &CommunityFilter) -> Result<u64> {
        Ok(self.collection.count_documents(filter_document(filter)).await?)
    }

    pub async fn replace(&self, community: &MongoCommunity) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": community.object_id }, community)
            .upsert(true)
            .await?;
        Ok(())
    }
}

fn filter_document(filter: &CommunityFilter) -> Document {
    match &filter.text {
        Some(text) => doc! { "$or": text_alternatives(text) },
        None => Document::new(),
    }
}
