use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{PersistError, Result};
use crate::models::{Community, Post, PostKind, User};

/// MongoDB-specific User model (uses ObjectId references)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoUser {
    #[serde(rename = "_id")]
    pub object_id: ObjectId,
    /// External auth id
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub onboarded: bool,
    #[serde(default = "BsonDateTime::now")]
    pub created_at: BsonDateTime,
    #[serde(default)]
    pub threads: Vec<ObjectId>,
    #[serde(default)]
    pub repost: Vec<ObjectId>,
    #[serde(default)]
    pub questions: Vec<ObjectId>,
    #[serde(default)]
    pub repost_question: Vec<ObjectId>,
    #[serde(default)]
    pub communities: Vec<ObjectId>,
    #[serde(default)]
    pub followers: Vec<ObjectId>,
    #[serde(default)]
    pub followings: Vec<ObjectId>,
}

/// MongoDB-specific Thread/Question model. The collection decides the kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoPost {
    #[serde(rename = "_id")]
    pub object_id: ObjectId,
    pub text: String,
    pub author: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community: Option<ObjectId>,
    #[serde(default)]
    pub children: Vec<ObjectId>,
    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub likes: Vec<ObjectId>,
    #[serde(default)]
    pub repost: Vec<ObjectId>,
    #[serde(default = "BsonDateTime::now")]
    pub created_at: BsonDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MongoCommunity {
    #[serde(rename = "_id")]
    pub object_id: ObjectId,
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default = "BsonDateTime::now")]
    pub created_at: BsonDateTime,
    #[serde(default)]
    pub members: Vec<ObjectId>,
    #[serde(default)]
    pub threads: Vec<ObjectId>,
    #[serde(default)]
    pub questions: Vec<ObjectId>,
}

pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|e| PersistError::InvalidObjectId(format!("{}: {}", id, e)))
}

pub(crate) fn parse_object_ids(ids: &[String]) -> Result<Vec<ObjectId>> {
    ids.iter().map(|id| parse_object_id(id)).collect()
}

fn to_hex(ids: Vec<ObjectId>) -> Vec<String> {
    ids.into_iter().map(|id| id.to_hex()).collect()
}

// Conversions between database-agnostic and MongoDB-specific models

impl TryFrom<&User> for MongoUser {
    type Error = PersistError;

    fn try_from(user: &User) -> Result<Self> {
        Ok(Self {
            object_id: parse_object_id(&user.id)?,
            id: user.account_id.clone(),
            name: user.name.clone(),
            username: user.username.clone(),
            bio: user.bio.clone(),
            image: user.image.clone(),
            onboarded: user.onboarded,
            created_at: BsonDateTime::from_chrono(user.created_at),
            threads: parse_object_ids(&user.threads)?,
            repost: parse_object_ids(&user.repost)?,
            questions: parse_object_ids(&user.questions)?,
            repost_question: parse_object_ids(&user.repost_question)?,
            communities: parse_object_ids(&user.communities)?,
            followers: parse_object_ids(&user.followers)?,
            followings: parse_object_ids(&user.followings)?,
        })
    }
}

impl From<MongoUser> for User {
    fn from(user: MongoUser) -> Self {
        Self {
            id: user.object_id.to_hex(),
            account_id: user.id,
            name: user.name,
            username: user.username,
            bio: user.bio,
            image: user.image,
            onboarded: user.onboarded,
            created_at: user.created_at.to_chrono(),
            threads: to_hex(user.threads),
            repost: to_hex(user.repost),
            questions: to_hex(user.questions),
            repost_question: to_hex(user.repost_question),
            communities: to_hex(user.communities),
            followers: to_hex(user.followers),
            followings: to_hex(user.followings),
        }
    }
}

impl TryFrom<&Post> for MongoPost {
    type Error = PersistError;

    fn try_from(post: &Post) -> Result<Self> {
        Ok(Self {
            object_id: parse_object_id(&post.id)?,
            text: post.text.clone(),
            author: parse_object_id(&post.author)?,
            parent_id: post.parent_id.clone(),
            community: post.community.as_deref().map(parse_object_id).transpose()?,
            children: parse_object_ids(&post.children)?,
            photos: post.photos.clone(),
            likes: parse_object_ids(&post.likes)?,
            repost: parse_object_ids(&post.repost)?,
            created_at: BsonDateTime::from_chrono(post.created_at),
        })
    }
}

impl MongoPost {
    pub fn into_post(self, kind: PostKind) -> Post {
        Post {
            id: self.object_id.to_hex(),
            kind,
            text: self.text,
            author: self.author.to_hex(),
            parent_id: self.parent_id,
            community: self.community.map(|id| id.to_hex()),
            children: to_hex(self.children),
            photos: self.photos,
            likes: to_hex(self.likes),
            repost: to_hex(self.repost),
            created_at: self.created_at.to_chrono(),
        }
    }
}

impl TryFrom<&Community> for MongoCommunity {
    type Error = PersistError;

    fn try_from(community: &Community) -> Result<Self> {
        Ok(Self {
            object_id: parse_object_id(&community.id)?,
            id: community.account_id.clone(),
            name: community.name.clone(),
            username: community.username.clone(),
            description: community.description.clone(),
            image: community.image.clone(),
            created_at: BsonDateTime::from_chrono(community.created_at),
            members: parse_object_ids(&community.members)?,
            threads: parse_object_ids(&community.threads)?,
            questions: parse_object_ids(&community.questions)?,
        })
    }
}

impl From<MongoCommunity> for Community {
    fn from(community: MongoCommunity) -> Self {
        Self {
            id: community.object_id.to_hex(),
            account_id: community.id,
            name: community.name,
            username: community.username,
            description: community.description,
            image: community.image,
            created_at: community.created_at.to_chrono(),
            members: to_hex(community.members),
            threads: to_hex(community.threads),
            questions: to_hex(community.questions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_round_trips_through_mongo_model() {
        let follower = ObjectId::new().to_hex();
        let mut user = User::new(ObjectId::new().to_hex(), "acct_1", "Alice", "alice");
        user.followers.push(follower.clone());

        let mongo = MongoUser::try_from(&user).unwrap();
        assert_eq!(mongo.id, "acct_1");

        let back: User = mongo.into();
        assert_eq!(back.id, user.id);
        assert_eq!(back.followers, vec![follower]);
        assert_eq!(back.created_at.timestamp_millis(), user.created_at.timestamp_millis());
    }

    #[test]
    fn test_invalid_reference_is_rejected() {
        let mut user = User::new(ObjectId::new().to_hex(), "acct_1", "Alice", "alice");
        user.followings.push("not-an-object-id".to_string());

        let err = MongoUser::try_from(&user).unwrap_err();
        assert!(matches!(err, PersistError::InvalidObjectId(_)));
    }
}
