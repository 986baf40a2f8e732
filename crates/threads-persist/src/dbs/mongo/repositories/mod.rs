pub mod community;
pub mod post;
pub mod user;

pub use community::MongoCommunityRepository;
pub use post::MongoPostRepository;
pub use user::MongoUserRepository;

use mongodb::bson::{doc, Document};

use crate::query::{FindOptions, TextFilter};

/// Alternatives for an `$or` over `username`/`name` with a case-insensitive regex
pub(crate) fn text_alternatives(text: &TextFilter) -> Vec<Document> {
    let pattern = text.pattern();
    vec![
        doc! { "username": { "$regex": pattern, "$options": "i" } },
        doc! { "name": { "$regex": pattern, "$options": "i" } },
    ]
}

pub(crate) fn sort_clause(options: &FindOptions) -> Document {
    doc! { "createdAt": options.sort.direction() }
}
