mod client;
mod models;
mod repositories;

pub use client::{MongoSettings, MongoStore};
pub use models::{MongoCommunity, MongoPost, MongoUser};
