mod community;
mod post;
mod user;

// Export database-agnostic models
pub use community::Community;
pub use post::{Post, PostKind};
pub use user::User;
