//! One repository per table: stateless structs with associated functions
//! over `&PgPool`.

mod comment_repo;
mod event_repo;
mod follow_repo;
mod like_repo;
mod notification_repo;
mod search_repo;
mod session_repo;
mod user_repo;

pub use comment_repo::CommentRepo;
pub use event_repo::EventRepo;
pub use follow_repo::FollowRepo;
pub use like_repo::{LikeRepo, LikeToggle};
pub use notification_repo::NotificationRepo;
pub use search_repo::SearchRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
