pub mod posts_models;
pub mod publish_service;
pub mod publisher;
pub mod row_scanner;

pub use posts_models::PublishOutcome;
pub use publish_service::PublishService;
pub use publisher::{PlatformError, Publisher, SocialPlatform};
