pub mod api;
pub mod stream;

pub use api::{RedditApi, RedditCredentials};
pub use stream::{RedditFeed, SubmissionStream};
