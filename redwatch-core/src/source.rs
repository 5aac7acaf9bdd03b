use crate::error::StreamError;
use crate::types::PostRecord;
use async_trait::async_trait;
use futures::Stream;

/// A live feed of newly created posts.
///
/// The returned stream is unbounded and lazily advancing: it never
/// terminates under normal operation, and it is not restartable. When it
/// ends or yields an error, the subscription is terminal for the run.
#[async_trait]
pub trait FeedSource {
    type Stream: Stream<Item = Result<PostRecord, StreamError>> + Unpin + Send;

    /// Opens a single subscription covering every source in `sources`.
    /// Items that existed before the subscription started are not delivered.
    async fn subscribe(&self, sources: &[String]) -> Result<Self::Stream, StreamError>;
}
