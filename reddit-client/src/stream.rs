use crate::api::{join_subreddits, RedditApi, RedditCredentials};
use async_trait::async_trait;
use futures::Stream;
use redwatch_core::{FeedSource, PostRecord, StreamError};
use std::collections::{HashSet, VecDeque};
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Cadence of `/new` listing fetches behind the live stream.
const POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Listing page size; covers one polling gap on active subreddits.
const FETCH_LIMIT: u32 = 100;
/// Consecutive transient failures tolerated before the subscription is
/// declared dead.
const MAX_CONSECUTIVE_FAILURES: u32 = 5;
/// Post ids remembered for re-delivery suppression.
const SEEN_WINDOW: usize = 300;

/// Remembers recently observed post ids, oldest evicted first.
#[derive(Debug, Default)]
struct SeenWindow {
    ids: HashSet<String>,
    order: VecDeque<String>,
}

impl SeenWindow {
    /// Records `id`; returns true when it was not seen before.
    fn insert(&mut self, id: &str) -> bool {
        if !self.ids.insert(id.to_string()) {
            return false;
        }
        self.order.push_back(id.to_string());
        if self.order.len() > SEEN_WINDOW {
            if let Some(evicted) = self.order.pop_front() {
                self.ids.remove(&evicted);
            }
        }
        true
    }
}

/// Unbounded, lazily advancing sequence of new posts. Ends only when the
/// subscription dies; an ended stream is terminal for the run.
#[derive(Debug)]
pub struct SubmissionStream {
    rx: mpsc::Receiver<Result<PostRecord, StreamError>>,
}

impl SubmissionStream {
    pub fn new(rx: mpsc::Receiver<Result<PostRecord, StreamError>>) -> Self {
        Self { rx }
    }
}

impl Stream for SubmissionStream {
    type Item = Result<PostRecord, StreamError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

/// Feed-source collaborator: owns authentication and polling against the
/// Reddit API and hands the monitor loop a live stream of new posts.
#[derive(Debug, Clone)]
pub struct RedditFeed {
    credentials: RedditCredentials,
    poll_interval: Duration,
}

impl RedditFeed {
    pub fn new(credentials: RedditCredentials) -> Self {
        Self {
            credentials,
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(credentials: RedditCredentials, poll_interval: Duration) -> Self {
        Self {
            credentials,
            poll_interval,
        }
    }
}

#[async_trait]
impl FeedSource for RedditFeed {
    type Stream = SubmissionStream;

    async fn subscribe(&self, sources: &[String]) -> Result<SubmissionStream, StreamError> {
        let target = join_subreddits(sources);
        let mut api = RedditApi::new(self.credentials.clone())?;

        // Seed the seen window from the current listing so nothing that
        // predates the subscription is ever emitted.
        let mut seen = SeenWindow::default();
        let backlog = api.fetch_new(&target, FETCH_LIMIT).await?;
        for post in &backlog {
            seen.insert(&post.id);
        }
        info!(
            "Subscribed to r/{} ({} existing posts skipped)",
            target,
            backlog.len()
        );

        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(poll_task(api, target, seen, tx, self.poll_interval));
        Ok(SubmissionStream::new(rx))
    }
}

async fn poll_task(
    mut api: RedditApi,
    target: String,
    mut seen: SeenWindow,
    tx: mpsc::Sender<Result<PostRecord, StreamError>>,
    poll_interval: Duration,
) {
    let mut consecutive_failures = 0u32;
    loop {
        tokio::time::sleep(poll_interval).await;

        match api.fetch_new(&target, FETCH_LIMIT).await {
            Ok(batch) => {
                consecutive_failures = 0;
                // Listings come newest-first; emit in feed-arrival order.
                for post in batch.into_iter().rev() {
                    if !seen.insert(&post.id) {
                        continue;
                    }
                    debug!("New post in r/{}: '{:.60}'", post.subreddit, post.title);
                    if tx.send(Ok(post)).await.is_err() {
                        debug!("Subscriber went away, stopping poll task");
                        return;
                    }
                }
            }
            Err(e) if e.is_transient() && consecutive_failures + 1 < MAX_CONSECUTIVE_FAILURES => {
                consecutive_failures += 1;
                let delay = e.retry_after().unwrap_or(poll_interval);
                warn!(
                    "Transient feed error ({}/{}), backing off {:?}: {}",
                    consecutive_failures, MAX_CONSECUTIVE_FAILURES, delay, e
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                error!("Subscription failed: {}", e);
                let _ = tx.send(Err(e)).await;
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use futures::StreamExt;

    fn post(id: &str) -> PostRecord {
        PostRecord {
            id: id.to_string(),
            subreddit: "rust".to_string(),
            title: format!("post {id}"),
            body: String::new(),
            author: Some("tester".to_string()),
            permalink: format!("/r/rust/comments/{id}/post/"),
            created: Utc::now(),
        }
    }

    #[test]
    fn seen_window_suppresses_duplicates() {
        let mut seen = SeenWindow::default();
        assert!(seen.insert("a"));
        assert!(!seen.insert("a"));
        assert!(seen.insert("b"));
    }

    #[test]
    fn seen_window_evicts_oldest_beyond_capacity() {
        let mut seen = SeenWindow::default();
        for i in 0..=SEEN_WINDOW {
            assert!(seen.insert(&format!("id{i}")));
        }
        // "id0" fell out of the window and would be accepted again.
        assert!(seen.insert("id0"));
        // A recent id is still remembered.
        assert!(!seen.insert(&format!("id{SEEN_WINDOW}")));
    }

    #[tokio::test]
    async fn submission_stream_yields_channel_items_in_order() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = SubmissionStream::new(rx);

        tx.send(Ok(post("one"))).await.unwrap();
        tx.send(Ok(post("two"))).await.unwrap();

        let first = stream.next().await.unwrap().unwrap();
        let second = stream.next().await.unwrap().unwrap();
        assert_eq!(first.id, "one");
        assert_eq!(second.id, "two");
    }

    #[tokio::test]
    async fn submission_stream_ends_when_sender_drops() {
        let (tx, rx) = mpsc::channel(4);
        let mut stream = SubmissionStream::new(rx);

        tx.send(Err(StreamError::Disconnected)).await.unwrap();
        drop(tx);

        assert!(matches!(
            stream.next().await,
            Some(Err(StreamError::Disconnected))
        ));
        assert!(stream.next().await.is_none());
    }
}
