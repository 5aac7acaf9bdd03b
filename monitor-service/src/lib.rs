use futures::StreamExt;
use mail_notifier::{MailTransport, Notifier};
use redwatch_core::{find_keywords, format_notification, FeedSource, PostRecord, RunConfig};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Why a finished run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// External cancellation signal; a graceful stop.
    UserCancelled,
    /// The run configuration named no subreddits; the feed was never
    /// subscribed.
    SourceListEmpty,
    /// Advancing the subscription failed; restarting is an operator action.
    FatalStreamError,
}

impl StopReason {
    /// Cancellation is a normal exit; everything else is reported as failure.
    pub fn is_failure(self) -> bool {
        !matches!(self, StopReason::UserCancelled)
    }
}

/// Lifecycle of one monitoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Initializing,
    Running,
    Stopped(StopReason),
}

/// Wires the feed stream through the keyword matcher into the notifier, one
/// post at a time. A post is fully matched, formatted and (attempted to be)
/// delivered before the next one is pulled.
pub struct MonitorLoop<T: MailTransport> {
    config: RunConfig,
    notifier: Notifier<T>,
    state: MonitorState,
}

impl<T: MailTransport> MonitorLoop<T> {
    pub fn new(config: RunConfig, notifier: Notifier<T>) -> Self {
        Self {
            config,
            notifier,
            state: MonitorState::Initializing,
        }
    }

    pub fn state(&self) -> MonitorState {
        self.state
    }

    /// Runs until cancelled or the subscription dies. `shutdown` is observed
    /// between iterations; a signal (or a dropped sender) stops the loop
    /// gracefully.
    pub async fn run<F: FeedSource>(
        &mut self,
        source: &F,
        mut shutdown: watch::Receiver<bool>,
    ) -> StopReason {
        info!(
            "Monitor initializing: {} subreddit(s), {} keyword(s)",
            self.config.subreddits.len(),
            self.config.keywords.len()
        );

        if self.config.subreddits.is_empty() {
            error!("No subreddits to monitor");
            return self.stop(StopReason::SourceListEmpty);
        }

        let mut stream = match source.subscribe(&self.config.subreddits).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Failed to subscribe to the feed: {}", e);
                return self.stop(StopReason::FatalStreamError);
            }
        };

        self.state = MonitorState::Running;
        info!("Monitor running, waiting for new posts");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("Cancellation signal received, stopping");
                    return self.stop(StopReason::UserCancelled);
                }
                item = stream.next() => match item {
                    Some(Ok(post)) => self.process_post(post).await,
                    Some(Err(e)) => {
                        error!("Subscription error, stopping: {}", e);
                        return self.stop(StopReason::FatalStreamError);
                    }
                    None => {
                        error!("Subscription closed unexpectedly, stopping");
                        return self.stop(StopReason::FatalStreamError);
                    }
                }
            }
        }
    }

    /// Per-post pipeline. Failures here are scoped to this post and never
    /// stop the run.
    async fn process_post(&self, post: PostRecord) {
        let combined = format!("{} {}", post.title, post.body);
        let matched = find_keywords(&combined, &self.config.keywords, self.config.case_sensitive);
        if matched.is_empty() {
            debug!("No keyword match in '{:.60}'", post.title);
            return;
        }

        info!(
            "Found keywords '{}' in post: '{:.60}'",
            matched.join(", "),
            post.title
        );
        let notification = format_notification(&post, &matched, &self.config.recipient);
        if let Err(e) = self.notifier.deliver(&notification).await {
            warn!(
                "Delivery failed for '{}': {} (continuing)",
                notification.subject, e
            );
        }
    }

    fn stop(&mut self, reason: StopReason) -> StopReason {
        info!("Monitor stopped: {:?}", reason);
        self.state = MonitorState::Stopped(reason);
        reason
    }
}
