use chrono::{DateTime, Utc};
use redwatch_core::{PostRecord, StreamError};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);
/// Refresh the token this long before Reddit would expire it.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListing<T> {
    pub kind: String,
    pub data: RedditListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingData<T> {
    pub children: Vec<RedditListingChild<T>>,
    pub after: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedditPostData {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub selftext: String,
    #[serde(default)]
    pub author: Option<String>,
    pub subreddit: String,
    pub permalink: String,
    pub created_utc: f64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct AppToken {
    access_token: String,
    expires_at: Instant,
}

impl AppToken {
    fn needs_refresh(&self) -> bool {
        Instant::now() + TOKEN_EXPIRY_MARGIN >= self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

/// Read-only Reddit API client using the app-only OAuth grant.
#[derive(Debug)]
pub struct RedditApi {
    http_client: Client,
    credentials: RedditCredentials,
    token: Option<AppToken>,
}

impl RedditApi {
    pub fn new(credentials: RedditCredentials) -> Result<Self, StreamError> {
        let http_client = Client::builder()
            .user_agent(&credentials.user_agent)
            .timeout(HTTP_TIMEOUT)
            .build()?;

        Ok(Self {
            http_client,
            credentials,
            token: None,
        })
    }

    /// Fetches (or reuses) an app-only bearer token. Reddit issues these via
    /// the client_credentials grant for read-only scripts.
    async fn ensure_token(&mut self) -> Result<String, StreamError> {
        if let Some(token) = &self.token {
            if !token.needs_refresh() {
                return Ok(token.access_token.clone());
            }
            debug!("Access token close to expiry, refreshing");
        }

        let response = self
            .http_client
            .post(REDDIT_TOKEN_URL)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(request_error)?;

        if !response.status().is_success() {
            return Err(StreamError::AuthenticationFailed {
                reason: format!("token endpoint returned {}", response.status()),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            StreamError::InvalidResponse {
                details: "token response".to_string(),
            }
        })?;

        info!("Connected to Reddit API (app-only, read-only mode)");
        let access_token = token.access_token.clone();
        self.token = Some(AppToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        });
        Ok(access_token)
    }

    /// Newest submissions across the joined subreddit path (`a+b+c`),
    /// newest first as Reddit returns them.
    pub async fn fetch_new(
        &mut self,
        subreddits: &str,
        limit: u32,
    ) -> Result<Vec<PostRecord>, StreamError> {
        let token = self.ensure_token().await?;
        let url = format!("{}/r/{}/new", REDDIT_API_BASE, subreddits);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&token)
            .query(&[("limit", limit.to_string())])
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            error!("Listing request failed with status {} for r/{}", status, subreddits);
            return Err(match status {
                StatusCode::UNAUTHORIZED => {
                    // Token rejected; next call re-authenticates from scratch.
                    self.token = None;
                    StreamError::AuthenticationFailed {
                        reason: "access token rejected".to_string(),
                    }
                }
                StatusCode::FORBIDDEN => StreamError::Forbidden {
                    resource: format!("r/{subreddits}"),
                },
                StatusCode::NOT_FOUND => StreamError::SubredditNotFound {
                    subreddit: subreddits.to_string(),
                },
                StatusCode::TOO_MANY_REQUESTS => StreamError::RateLimited {
                    retry_after: retry_after_seconds(&response),
                },
                s if s.is_server_error() => StreamError::ServerError {
                    status_code: s.as_u16(),
                },
                s => StreamError::InvalidResponse {
                    details: format!("unexpected status {s}"),
                },
            });
        }

        let listing: RedditListing<RedditPostData> = response.json().await.map_err(|e| {
            error!("Failed to parse listing for r/{}: {}", subreddits, e);
            StreamError::InvalidResponse {
                details: format!("listing for r/{subreddits}"),
            }
        })?;

        debug!(
            "Fetched {} posts from r/{}",
            listing.data.children.len(),
            subreddits
        );
        Ok(listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into())
            .collect())
    }
}

/// Joins the source set into the single listing target Reddit understands.
pub fn join_subreddits(subreddits: &[String]) -> String {
    subreddits.join("+")
}

fn request_error(e: reqwest::Error) -> StreamError {
    if e.is_timeout() {
        StreamError::RequestTimeout
    } else {
        StreamError::Network(e)
    }
}

fn retry_after_seconds(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(60)
}

impl From<RedditPostData> for PostRecord {
    fn from(data: RedditPostData) -> Self {
        // Reddit reports deleted accounts as the literal "[deleted]".
        let author = data.author.filter(|a| a != "[deleted]");
        Self {
            id: data.id,
            subreddit: data.subreddit,
            title: data.title,
            body: data.selftext,
            author,
            permalink: data.permalink,
            created: DateTime::from_timestamp(data.created_utc as i64, 0)
                .unwrap_or_else(Utc::now),
        }
    }
}
