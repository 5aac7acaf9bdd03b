use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fully resolved parameters for one monitoring run. Read-only once the
/// monitor loop starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Subreddits to watch. Must be non-empty for the loop to start.
    pub subreddits: Vec<String>,
    /// Keywords to look for. An empty list is valid and yields no matches.
    pub keywords: Vec<String>,
    pub case_sensitive: bool,
    /// Empty means "no delivery target": matches are logged instead of mailed.
    pub recipient: String,
}

/// One item observed from the monitored feed.
#[derive(Debug, Clone)]
pub struct PostRecord {
    pub id: String,
    pub subreddit: String,
    pub title: String,
    /// Self-text of the post; empty for link posts.
    pub body: String,
    /// None for deleted/anonymous authors.
    pub author: Option<String>,
    /// Site-relative permalink, e.g. `/r/rust/comments/abc123/title/`.
    pub permalink: String,
    pub created: DateTime<Utc>,
}

/// A formatted alert, built fresh per matched post and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

/// On-disk configuration (config.json).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub reddit: RedditSettings,
    pub email: EmailSettings,
    pub monitoring: MonitoringSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedditSettings {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub sender_email: String,
    pub sender_password: String,
    /// Fallback recipient when none is given on the command line.
    pub notification_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringSettings {
    pub subreddits: Vec<String>,
    pub keywords: Vec<String>,
    pub case_sensitive: bool,
}

impl AppConfig {
    /// Starter configuration written when no config file exists yet.
    pub fn template() -> Self {
        Self {
            reddit: RedditSettings {
                client_id: "YOUR_REDDIT_CLIENT_ID".to_string(),
                client_secret: "YOUR_REDDIT_CLIENT_SECRET".to_string(),
                user_agent: "redwatch/0.1 by YourUsername".to_string(),
            },
            email: EmailSettings {
                smtp_server: "smtp.gmail.com".to_string(),
                smtp_port: 465,
                sender_email: "your_email@gmail.com".to_string(),
                sender_password: "your_app_password".to_string(),
                notification_email: "recipient_email@example.com".to_string(),
            },
            monitoring: MonitoringSettings {
                subreddits: vec!["python".to_string(), "programming".to_string()],
                keywords: vec![
                    "api".to_string(),
                    "bot".to_string(),
                    "automation".to_string(),
                ],
                case_sensitive: false,
            },
        }
    }

    /// True while the template credentials have not been replaced.
    pub fn has_placeholder_credentials(&self) -> bool {
        self.reddit.client_id.contains("YOUR_REDDIT")
            || self.reddit.client_secret.contains("YOUR_REDDIT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_round_trips_through_json() {
        let template = AppConfig::template();
        let raw = serde_json::to_string_pretty(&template).unwrap();
        let parsed: AppConfig = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.email.smtp_port, 465);
        assert_eq!(parsed.monitoring.subreddits, template.monitoring.subreddits);
    }

    #[test]
    fn template_credentials_are_placeholders() {
        assert!(AppConfig::template().has_placeholder_credentials());

        let mut filled = AppConfig::template();
        filled.reddit.client_id = "abc123".to_string();
        filled.reddit.client_secret = "s3cret".to_string();
        assert!(!filled.has_placeholder_credentials());
    }
}
