mod cli;
mod config;

use clap::Parser;
use cli::Cli;
use mail_notifier::{Notifier, SmtpMailer};
use monitor_service::{MonitorLoop, StopReason};
use reddit_client::{RedditCredentials, RedditFeed};
use redwatch_core::MonitorError;
use tokio::sync::watch;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "redwatch=info,monitor_service=info,reddit_client=info,mail_notifier=info"
                    .into()
            }),
        )
        .init();

    info!("Starting Redwatch - Reddit Keyword Monitor");

    match run().await {
        Ok(reason) if reason.is_failure() => std::process::exit(1),
        Ok(_) => {}
        Err(e) => {
            error!("Fatal error: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<StopReason, MonitorError> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let app_config = config::load_or_init(&config_path)?;

    let run_config = cli.resolve(&app_config).map_err(MonitorError::Io)?;
    info!("Subreddits set to: {:?}", run_config.subreddits);
    info!("Keywords set to: {:?}", run_config.keywords);
    if run_config.recipient.is_empty() {
        info!("No recipient configured; matches will be logged, not mailed");
    } else {
        info!("Notifications will be sent to: {}", run_config.recipient);
    }

    let feed = RedditFeed::new(RedditCredentials {
        client_id: app_config.reddit.client_id.clone(),
        client_secret: app_config.reddit.client_secret.clone(),
        user_agent: app_config.reddit.user_agent.clone(),
    });
    let mailer = SmtpMailer::new(&app_config.email)?;
    let notifier = Notifier::new(mailer);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Ctrl+C received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    info!("Press Ctrl+C to stop the bot");
    let mut monitor = MonitorLoop::new(run_config, notifier);
    Ok(monitor.run(&feed, shutdown_rx).await)
}
