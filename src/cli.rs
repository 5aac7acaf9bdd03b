use clap::Parser;
use redwatch_core::{AppConfig, RunConfig};
use std::io::{self, Write};
use std::path::PathBuf;

/// Monitors Reddit for keywords and sends email alerts.
#[derive(Debug, Parser)]
#[command(name = "redwatch", version, about)]
pub struct Cli {
    /// One or more subreddits to monitor
    #[arg(short, long, num_args = 1.., value_name = "SUB")]
    pub subreddits: Vec<String>,

    /// One or more keywords to look for (quote phrases)
    #[arg(short, long, num_args = 1.., value_name = "WORD")]
    pub keywords: Vec<String>,

    /// The email address to send notifications to
    #[arg(short, long, value_name = "EMAIL")]
    pub email: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: PathBuf,
}

impl Cli {
    /// Resolves the run parameters: a CLI flag wins, then an interactive
    /// prompt, then the config file fallbacks (blank input keeps them).
    pub fn resolve(self, defaults: &AppConfig) -> io::Result<RunConfig> {
        let subreddits = resolve_list(
            self.subreddits,
            "Enter subreddits to monitor (space-separated): ",
            &defaults.monitoring.subreddits,
        )?;
        let keywords = resolve_list(
            self.keywords,
            "Enter keywords to look for (space-separated): ",
            &defaults.monitoring.keywords,
        )?;
        let recipient = match self.email {
            Some(email) => email,
            None => {
                let typed = prompt("Enter the recipient email address for notifications: ")?;
                if typed.is_empty() {
                    defaults.email.notification_email.clone()
                } else {
                    typed
                }
            }
        };

        Ok(RunConfig {
            subreddits,
            keywords,
            case_sensitive: defaults.monitoring.case_sensitive,
            recipient,
        })
    }
}

fn resolve_list(
    from_flags: Vec<String>,
    prompt_text: &str,
    fallback: &[String],
) -> io::Result<Vec<String>> {
    if !from_flags.is_empty() {
        return Ok(from_flags);
    }
    let typed = prompt(prompt_text)?;
    if typed.is_empty() {
        Ok(fallback.to_vec())
    } else {
        Ok(split_words(&typed))
    }
}

fn split_words(input: &str) -> Vec<String> {
    input.split_whitespace().map(str::to_string).collect()
}

fn prompt(text: &str) -> io::Result<String> {
    print!("> {text}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}
