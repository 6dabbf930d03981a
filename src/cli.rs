//! Command-line interface definitions for the word-of-the-day bot.
//!
//! Every option can also be supplied through an environment variable, so the
//! bot runs with no arguments at all once the credentials are exported.

use clap::Parser;

/// Command-line arguments for the bot.
///
/// The four reddit credentials may come from flags, environment variables or
/// a YAML file passed with `--config`; flags and environment win over the file.
///
/// # Examples
///
/// ```sh
/// # Credentials from the environment
/// REDDIT_USERNAME=wotd_bot REDDIT_PASSWORD=... \
/// REDDIT_CLIENT_ID=... REDDIT_CLIENT_SECRET=... wotd_bot
///
/// # Credentials from a file, polling another subreddit
/// wotd_bot --config ./credentials.yaml --subreddit bottesting
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Reddit account name the bot posts as
    #[arg(long, env = "REDDIT_USERNAME")]
    pub username: Option<String>,

    /// Reddit account password
    #[arg(long, env = "REDDIT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Reddit script-app client id
    #[arg(long, env = "REDDIT_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Reddit script-app client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Optional path to a YAML file holding the credentials
    #[arg(short, long, env = "WOTD_BOT_CONFIG")]
    pub config: Option<String>,

    /// Subreddit whose comments are polled
    #[arg(short, long, env = "WOTD_BOT_SUBREDDIT", default_value = "test")]
    pub subreddit: String,

    /// File recording the ids of comments already replied to
    #[arg(short, long, env = "WOTD_BOT_LEDGER", default_value = "comments.txt")]
    pub ledger: String,

    /// User agent sent with every reddit request
    #[arg(long, env = "WOTD_BOT_USER_AGENT", default_value = "WORD OF THE DAY BOT")]
    pub user_agent: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "wotd_bot",
            "--username",
            "wotd_bot",
            "--password",
            "hunter2",
            "--client-id",
            "abc",
            "--client-secret",
            "xyz",
        ]);

        assert_eq!(cli.username.as_deref(), Some("wotd_bot"));
        assert_eq!(cli.password.as_deref(), Some("hunter2"));
        assert_eq!(cli.client_id.as_deref(), Some("abc"));
        assert_eq!(cli.client_secret.as_deref(), Some("xyz"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "wotd_bot",
            "-c",
            "/etc/wotd/credentials.yaml",
            "-s",
            "bottesting",
            "-l",
            "/var/lib/wotd/comments.txt",
        ]);

        assert_eq!(cli.config.as_deref(), Some("/etc/wotd/credentials.yaml"));
        assert_eq!(cli.subreddit, "bottesting");
        assert_eq!(cli.ledger, "/var/lib/wotd/comments.txt");
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["wotd_bot", "--subreddit", "test"]);
        assert_eq!(cli.subreddit, "test");
        assert_eq!(cli.user_agent, "WORD OF THE DAY BOT");
    }
}
