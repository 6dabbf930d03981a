//! Reddit credentials.
//!
//! Built once at startup from the command line / environment, optionally
//! layered over a YAML file, and handed to the reddit client at login.
//!
//! # File Format
//!
//! ```yaml
//! username: wotd_bot
//! password: hunter2
//! client_id: AbCdEf123
//! client_secret: s3cr3t
//! ```

use crate::cli::Cli;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors raised while assembling [`Credentials`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The credentials file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The credentials file is not valid YAML for [`CredentialsFile`].
    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A credential was supplied by neither the command line nor the file.
    #[error("missing credential `{0}` (set --{1} or {2})")]
    Missing(&'static str, &'static str, &'static str),
}

/// Credentials as they appear in the optional YAML file.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsFile {
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl CredentialsFile {
    /// Read and parse a credentials file.
    #[instrument(level = "info")]
    pub async fn load(path: &str) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_string(),
                source,
            })?;
        let file = Self::parse(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!("Loaded credentials file");
        Ok(file)
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(text)
    }
}

/// The four values needed to log in as a reddit script app.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from parsed CLI arguments, reading `--config` if set.
    pub async fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match cli.config.as_deref() {
            Some(path) => CredentialsFile::load(path).await?,
            None => CredentialsFile::default(),
        };
        Self::merge(cli, file)
    }

    /// Combine CLI/environment values with file values; CLI/environment win.
    /// Empty or whitespace-only values count as absent.
    pub fn merge(cli: &Cli, file: CredentialsFile) -> Result<Self, ConfigError> {
        fn pick(
            primary: &Option<String>,
            fallback: Option<String>,
            missing: ConfigError,
        ) -> Result<String, ConfigError> {
            primary
                .clone()
                .filter(|v| !v.trim().is_empty())
                .or(fallback.filter(|v| !v.trim().is_empty()))
                .ok_or(missing)
        }

        Ok(Self {
            username: pick(
                &cli.username,
                file.username,
                ConfigError::Missing("username", "username", "REDDIT_USERNAME"),
            )?,
            password: pick(
                &cli.password,
                file.password,
                ConfigError::Missing("password", "password", "REDDIT_PASSWORD"),
            )?,
            client_id: pick(
                &cli.client_id,
                file.client_id,
                ConfigError::Missing("client_id", "client-id", "REDDIT_CLIENT_ID"),
            )?,
            client_secret: pick(
                &cli.client_secret,
                file.client_secret,
                ConfigError::Missing("client_secret", "client-secret", "REDDIT_CLIENT_SECRET"),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["wotd_bot"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    /// A `Cli` built directly, so `REDDIT_*` variables in the test
    /// environment cannot fill in the credentials.
    fn cli_without_env(
        username: Option<&str>,
        password: Option<&str>,
        client_id: Option<&str>,
        client_secret: Option<&str>,
    ) -> Cli {
        Cli {
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            client_id: client_id.map(str::to_string),
            client_secret: client_secret.map(str::to_string),
            config: None,
            subreddit: "test".to_string(),
            ledger: "comments.txt".to_string(),
            user_agent: "WORD OF THE DAY BOT".to_string(),
        }
    }

    fn full_file() -> CredentialsFile {
        CredentialsFile::parse(
            "username: file_user\npassword: file_pass\nclient_id: file_id\nclient_secret: file_secret\n",
        )
        .unwrap()
    }

    #[test]
    fn test_merge_from_file_only() {
        let creds =
            Credentials::merge(&cli_without_env(None, None, None, None), full_file()).unwrap();
        assert_eq!(creds.username, "file_user");
        assert_eq!(creds.password, "file_pass");
        assert_eq!(creds.client_id, "file_id");
        assert_eq!(creds.client_secret, "file_secret");
    }

    #[test]
    fn test_partial_cli_is_completed_from_file() {
        let creds = Credentials::merge(
            &cli_without_env(Some("cli_user"), None, None, Some("cli_secret")),
            full_file(),
        )
        .unwrap();
        assert_eq!(creds.username, "cli_user");
        assert_eq!(creds.password, "file_pass");
        assert_eq!(creds.client_id, "file_id");
        assert_eq!(creds.client_secret, "cli_secret");
    }

    #[test]
    fn test_cli_overrides_file() {
        let creds = Credentials::merge(
            &cli(&[
                "--username",
                "cli_user",
                "--password",
                "cli_pass",
                "--client-id",
                "cli_id",
                "--client-secret",
                "cli_secret",
            ]),
            full_file(),
        )
        .unwrap();
        assert_eq!(creds.username, "cli_user");
        assert_eq!(creds.password, "cli_pass");
        assert_eq!(creds.client_id, "cli_id");
        assert_eq!(creds.client_secret, "cli_secret");
    }

    #[test]
    fn test_missing_credential_is_reported() {
        let err = Credentials::merge(
            &cli_without_env(Some("u"), Some("p"), Some("id"), None),
            CredentialsFile::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("client_secret", _, _)));
        assert!(err.to_string().contains("REDDIT_CLIENT_SECRET"));
    }

    #[test]
    fn test_blank_value_falls_back_to_file() {
        let creds = Credentials::merge(
            &cli(&[
                "--username",
                "  ",
                "--password",
                "p",
                "--client-id",
                "id",
                "--client-secret",
                "s",
            ]),
            full_file(),
        )
        .unwrap();
        assert_eq!(creds.username, "file_user");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials {
            username: "u".to_string(),
            password: "hunter2".to_string(),
            client_id: "id".to_string(),
            client_secret: "s3cr3t".to_string(),
        };
        let shown = format!("{creds:?}");
        assert!(!shown.contains("hunter2"));
        assert!(!shown.contains("s3cr3t"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        assert!(CredentialsFile::parse("username: [unterminated").is_err());
    }

    #[tokio::test]
    async fn test_load_missing_file_is_io_error() {
        let err = CredentialsFile::load("/definitely/not/here.yaml").await.unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
