//! Reddit API client.
//!
//! The poll loop talks to reddit through the [`CommentFeed`] trait so that it
//! can be exercised against an in-memory feed. [`RedditClient`] is the real
//! implementation: an OAuth "script" app using the password grant.
//!
//! # Endpoints
//!
//! | Operation | Request |
//! |-----------|---------|
//! | login | `POST https://www.reddit.com/api/v1/access_token` |
//! | recent comments | `GET https://oauth.reddit.com/r/{subreddit}/comments?limit=N` |
//! | reply | `POST https://oauth.reddit.com/api/comment` |
//!
//! Access tokens last an hour; the client logs in again when the current one
//! is within a minute of expiring. No request is ever retried.

use crate::config::Credentials;
use crate::models::Comment;
use itertools::Itertools;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const OAUTH_BASE: &str = "https://oauth.reddit.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Errors returned by the reddit client.
#[derive(Debug, Error)]
pub enum RedditError {
    /// Transport-level failure (DNS, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Reddit answered with a non-success status.
    #[error("reddit returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// The token endpoint rejected the credentials.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The request was accepted but reddit reported errors in the payload.
    #[error("reddit API error: {0}")]
    Api(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A source of recent comments that can also be replied to.
pub trait CommentFeed {
    /// The account the bot posts as; its own comments are never answered.
    fn bot_username(&self) -> &str;

    /// Up to `limit` of the newest comments in `subreddit`, newest first.
    async fn recent_comments(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Comment>, RedditError>;

    /// Post `text` as a reply to `comment`.
    async fn reply(&self, comment: &Comment, text: &str) -> Result<(), RedditError>;
}

struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Authenticated reddit client.
pub struct RedditClient {
    http: Client,
    credentials: Credentials,
    token: Mutex<Option<AccessToken>>,
}

impl fmt::Debug for RedditClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditClient")
            .field("username", &self.credentials.username)
            .finish()
    }
}

impl RedditClient {
    /// Build a client and log in immediately, so bad credentials fail at startup.
    #[instrument(level = "info", skip_all, fields(username = %credentials.username))]
    pub async fn login(credentials: Credentials, user_agent: &str) -> Result<Self, RedditError> {
        info!("Logging in");
        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let client = Self {
            http,
            credentials,
            token: Mutex::new(None),
        };
        client.bearer().await?;
        info!("Successfully logged in");
        Ok(client)
    }

    /// Current access token, fetching a new one if missing or about to expire.
    async fn bearer(&self) -> Result<String, RedditError> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }
        let token = self.authenticate().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    #[instrument(level = "debug", skip_all)]
    async fn authenticate(&self) -> Result<AccessToken, RedditError> {
        let params = [
            ("grant_type", "password"),
            ("username", self.credentials.username.as_str()),
            ("password", self.credentials.password.as_str()),
        ];
        let response = self
            .http
            .post(TOKEN_URL)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(&params)
            .send()
            .await?;
        let body = ensure_success(response).await?;
        let token = parse_token(&body)?;
        debug!(expires_in_secs = token.expires_in, "Obtained access token");
        Ok(AccessToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}

impl CommentFeed for RedditClient {
    fn bot_username(&self) -> &str {
        &self.credentials.username
    }

    #[instrument(level = "info", skip(self))]
    async fn recent_comments(
        &self,
        subreddit: &str,
        limit: usize,
    ) -> Result<Vec<Comment>, RedditError> {
        let t0 = Instant::now();
        let url = listing_url(subreddit)?;
        let token = self.bearer().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("limit", limit.to_string()), ("raw_json", "1".to_string())])
            .send()
            .await?;
        let body = ensure_success(response).await?;
        let comments = parse_listing(&body)?;
        debug!(
            count = comments.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Fetched comment listing"
        );
        Ok(comments)
    }

    #[instrument(level = "info", skip(self, comment, text), fields(comment_id = %comment.id))]
    async fn reply(&self, comment: &Comment, text: &str) -> Result<(), RedditError> {
        let token = self.bearer().await?;
        let thing_id = comment.fullname();
        let params = [
            ("api_type", "json"),
            ("thing_id", thing_id.as_str()),
            ("text", text),
        ];
        let response = self
            .http
            .post(format!("{OAUTH_BASE}/api/comment"))
            .bearer_auth(token)
            .form(&params)
            .send()
            .await?;
        let body = ensure_success(response).await?;
        check_reply(&body)
    }
}

/// Read the body, turning a non-2xx status into [`RedditError::Status`].
async fn ensure_success(response: Response) -> Result<String, RedditError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        warn!(%status, "Reddit request failed");
        return Err(RedditError::Status { status, body });
    }
    Ok(body)
}

fn listing_url(subreddit: &str) -> Result<Url, RedditError> {
    let mut url = Url::parse(OAUTH_BASE)?;
    url.path_segments_mut()
        .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
        .pop_if_empty()
        .extend(["r", subreddit, "comments"]);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<u64>,
    error: Option<String>,
}

#[cfg_attr(test, derive(Debug))]
struct GrantedToken {
    access_token: String,
    expires_in: u64,
}

/// The token endpoint answers 200 with `{"error": "invalid_grant"}` on bad
/// passwords, so the body has to be inspected even on success.
fn parse_token(body: &str) -> Result<GrantedToken, RedditError> {
    let response: TokenResponse = serde_json::from_str(body)?;
    if let Some(error) = response.error {
        return Err(RedditError::Auth(error));
    }
    let access_token = response
        .access_token
        .ok_or_else(|| RedditError::Auth("no access_token in response".to_string()))?;
    Ok(GrantedToken {
        access_token,
        expires_in: response.expires_in.unwrap_or(3600),
    })
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    kind: String,
    data: CommentData,
}

#[derive(Debug, Deserialize)]
struct CommentData {
    id: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    author: String,
}

/// Comments (`t1` things) from a listing body, in listing order.
fn parse_listing(body: &str) -> Result<Vec<Comment>, RedditError> {
    let listing: Listing = serde_json::from_str(body)?;
    Ok(listing
        .data
        .children
        .into_iter()
        .filter(|thing| thing.kind == "t1")
        .map(|thing| Comment {
            id: thing.data.id,
            body: thing.data.body,
            author: thing.data.author,
        })
        .collect())
}

#[derive(Debug, Deserialize)]
struct ReplyResponse {
    json: ReplyJson,
}

#[derive(Debug, Deserialize)]
struct ReplyJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

/// With `api_type=json`, a rejected reply still comes back as 200 with
/// `json.errors` populated, e.g. `[["RATELIMIT", "you are doing that too much", "ratelimit"]]`.
fn check_reply(body: &str) -> Result<(), RedditError> {
    let response: ReplyResponse = serde_json::from_str(body)?;
    if response.json.errors.is_empty() {
        return Ok(());
    }
    let message = response
        .json
        .errors
        .iter()
        .map(|e| e.to_string())
        .join("; ");
    Err(RedditError::Api(message))
}
