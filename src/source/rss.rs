//! RSS feed source implementation.
//!
//! This module shows how to implement the [`RemoteSource`] trait for a
//! concrete feed format.  Use it as a template when adding another backend.
//!
//! ## For contributors: adding a new source type
//!
//! 1. Create a new file under `src/source/`.
//! 2. Define a struct that holds the realm, alias and title plus any
//!    configuration your backend needs (URL, API key, etc.).
//! 3. Implement [`RemoteSource`] for your struct; `fetch_list()` returns
//!    `Vec<Record>`.
//! 4. Re-export your struct from `src/source/mod.rs`.
//! 5. Add a `SourceKind` variant in `config.rs` so it can be configured.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use super::{fields, Record, RemoteSource};

/// An RSS feed feeding one realm.
///
/// Fetches and parses an RSS 2.0 feed over HTTP using the [`rss`] crate.
#[derive(Debug, Clone)]
pub struct RssSource {
    pub realm: String,
    pub alias: String,
    pub title: String,
    /// The feed URL to poll.
    pub url: String,
    pub active: bool,
}

impl RssSource {
    /// Create a new, active RSS source.
    ///
    /// # Arguments
    ///
    /// * `realm` – realm the feed's records belong to (e.g. `"event"`).
    /// * `alias` – short key, unique within the realm.
    /// * `title` – display name.
    /// * `url` – full URL of the RSS feed.
    pub fn new(
        realm: impl Into<String>,
        alias: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            realm: realm.into(),
            alias: alias.into(),
            title: title.into(),
            url: url.into(),
            active: true,
        }
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Parse an already-fetched [`rss::Channel`] into [`Record`]s.
    ///
    /// Pure function (no I/O) so that tests can exercise the parsing logic
    /// without hitting the network.
    pub fn parse_channel(channel: &rss::Channel, alias: &str) -> Vec<Record> {
        channel
            .items()
            .iter()
            .map(|item| {
                // Prefer <guid>, fall back to <link>, then empty string.
                let id = item
                    .guid()
                    .map(|g| g.value().to_string())
                    .or_else(|| item.link().map(String::from))
                    .unwrap_or_default();

                let mut record = Record::new()
                    .with(fields::ID, id)
                    .with(fields::TITLE, item.title().unwrap_or("(untitled)"))
                    .with(fields::SOURCE, alias);

                if let Some(description) = item.description() {
                    record.insert(fields::DESCRIPTION, description);
                }
                if let Some(link) = item.link() {
                    record.insert(fields::LINK, link);
                }

                // RFC 2822 in the feed, RFC 3339 in the record; drop on failure.
                let published = item
                    .pub_date()
                    .and_then(|d| DateTime::parse_from_rfc2822(d).ok())
                    .map(|dt| dt.with_timezone(&Utc));
                if let Some(published) = published {
                    record.insert(
                        fields::PUBLISHED,
                        published.to_rfc3339_opts(SecondsFormat::Secs, true),
                    );
                }

                record
            })
            .collect()
    }
}

impl RemoteSource for RssSource {
    fn realm(&self) -> &str {
        &self.realm
    }

    fn alias(&self) -> &str {
        &self.alias
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn active(&self) -> bool {
        self.active
    }

    fn fetch_list(&self) -> Result<Vec<Record>> {
        debug!(url = %self.url, alias = %self.alias, "fetching rss feed");
        let body = reqwest::blocking::get(&self.url)
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .with_context(|| format!("while downloading {}", self.url))?;
        let channel = rss::Channel::read_from(body.as_ref())
            .with_context(|| format!("while parsing feed from {}", self.url))?;
        Ok(Self::parse_channel(&channel, &self.alias))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
