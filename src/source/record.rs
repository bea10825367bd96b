//! The record type every source produces.
//!
//! A `Record` is a flat mapping of field name to value.  Sources are free to
//! add whatever fields their backend provides; the names in [`fields`] are the
//! ones the rest of the crate (de-duplication, sorting, display) understands.
//!
//! ## For contributors
//!
//! If you are adding a new source you do **not** need to modify this file.
//! Build records with [`Record::with`] in your source's `fetch_list()`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field names with a meaning outside the source that produced them.
pub mod fields {
    /// Stable identifier used for de-duplication.
    pub const ID: &str = "id";
    pub const TITLE: &str = "title";
    pub const DESCRIPTION: &str = "description";
    pub const LINK: &str = "link";
    /// RFC 3339 timestamp, used for newest-first ordering.
    pub const PUBLISHED: &str = "published";
    /// Alias of the source the record came from.
    pub const SOURCE: &str = "source";
    pub const REALM: &str = "realm";
}

/// A single externally-hosted entry, as a string-keyed map of values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(BTreeMap<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// The field's value if it is a string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn id(&self) -> Option<&str> {
        self.get_str(fields::ID)
    }

    pub fn title(&self) -> Option<&str> {
        self.get_str(fields::TITLE)
    }

    /// Parsed `published` timestamp.
    ///
    /// Missing or malformed dates yield `None`; such records sort after all
    /// dated ones.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        self.get_str(fields::PUBLISHED)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date = self
            .published()
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "no date".into());
        let title = self.title().unwrap_or("(untitled)");

        write!(f, "{date:<18} {title}")?;
        if let Some(source) = self.get_str(fields::SOURCE) {
            write!(f, "  [{source}]")?;
        }
        Ok(())
    }
}
