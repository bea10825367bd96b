//! Remote source abstraction layer.
//!
//! This module defines the [`RemoteSource`] trait and the common [`Record`]
//! type.  Concrete source implementations live in sub-modules (currently only
//! [`rss`]).
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `telegram.rs`).
//! 2. Define a struct and implement [`RemoteSource`] for it, overriding
//!    [`fetch_list`](RemoteSource::fetch_list).
//! 3. Add `mod telegram;` below and re-export your struct.
//! 4. Register an instance with the [`SourceRegistry`](crate::SourceRegistry)
//!    at startup (or teach [`Config`](crate::Config) to build it).

pub mod record;
mod rss;

pub use record::{fields, Record};
pub use self::rss::RssSource;

use anyhow::Result;

use crate::error::SourceError;

/// Trait that every remote source must implement.
///
/// A source belongs to exactly one realm and is identified inside it by a
/// short alias.  An empty alias marks an abstract source: one that only
/// carries shared logic and must never be looked up or listed.
///
/// Sources are shared across threads once the registry is frozen, so
/// implementations must be [`Send`] and [`Sync`].
///
/// ## Implementing a new source
///
/// ```ignore
/// struct Meetups;
///
/// impl RemoteSource for Meetups {
///     fn realm(&self) -> &str { "event" }
///     fn alias(&self) -> &str { "meetup" }
///     fn title(&self) -> &str { "Meetup" }
///
///     fn fetch_list(&self) -> Result<Vec<Record>> {
///         // Perform HTTP / IO, then convert into Record values.
///         todo!()
///     }
/// }
/// ```
pub trait RemoteSource: Send + Sync {
    /// Realm (logical domain) this source feeds, e.g. `"vacancy"`.
    fn realm(&self) -> &str;

    /// Short key, unique within the realm.  Empty means "do not register".
    fn alias(&self) -> &str;

    /// Human-readable display name.
    fn title(&self) -> &str;

    /// Informational flag; the registry stores inactive sources too.
    fn active(&self) -> bool {
        true
    }

    /// Fetch the current state of the external source.
    ///
    /// Returns a fully materialised list.  Implementations do their own I/O
    /// and error translation.  The default body fails with
    /// [`SourceError::NotImplemented`].
    fn fetch_list(&self) -> Result<Vec<Record>> {
        Err(SourceError::NotImplemented {
            realm: self.realm().to_string(),
            alias: self.alias().to_string(),
        }
        .into())
    }
}
