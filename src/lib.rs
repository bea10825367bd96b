//! realm-sources: a registry of remote data sources grouped by realm.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ register() ┌──────────────┐ sources()  ┌─────────────┐
//! │ config   │ ─────────► │  registry    │ ─────────► │ aggregate / │
//! │ (yaml)   │            │ realm→alias  │            │ poll        │
//! └──────────┘            └──────────────┘            └─────────────┘
//!                                │ choices()
//!                                ▼
//!                         ┌──────────────┐
//!                         │   choices    │
//!                         └──────────────┘
//! ```
//!
//! * **`source/`**: the `RemoteSource` trait, the `Record` type, and
//!   concrete implementations (currently RSS only).
//! * **`registry`**: realm → alias → source, built at startup then shared
//!   read-only.
//! * **`choices`**: closed `(alias, title)` lists derived from the registry.
//! * **`aggregate`**: one-shot harvests, record de-duplication, and the
//!   per-realm overview selection.
//! * **`poll`**: a tokio task that re-fetches sources on a timer.
//! * **`config`**: builds the registry from a YAML file.

pub mod aggregate;
pub mod choices;
pub mod config;
pub mod error;
pub mod poll;
pub mod registry;
pub mod source;

pub use aggregate::{harvest, Harvest, RecordFeed, Showcase, SourceFailure, MAX_ADDITIONAL};
pub use choices::{Choice, SourceChoices};
pub use config::{Config, SourceConfig, SourceKind};
pub use error::{ConfigError, SourceError};
pub use poll::PollMsg;
pub use registry::{RealmSources, Registration, SourceRegistry};
pub use source::{fields, Record, RemoteSource, RssSource};
