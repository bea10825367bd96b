//! Merging externally-fetched records with locally stored ones.
//!
//! * [`harvest`] runs every active source of a realm once.
//! * [`RecordFeed`] accumulates records across fetches, de-duplicated and
//!   newest-first.
//! * [`Showcase`] picks the handful of entries a realm shows on an overview
//!   page: one local "main" entry plus a mix of locals and externals.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::registry::SourceRegistry;
use crate::source::{fields, Record};

/// How many additional entries a realm shows next to its main one.
pub const MAX_ADDITIONAL: usize = 5;

/// A source whose `fetch_list` failed during a harvest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub alias: String,
    pub message: String,
}

/// Result of fetching every active source of one realm.
#[derive(Debug, Default)]
pub struct Harvest {
    pub realm: String,
    /// Records in source registration order, tagged with `source` and `realm`.
    pub records: Vec<Record>,
    pub failures: Vec<SourceFailure>,
}

impl Harvest {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Tag a fetched record with where it came from.
pub(crate) fn tag(mut record: Record, realm: &str, alias: &str) -> Record {
    record.insert(fields::SOURCE, alias);
    record.insert(fields::REALM, realm);
    record
}

/// Fetch every active source registered for `realm`.
///
/// A failing source does not abort the harvest; it is recorded in
/// [`Harvest::failures`] and the remaining sources are still fetched.
/// This blocks for as long as the sources' I/O does.
pub fn harvest(registry: &SourceRegistry, realm: &str) -> Harvest {
    let mut out = Harvest {
        realm: realm.to_string(),
        ..Harvest::default()
    };

    for source in registry.sources(realm).active() {
        let alias = source.alias();
        match source.fetch_list() {
            Ok(records) => {
                out.records
                    .extend(records.into_iter().map(|r| tag(r, realm, alias)));
            }
            Err(e) => {
                warn!(realm, alias, error = %format!("{e:#}"), "source fetch failed");
                out.failures.push(SourceFailure {
                    alias: alias.to_string(),
                    message: format!("{e:#}"),
                });
            }
        }
    }

    info!(
        realm,
        records = out.records.len(),
        failures = out.failures.len(),
        "harvest finished"
    );
    out
}

/// De-duplicated, reverse-chronological record list.
#[derive(Debug, Default)]
pub struct RecordFeed {
    records: Vec<Record>,
    /// Ids already merged; the first record seen for an id is kept.
    seen: HashSet<String>,
}

impl RecordFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one record at its newest-first position.
    ///
    /// Returns `false` if a record with the same id was already present.
    /// Records without an id cannot be de-duplicated and are always added.
    pub fn insert(&mut self, record: Record) -> bool {
        let fresh = match record.id() {
            Some(id) if !id.is_empty() => self.seen.insert(id.to_string()),
            _ => true,
        };
        if fresh {
            // `None` sorts below every `Some`, so undated records sink; equal
            // dates keep arrival order.
            let published = record.published();
            let at = self
                .records
                .partition_point(|r| r.published() >= published);
            self.records.insert(at, record);
        }
        fresh
    }

    /// Merge newly-fetched records, returning how many were actually added.
    pub fn merge(&mut self, new_records: Vec<Record>) -> usize {
        new_records
            .into_iter()
            .map(|record| self.insert(record))
            .filter(|added| *added)
            .count()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Overview selection for one realm.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Showcase {
    /// The leading local entry; `None` when the realm has no local entries.
    pub main: Option<Record>,
    /// Remaining locals followed by externals.
    pub additional: Vec<Record>,
}

impl Showcase {
    /// Pick a main entry and its companions.
    ///
    /// Externals take up to `max_additional` slots; locals fill whatever the
    /// externals leave free, plus one for the main entry.  With no locals the
    /// showcase is empty even if externals exist.
    pub fn compose(locals: &[Record], externals: &[Record], max_additional: usize) -> Self {
        let count_locals = max_additional
            .saturating_sub(externals.len())
            .saturating_add(1);
        let locals = &locals[..count_locals.min(locals.len())];

        let Some((main, rest)) = locals.split_first() else {
            return Self::default();
        };

        let mut additional = rest.to_vec();
        additional.extend(externals.iter().take(max_additional).cloned());

        Self {
            main: Some(main.clone()),
            additional,
        }
    }
}
