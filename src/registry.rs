//! The source registry: realm → alias → source.
//!
//! The registry is built once at startup by calling [`SourceRegistry::register`]
//! for every concrete source, then frozen behind an `Arc` and shared with
//! every consumer.  Registration needs `&mut self`, so writes after the
//! registry has been shared are ruled out by the borrow checker rather than
//! by a lock.
//!
//! Lookups never fail: an unknown realm behaves like an empty one and an
//! unknown alias yields `None`.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::choices::SourceChoices;
use crate::error::SourceError;
use crate::source::RemoteSource;

/// Outcome of a single [`SourceRegistry::register`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First source under this `(realm, alias)`.
    Added,
    /// An earlier source under the same `(realm, alias)` was overwritten.
    Replaced,
    /// Empty alias; the source is abstract and was not stored.
    Skipped,
}

/// The sources of one realm, in registration order.
#[derive(Default)]
pub struct RealmSources {
    entries: Vec<Arc<dyn RemoteSource>>,
}

static NO_SOURCES: RealmSources = RealmSources::new();

impl RealmSources {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, alias: &str) -> Option<&Arc<dyn RemoteSource>> {
        self.entries.iter().find(|s| s.alias() == alias)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.get(alias).is_some()
    }

    pub fn aliases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|s| s.alias())
    }

    /// `(alias, source)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn RemoteSource>)> {
        self.entries.iter().map(|s| (s.alias(), s))
    }

    /// Only the sources whose `active()` flag is set.
    pub fn active(&self) -> impl Iterator<Item = &Arc<dyn RemoteSource>> {
        self.entries.iter().filter(|s| s.active())
    }

    pub fn has_active(&self) -> bool {
        self.active().next().is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // Overwrites in place so a replaced alias keeps its listing position.
    fn upsert(&mut self, source: Arc<dyn RemoteSource>) -> Registration {
        match self.entries.iter().position(|s| s.alias() == source.alias()) {
            Some(idx) => {
                self.entries[idx] = source;
                Registration::Replaced
            }
            None => {
                self.entries.push(source);
                Registration::Added
            }
        }
    }
}

#[derive(Default)]
pub struct SourceRegistry {
    realms: BTreeMap<String, RealmSources>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source under its own realm and alias.
    ///
    /// Last write wins on an alias collision; the overwrite is logged.
    pub fn register(&mut self, source: Arc<dyn RemoteSource>) -> Registration {
        let realm = source.realm().to_string();
        let alias = source.alias().to_string();

        if alias.is_empty() {
            debug!(realm = %realm, title = source.title(), "skipping source without alias");
            return Registration::Skipped;
        }

        let outcome = self.realms.entry(realm.clone()).or_default().upsert(source);
        match outcome {
            Registration::Replaced => {
                warn!(realm = %realm, alias = %alias, "source alias registered twice, replacing earlier source");
            }
            _ => debug!(realm = %realm, alias = %alias, "registered source"),
        }
        outcome
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, source: impl RemoteSource + 'static) -> Self {
        self.register(Arc::new(source));
        self
    }

    /// All sources registered for `realm`; empty for an unknown realm.
    pub fn sources(&self, realm: &str) -> &RealmSources {
        self.realms.get(realm).unwrap_or(&NO_SOURCES)
    }

    pub fn source(&self, realm: &str, alias: &str) -> Option<&Arc<dyn RemoteSource>> {
        self.sources(realm).get(alias)
    }

    /// Derive the current `(alias, title)` choice list for `realm`.
    pub fn choices(&self, realm: &str) -> Result<SourceChoices, SourceError> {
        SourceChoices::from_pairs(
            realm,
            self.sources(realm).iter().map(|(alias, s)| (alias, s.title())),
        )
    }

    /// Realm names that have at least one source, sorted.
    pub fn realms(&self) -> impl Iterator<Item = &str> {
        self.realms.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stub {
        realm: &'static str,
        alias: &'static str,
        title: &'static str,
    }

    impl RemoteSource for Stub {
        fn realm(&self) -> &str {
            self.realm
        }
        fn alias(&self) -> &str {
            self.alias
        }
        fn title(&self) -> &str {
            self.title
        }
    }

    fn stub(realm: &'static str, alias: &'static str, title: &'static str) -> Arc<dyn RemoteSource> {
        Arc::new(Stub { realm, alias, title })
    }

    #[test]
    fn registered_source_is_listed_and_found() {
        let mut registry = SourceRegistry::new();
        let source = stub("vacancy", "hh", "HeadHunter");

        assert_eq!(registry.register(Arc::clone(&source)), Registration::Added);

        assert!(registry.sources("vacancy").contains("hh"));
        let found = registry.source("vacancy", "hh").unwrap();
        assert!(Arc::ptr_eq(found, &source), "lookup returns the exact source");
    }

    #[test]
    fn empty_alias_is_never_registered() {
        let mut registry = SourceRegistry::new();
        assert_eq!(registry.register(stub("vacancy", "", "Base")), Registration::Skipped);

        assert!(registry.sources("vacancy").is_empty());
        assert!(registry.source("vacancy", "").is_none());
        assert_eq!(registry.realms().count(), 0, "no bucket created");
        assert!(registry.is_empty());
    }

    #[test]
    fn last_registration_wins_and_keeps_position() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("vacancy", "hh", "First"));
        registry.register(stub("vacancy", "lnk", "LinkedIn"));
        let second = stub("vacancy", "hh", "Second");

        assert_eq!(registry.register(Arc::clone(&second)), Registration::Replaced);

        let sources = registry.sources("vacancy");
        assert_eq!(sources.len(), 2, "exactly one entry per alias");
        assert!(Arc::ptr_eq(registry.source("vacancy", "hh").unwrap(), &second));
        assert_eq!(sources.aliases().collect::<Vec<_>>(), ["hh", "lnk"]);
    }

    #[test]
    fn lookup_misses_are_none() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("vacancy", "hh", "HeadHunter"));

        assert!(registry.source("vacancy", "indeed").is_none());
        assert!(registry.source("place", "hh").is_none());
        assert!(registry.sources("place").is_empty());
    }

    #[test]
    fn realms_are_isolated() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("vacancy", "hh", "HeadHunter"));
        registry.register(stub("event", "hh", "Hackathons"));

        assert_eq!(registry.source("vacancy", "hh").unwrap().title(), "HeadHunter");
        assert_eq!(registry.source("event", "hh").unwrap().title(), "Hackathons");
        assert_eq!(registry.realms().collect::<Vec<_>>(), ["event", "vacancy"]);
    }

    #[test]
    fn choices_have_one_member_per_alias() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("vacancy", "hh", "HeadHunter"));
        registry.register(stub("vacancy", "lnk", "LinkedIn"));
        registry.register(stub("vacancy", "hh", "HeadHunter.ru"));

        let choices = registry.choices("vacancy").unwrap();
        assert_eq!(choices.len(), 2);
        assert_eq!(choices.label("hh"), Some("HeadHunter.ru"));
        assert_eq!(choices.label("lnk"), Some("LinkedIn"));

        assert!(registry.choices("event").unwrap().is_empty());
    }

    #[test]
    fn choices_are_rebuilt_per_call() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("vacancy", "hh", "HeadHunter"));
        let before = registry.choices("vacancy").unwrap();

        registry.register(stub("vacancy", "lnk", "LinkedIn"));
        let after = registry.choices("vacancy").unwrap();

        assert_eq!(before.len(), 1, "earlier snapshot is unchanged");
        assert_eq!(after.len(), 2);
    }

    #[test]
    fn vacancy_scenario() {
        let registry = SourceRegistry::new()
            .with(Stub { realm: "vacancy", alias: "hh", title: "HeadHunter" })
            .with(Stub { realm: "vacancy", alias: "lnk", title: "LinkedIn" });

        let sources = registry.sources("vacancy");
        assert_eq!(sources.aliases().collect::<Vec<_>>(), ["hh", "lnk"]);

        let choices = registry.choices("vacancy").unwrap();
        let pairs: Vec<_> = choices
            .iter()
            .map(|c| (c.value.as_str(), c.label.as_str()))
            .collect();
        assert_eq!(pairs, [("hh", "HeadHunter"), ("lnk", "LinkedIn")]);

        assert!(registry.source("event", "hh").is_none());
    }

    #[test]
    fn active_filters_inactive_sources() {
        struct Dormant;
        impl RemoteSource for Dormant {
            fn realm(&self) -> &str {
                "event"
            }
            fn alias(&self) -> &str {
                "old"
            }
            fn title(&self) -> &str {
                "Old calendar"
            }
            fn active(&self) -> bool {
                false
            }
        }

        let registry = SourceRegistry::new()
            .with(Dormant)
            .with(Stub { realm: "event", alias: "new", title: "New calendar" });

        let sources = registry.sources("event");
        assert_eq!(sources.len(), 2, "inactive sources are still registered");
        let active: Vec<_> = sources.active().map(|s| s.alias()).collect();
        assert_eq!(active, ["new"]);
        assert!(sources.has_active());

        let dormant_only = SourceRegistry::new().with(Dormant);
        assert!(!dormant_only.sources("event").has_active());
        assert!(!dormant_only.sources("vacancy").has_active(), "unknown realm");
    }
}
