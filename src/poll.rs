//! Background source polling.
//!
//! Runs as a tokio task, periodically fetching every active source of the
//! watched realms and sending results to the consumer over an
//! [`mpsc`] channel.
//!
//! ## For contributors
//!
//! Sources are fetched one after another.  `fetch_list` is blocking I/O, so
//! each call is moved onto tokio's blocking pool; the poller itself never
//! blocks the runtime.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task;
use tracing::{debug, warn};

use crate::aggregate::tag;
use crate::registry::SourceRegistry;
use crate::source::Record;

/// Messages sent from the poller task to the consumer.
#[derive(Debug)]
pub enum PollMsg {
    /// A successful fetch returned these records (already tagged).
    Records {
        realm: String,
        alias: String,
        records: Vec<Record>,
    },
    /// A fetch failed with this error description.
    Error {
        realm: String,
        alias: String,
        message: String,
    },
}

/// How often the poller re-fetches all sources by default.
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

const CHANNEL_CAPACITY: usize = 64;

/// Spawn the background polling task on the current tokio runtime.
///
/// Returns a receiver that the consumer should drain.  The task runs until
/// the receiver is dropped.
pub fn spawn(
    registry: Arc<SourceRegistry>,
    realms: Vec<String>,
    interval: Duration,
) -> mpsc::Receiver<PollMsg> {
    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            tokio::select! {
                _ = tx.closed() => {
                    debug!("poll receiver dropped, stopping");
                    return;
                }
                _ = ticker.tick() => {}
            }
            for realm in &realms {
                let aliases: Vec<String> = registry
                    .sources(realm)
                    .active()
                    .map(|s| s.alias().to_string())
                    .collect();

                for alias in aliases {
                    let msg = fetch_one(Arc::clone(&registry), realm.clone(), alias).await;
                    // If the receiver is gone the consumer has exited;
                    // silently stop polling.
                    if tx.send(msg).await.is_err() {
                        debug!("poll receiver dropped, stopping");
                        return;
                    }
                }
            }
        }
    });

    rx
}

async fn fetch_one(registry: Arc<SourceRegistry>, realm: String, alias: String) -> PollMsg {
    let (r, a) = (realm.clone(), alias.clone());
    let joined = task::spawn_blocking(move || {
        registry
            .source(&r, &a)
            .map(|source| source.fetch_list())
    })
    .await;

    match joined {
        Ok(Some(Ok(records))) => {
            let records = records
                .into_iter()
                .map(|rec| tag(rec, &realm, &alias))
                .collect();
            PollMsg::Records {
                realm,
                alias,
                records,
            }
        }
        Ok(Some(Err(e))) => {
            warn!(realm = %realm, alias = %alias, error = %format!("{e:#}"), "poll fetch failed");
            PollMsg::Error {
                realm,
                alias,
                message: format!("{e:#}"),
            }
        }
        Ok(None) => PollMsg::Error {
            message: format!("source `{alias}` is not registered"),
            realm,
            alias,
        },
        Err(e) => PollMsg::Error {
            realm,
            alias,
            message: format!("fetch task failed: {e}"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::{bail, Result};

    use crate::source::{fields, RemoteSource};

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl RemoteSource for Counting {
        fn realm(&self) -> &str {
            "event"
        }
        fn alias(&self) -> &str {
            "counting"
        }
        fn title(&self) -> &str {
            "Counting"
        }
        fn fetch_list(&self) -> Result<Vec<Record>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Record::new().with(fields::ID, format!("call-{n}"))])
        }
    }

    struct Failing;

    impl RemoteSource for Failing {
        fn realm(&self) -> &str {
            "vacancy"
        }
        fn alias(&self) -> &str {
            "down"
        }
        fn title(&self) -> &str {
            "Down"
        }
        fn fetch_list(&self) -> Result<Vec<Record>> {
            bail!("503 Service Unavailable")
        }
    }

    #[tokio::test]
    async fn sends_records_for_each_tick() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(SourceRegistry::new().with(Counting {
            calls: Arc::clone(&calls),
        }));

        let mut rx = spawn(registry, vec!["event".into()], Duration::from_millis(10));

        for expected in ["call-0", "call-1"] {
            match rx.recv().await {
                Some(PollMsg::Records { realm, alias, records }) => {
                    assert_eq!(realm, "event");
                    assert_eq!(alias, "counting");
                    assert_eq!(records[0].id(), Some(expected));
                    assert_eq!(records[0].get_str(fields::SOURCE), Some("counting"));
                }
                other => panic!("unexpected message: {other:?}"),
            }
        }
        assert!(calls.load(Ordering::SeqCst) >= 2);
    }

    #[tokio::test]
    async fn reports_fetch_errors() {
        let registry = Arc::new(SourceRegistry::new().with(Failing));

        let mut rx = spawn(registry, vec!["vacancy".into()], POLL_INTERVAL);

        match rx.recv().await {
            Some(PollMsg::Error { realm, alias, message }) => {
                assert_eq!(realm, "vacancy");
                assert_eq!(alias, "down");
                assert!(message.contains("503"));
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn stops_when_receiver_is_dropped() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Arc::new(SourceRegistry::new().with(Counting {
            calls: Arc::clone(&calls),
        }));

        let mut rx = spawn(Arc::clone(&registry), vec!["event".into()], Duration::from_millis(5));
        rx.recv().await;
        drop(rx);

        // Give the task a few ticks to notice, then make sure it let go of the registry.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(Arc::strong_count(&registry), 1);
    }

    #[tokio::test]
    async fn stops_without_sources_when_receiver_is_dropped() {
        let registry = Arc::new(SourceRegistry::new());

        let rx = spawn(Arc::clone(&registry), vec!["event".into()], Duration::from_millis(5));
        drop(rx);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(Arc::strong_count(&registry), 1, "poller task should have exited");
    }
}
