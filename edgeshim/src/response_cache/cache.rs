//! [`ResponseCache`]: request coalescing plus the previous-item window.

use std::future::Future;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::entry::{CacheContext, ResponseEntry};
use super::error::{GenerationError, ResponseCacheError};
use super::handle::{Outcome, OutcomeReceiver, ResolutionHandle};
use super::stats::{ResponseCacheStats, StatsCounters};
use crate::config::ResponseCacheConfig;
use crate::log::{Logger, TracingLogger};
use crate::log_error;

/// The most recent revalidatable entry and when it stops being served.
#[derive(Debug, Clone)]
struct PreviousCacheItem {
    key: String,
    entry: ResponseEntry,
    /// `None` when the window is too large to represent as an instant
    expires_at: Option<Instant>,
}

struct Inner {
    /// In-flight generations: effective key -> outcome receiver
    pending: DashMap<String, OutcomeReceiver>,
    previous: Mutex<Option<PreviousCacheItem>>,
    config: ResponseCacheConfig,
    logger: Arc<dyn Logger>,
    stats: StatsCounters,
}

/// Single-flight cache in front of a response generator.
///
/// Cloning is cheap and clones share all state.
///
/// # Example
///
/// ```
/// use edgeshim::config::ResponseCacheConfig;
/// use edgeshim::response_cache::{CacheContext, ResponseCache, ResponseEntry, ResponseValue, Revalidate};
///
/// # let runtime = tokio::runtime::Runtime::new().unwrap();
/// # runtime.block_on(async {
///     let cache = ResponseCache::new(ResponseCacheConfig::default());
///     let entry = cache
///         .get(
///             Some("/about"),
///             |_handle| async {
///                 let value = ResponseValue::Redirect { location: "/".into(), permanent: false };
///                 Ok(Some(ResponseEntry::new(value).with_revalidate(Revalidate::Seconds(10))))
///             },
///             CacheContext::default(),
///         )
///         .await
///         .unwrap()
///         .unwrap();
///     assert!(entry.is_miss);
/// # });
/// ```
#[derive(Clone)]
pub struct ResponseCache {
    inner: Arc<Inner>,
}

impl ResponseCache {
    /// Cache that reports background failures through `tracing`.
    pub fn new(config: ResponseCacheConfig) -> Self {
        Self::with_logger(config, Arc::new(TracingLogger))
    }

    pub fn with_logger(config: ResponseCacheConfig, logger: Arc<dyn Logger>) -> Self {
        Self {
            inner: Arc::new(Inner {
                pending: DashMap::new(),
                previous: Mutex::new(None),
                config,
                logger,
                stats: StatsCounters::default(),
            }),
        }
    }

    /// Get the response for `key`, generating it at most once per burst.
    ///
    /// - A pending generation for the same key (and revalidation mode) is
    ///   joined rather than duplicated.
    /// - Otherwise an unexpired previous item for the key is returned without
    ///   calling `generate`.
    /// - Otherwise `generate` runs on a spawned task and every waiter gets the
    ///   first value it publishes, either through [`ResolutionHandle::resolve`]
    ///   or by returning.
    ///
    /// With `key = None` the generator always runs and nothing is shared or
    /// remembered.
    ///
    /// # Errors
    ///
    /// [`ResponseCacheError::Generation`] if the generator failed before
    /// publishing, [`ResponseCacheError::Abandoned`] if its task panicked.
    pub async fn get<F, Fut>(
        &self,
        key: Option<&str>,
        generate: F,
        context: CacheContext,
    ) -> Result<Option<ResponseEntry>, ResponseCacheError>
    where
        F: FnOnce(ResolutionHandle) -> Fut + Send + 'static,
        Fut: Future<Output = Result<Option<ResponseEntry>, GenerationError>> + Send + 'static,
    {
        self.inner.stats.record_request();

        let Some(key) = key else {
            self.inner.stats.record_uncached();
            debug!(prefetch = context.is_prefetch, "Generating uncached response");
            let (handle, rx) = ResolutionHandle::channel();
            spawn_generation(Arc::clone(&self.inner), None, handle, generate);
            return wait_for_outcome(rx, "<uncached>").await;
        };

        let pending_key = effective_key(key, context.is_manual_revalidate);

        // Check-and-register under the shard lock so only one caller starts
        // the generation.
        let rx = match self.inner.pending.entry(pending_key.clone()) {
            Entry::Occupied(entry) => {
                let coalesced = self.inner.stats.record_coalesced();
                debug!(key = %pending_key, coalesced, "Joining in-flight generation");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                if let Some(hit) = self.inner.previous_hit(&pending_key) {
                    self.inner.stats.record_previous_hit();
                    debug!(key = %pending_key, "Serving previous item");
                    return Ok(Some(hit));
                }

                let (handle, rx) = ResolutionHandle::channel();
                entry.insert(rx.clone());
                self.inner.stats.record_generation();
                debug!(
                    key = %pending_key,
                    in_flight = self.inner.pending.len(),
                    manual = context.is_manual_revalidate,
                    "Starting generation"
                );

                let registration = Registration {
                    key: pending_key.clone(),
                    rx: rx.clone(),
                };
                spawn_generation(
                    Arc::clone(&self.inner),
                    Some(registration),
                    handle,
                    generate,
                );
                rx
            }
        };

        wait_for_outcome(rx, &pending_key).await
    }

    /// Number of generations currently in flight.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn stats(&self) -> ResponseCacheStats {
        self.inner.stats.snapshot()
    }

    pub fn config(&self) -> &ResponseCacheConfig {
        &self.inner.config
    }

    /// Logs current statistics.
    pub fn log_stats(&self) {
        let stats = self.stats();
        info!(
            total_requests = stats.total_requests,
            coalesced = stats.coalesced_requests,
            previous_item_hits = stats.previous_item_hits,
            generations = stats.generations,
            uncached = stats.uncached_generations,
            failures = stats.generation_failures,
            background_failures = stats.background_failures,
            in_flight = self.pending_count(),
            coalescing_ratio = format!("{:.1}%", stats.coalescing_ratio() * 100.0),
            "Response cache statistics"
        );
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.inner.config)
            .field("pending", &self.inner.pending.len())
            .finish_non_exhaustive()
    }
}

impl Inner {
    fn previous_hit(&self, key: &str) -> Option<ResponseEntry> {
        let slot = self.previous.lock();
        slot.as_ref()
            .filter(|item| item.key == key && item.expires_at.map_or(true, |at| Instant::now() < at))
            .map(|item| item.entry.clone())
    }

    /// Store `entry` as the previous item, or clear this key's item when the
    /// entry does not revalidate.
    fn remember(&self, key: &str, entry: Option<&ResponseEntry>) {
        let mut slot = self.previous.lock();
        match entry {
            Some(entry) if entry.declares_revalidate() => {
                *slot = Some(PreviousCacheItem {
                    key: key.to_string(),
                    entry: entry.clone().into_stored(),
                    expires_at: Instant::now().checked_add(self.config.previous_item_ttl()),
                });
            }
            _ => {
                if slot.as_ref().is_some_and(|item| item.key == key) {
                    *slot = None;
                }
            }
        }
    }
}

/// A pending-map entry owned by one generation.
struct Registration {
    key: String,
    rx: OutcomeReceiver,
}

/// Owns a generation's pending entry. The entry is released explicitly
/// before waiters are woken; dropping the guard releases it on panic.
struct PendingGuard {
    inner: Arc<Inner>,
    registration: Registration,
}

impl PendingGuard {
    /// Remove the pending entry unless a newer generation has replaced it.
    fn release(&self) {
        let Registration { key, rx } = &self.registration;
        self.inner
            .pending
            .remove_if(key, |_, current| current.same_channel(rx));
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.release();
    }
}

fn effective_key(key: &str, manual_revalidate: bool) -> String {
    format!("{}-{}", key, if manual_revalidate { 1 } else { 0 })
}

fn spawn_generation<F, Fut>(
    inner: Arc<Inner>,
    registration: Option<Registration>,
    handle: ResolutionHandle,
    generate: F,
) where
    F: FnOnce(ResolutionHandle) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Option<ResponseEntry>, GenerationError>> + Send + 'static,
{
    tokio::spawn(async move {
        let remember_key = registration.as_ref().map(|r| r.key.clone());
        let guard = registration.map(|registration| PendingGuard {
            inner: Arc::clone(&inner),
            registration,
        });

        let result = generate(handle.clone()).await;

        // The pending entry is gone before any waiter wakes, so a waiter's
        // follow-up call starts a fresh generation or hits the previous item.
        match result {
            Ok(entry) => {
                if let Some(key) = &remember_key {
                    inner.remember(key, entry.as_ref());
                }
                let outcome: Outcome = Ok(entry.map(ResponseEntry::into_miss));
                let refreshed = handle.refresh(&outcome);
                if let Some(guard) = &guard {
                    guard.release();
                }
                if !refreshed {
                    handle.settle(outcome);
                }
            }
            Err(err) => {
                let err: Arc<dyn std::error::Error + Send + Sync> = Arc::from(err);
                let key = remember_key.as_deref().unwrap_or("<uncached>");
                if let Some(guard) = &guard {
                    guard.release();
                }
                if handle.settle(Err(ResponseCacheError::Generation(Arc::clone(&err)))) {
                    inner.stats.record_failure();
                    debug!(key, error = %err, "Generation failed");
                } else {
                    inner.stats.record_background_failure();
                    log_error!(
                        inner.logger,
                        "background regeneration for {} failed after resolving: {}",
                        key,
                        err
                    );
                }
            }
        }
    });
}

async fn wait_for_outcome(mut rx: OutcomeReceiver, key: &str) -> Outcome {
    let outcome = match rx.wait_for(Option::is_some).await {
        Ok(outcome) => outcome.clone(),
        Err(_) => None,
    };
    outcome.unwrap_or_else(|| {
        Err(ResponseCacheError::Abandoned {
            key: key.to_string(),
        })
    })
}
