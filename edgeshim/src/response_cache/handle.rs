//! Handle given to response generators.

use std::sync::Arc;

use tokio::sync::watch;

use super::entry::ResponseEntry;
use super::error::ResponseCacheError;

/// Result shared with every waiter on a generation.
pub(crate) type Outcome = Result<Option<ResponseEntry>, ResponseCacheError>;

pub(crate) type OutcomeReceiver = watch::Receiver<Option<Outcome>>;

/// Lets a generator publish a value before it finishes.
///
/// The first value published wins: once a generation is resolved, later
/// calls to [`resolve`](Self::resolve) return `false`. When the generator
/// then returns successfully its entry replaces the early value, so callers
/// joining the generation afterwards see the latest entry. Cloning shares
/// the same slot.
#[derive(Clone)]
pub struct ResolutionHandle {
    slot: Arc<watch::Sender<Option<Outcome>>>,
}

impl ResolutionHandle {
    pub(crate) fn channel() -> (Self, OutcomeReceiver) {
        let (tx, rx) = watch::channel(None);
        (Self { slot: Arc::new(tx) }, rx)
    }

    /// Whether a value has already been published to waiters.
    pub fn has_resolved(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Publish `entry` to every current and late waiter.
    ///
    /// Returns `false` if the generation was already resolved.
    pub fn resolve(&self, entry: Option<ResponseEntry>) -> bool {
        self.settle(Ok(entry))
    }

    /// Replace an already published success with `outcome`.
    ///
    /// Returns `false` and leaves the slot alone if nothing was published yet
    /// or the published outcome is an error.
    pub(crate) fn refresh(&self, outcome: &Outcome) -> bool {
        self.slot.send_if_modified(|slot| match slot {
            Some(Ok(_)) => {
                *slot = Some(outcome.clone());
                true
            }
            _ => false,
        })
    }

    pub(crate) fn settle(&self, outcome: Outcome) -> bool {
        let mut outcome = Some(outcome);
        self.slot.send_if_modified(|slot| {
            if slot.is_some() {
                return false;
            }
            *slot = outcome.take();
            true
        })
    }
}

impl std::fmt::Debug for ResolutionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionHandle")
            .field("resolved", &self.has_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response_cache::entry::ResponseValue;

    fn entry(location: &str) -> ResponseEntry {
        ResponseEntry::new(ResponseValue::Redirect {
            location: location.to_string(),
            permanent: true,
        })
    }

    #[test]
    fn test_first_resolution_wins() {
        let (handle, rx) = ResolutionHandle::channel();
        assert!(!handle.has_resolved());

        assert!(handle.resolve(Some(entry("/first"))));
        assert!(handle.has_resolved());
        assert!(!handle.resolve(Some(entry("/second"))));

        let published = rx.borrow().clone();
        assert_eq!(published.unwrap().unwrap(), Some(entry("/first")));
    }

    #[test]
    fn test_clones_share_the_slot() {
        let (handle, _rx) = ResolutionHandle::channel();
        let clone = handle.clone();
        clone.resolve(None);
        assert!(handle.has_resolved());
    }

    #[tokio::test]
    async fn test_waiter_sees_value_published_before_it_subscribed() {
        let (handle, rx) = ResolutionHandle::channel();
        handle.resolve(Some(entry("/early")));

        let mut late = rx.clone();
        let seen = late.wait_for(Option::is_some).await.unwrap().clone();
        assert!(matches!(seen, Some(Ok(Some(_)))));
    }

    #[test]
    fn test_refresh_replaces_published_success() {
        let (handle, rx) = ResolutionHandle::channel();
        assert!(!handle.refresh(&Ok(Some(entry("/fresh")))));
        assert!(rx.borrow().is_none());

        handle.resolve(Some(entry("/stale")));
        assert!(handle.refresh(&Ok(Some(entry("/fresh")))));

        let published = rx.borrow().clone();
        assert_eq!(published.unwrap().unwrap(), Some(entry("/fresh")));
    }

    #[test]
    fn test_refresh_keeps_published_error() {
        let (handle, rx) = ResolutionHandle::channel();
        handle.settle(Err(ResponseCacheError::Abandoned {
            key: "/x-0".to_string(),
        }));
        assert!(!handle.refresh(&Ok(None)));
        assert!(matches!(*rx.borrow(), Some(Err(_))));
    }

    #[tokio::test]
    async fn test_dropping_unresolved_handle_closes_channel() {
        let (handle, mut rx) = ResolutionHandle::channel();
        drop(handle);
        assert!(rx.wait_for(Option::is_some).await.is_err());
    }
}
