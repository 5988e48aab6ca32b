//! Integration tests for the response cache under a multi-threaded runtime.
//!
//! These tests verify:
//! - Exactly one generation per burst of concurrent requests
//! - Independent keys generate independently
//! - Pending entries are always cleaned up
//! - A caller's follow-up request never joins a generation that already
//!   finished

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use edgeshim::config::ResponseCacheConfig;
use edgeshim::response_cache::{
    CacheContext, GenerationError, ResolutionHandle, ResponseCache, ResponseEntry, ResponseValue,
    Revalidate,
};

fn route(body: &'static str) -> ResponseEntry {
    ResponseEntry::new(ResponseValue::Route {
        body: bytes::Bytes::from_static(body.as_bytes()),
        headers: Vec::new(),
        status: 200,
    })
    .with_revalidate(Revalidate::Seconds(1))
}

async fn slow_route(
    calls: Arc<AtomicUsize>,
    body: &'static str,
) -> Result<Option<ResponseEntry>, GenerationError> {
    calls.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    Ok(Some(route(body)))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_burst_generates_once() {
    let cache = ResponseCache::new(ResponseCacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let cache = cache.clone();
        let calls = Arc::clone(&calls);
        handles.push(tokio::spawn(async move {
            cache
                .get(
                    Some("/api/feed"),
                    move |_handle: ResolutionHandle| slow_route(calls, "feed"),
                    CacheContext::default(),
                )
                .await
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|r| r.unwrap().unwrap().unwrap())
        .collect();

    assert_eq!(calls.load(Ordering::SeqCst), 1, "exactly one generation");
    assert!(results.iter().all(|entry| *entry == results[0]));
    assert_eq!(cache.pending_count(), 0);

    let stats = cache.stats();
    assert_eq!(stats.total_requests, 32);
    assert_eq!(stats.generations, 1);
    assert_eq!(stats.coalesced_requests + stats.previous_item_hits, 31);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_keys_generate_independently() {
    let cache = ResponseCache::new(ResponseCacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    let mut handles = Vec::new();
    for id in 0..8 {
        for _ in 0..4 {
            let cache = cache.clone();
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                let key = format!("/products/{}", id);
                cache
                    .get(
                        Some(key.as_str()),
                        move |_handle: ResolutionHandle| slow_route(calls, "product"),
                        CacheContext::default(),
                    )
                    .await
            }));
        }
    }

    for result in futures::future::join_all(handles).await {
        assert!(result.unwrap().unwrap().is_some());
    }

    // previous item is a single slot, so later keys can evict earlier ones
    // but never cause a duplicate generation within a burst
    assert_eq!(calls.load(Ordering::SeqCst), 8);
    assert_eq!(cache.pending_count(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_generation_can_be_retried() {
    let cache = ResponseCache::new(ResponseCacheConfig::default());

    let failed = cache
        .get(
            Some("/flaky"),
            |_handle: ResolutionHandle| async {
                Err::<Option<ResponseEntry>, GenerationError>("first attempt".into())
            },
            CacheContext::default(),
        )
        .await;
    assert!(failed.is_err());

    let calls = Arc::new(AtomicUsize::new(0));
    let retried = cache
        .get(
            Some("/flaky"),
            {
                let calls = Arc::clone(&calls);
                move |_handle: ResolutionHandle| slow_route(calls, "ok")
            },
            CacheContext::default(),
        )
        .await
        .unwrap();
    assert!(retried.is_some());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

fn uncached_page(body: &'static str) -> ResponseEntry {
    ResponseEntry::new(ResponseValue::Route {
        body: bytes::Bytes::from_static(body.as_bytes()),
        headers: Vec::new(),
        status: 200,
    })
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_retry_immediately_after_failure_regenerates() {
    let cache = ResponseCache::new(ResponseCacheConfig::default());

    for i in 0..500 {
        let key = format!("/flaky/{}", i);
        let failed = cache
            .get(
                Some(key.as_str()),
                |_handle: ResolutionHandle| async {
                    Err::<Option<ResponseEntry>, GenerationError>("upstream down".into())
                },
                CacheContext::default(),
            )
            .await;
        assert!(failed.is_err());

        let calls = Arc::new(AtomicUsize::new(0));
        let retried = cache
            .get(
                Some(key.as_str()),
                {
                    let calls = Arc::clone(&calls);
                    move |_handle: ResolutionHandle| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Some(uncached_page("ok")))
                    }
                },
                CacheContext::default(),
            )
            .await;
        assert!(retried.is_ok(), "iteration {} returned the old error", i);
        assert_eq!(calls.load(Ordering::SeqCst), 1, "iteration {}", i);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_back_to_back_non_revalidating_requests_both_render() {
    let cache = ResponseCache::new(ResponseCacheConfig::default());
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..500 {
        for _ in 0..2 {
            let calls = Arc::clone(&calls);
            cache
                .get(
                    Some("/dashboard"),
                    move |_handle: ResolutionHandle| async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        Ok(Some(uncached_page("dashboard")))
                    },
                    CacheContext::default(),
                )
                .await
                .unwrap();
        }
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1000);
    assert_eq!(cache.stats().coalesced_requests, 0);
    assert_eq!(cache.pending_count(), 0);
}
