//! Tests for the shared query cache and CachedEntityService
//!
//! These tests verify that:
//! - CachedEntityService still honours the EntityService contract
//! - Concurrent list calls issue a single upstream request
//! - The staleness window triggers a new upstream request
//! - A mutation made through one screen is visible to another screen
//! - A mutation landing during a fetch is not lost to the fetched snapshot

#[macro_use]
mod service_harness;

use service_harness::*;
use std::sync::atomic::Ordering;
use std::time::Duration;
use storedesk::prelude::*;

entity_service_tests!(CachedEntityService::<Widget, _>::new(
    InMemoryEntityService::<Widget>::new(),
    Arc::new(QueryCache::default()),
));

fn seeded() -> InMemoryEntityService<Widget> {
    InMemoryEntityService::from_records(vec![
        widget("1", "Anvil", 10.0),
        widget("2", "Bucket", 3.0),
    ])
}

// =============================================================================
// De-duplication
// =============================================================================

#[tokio::test]
async fn test_concurrent_lists_share_one_request() {
    let upstream = CountingService::new(seeded()).with_delay(Duration::from_millis(50));
    let calls = upstream.counter();
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let (a, b): (Result<Vec<Widget>>, Result<Vec<Widget>>) =
        tokio::join!(service.list(), service.list());

    assert_eq!(a.unwrap().len(), 2);
    assert_eq!(b.unwrap().len(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_many_concurrent_lists_share_one_request() {
    let upstream = CountingService::new(seeded()).with_delay(Duration::from_millis(20));
    let calls = upstream.counter();
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let results: Vec<Result<Vec<Widget>>> =
        futures::future::join_all((0..8).map(|_| service.list())).await;

    assert!(results.iter().all(|r| r.as_ref().is_ok_and(|w| w.len() == 2)));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_two_services_sharing_a_cache_share_one_request() {
    let cache = Arc::new(QueryCache::default());
    let first = CountingService::new(seeded()).with_delay(Duration::from_millis(50));
    let second = CountingService::new(seeded()).with_delay(Duration::from_millis(50));
    let (first_calls, second_calls) = (first.counter(), second.counter());

    let orders_screen = CachedEntityService::<Widget, _>::new(first, cache.clone());
    let dashboard_widget = CachedEntityService::<Widget, _>::new(second, cache.clone());

    let (a, b): (Result<Vec<Widget>>, Result<Vec<Widget>>) =
        tokio::join!(orders_screen.list(), dashboard_widget.list());
    a.unwrap();
    b.unwrap();

    assert_eq!(
        first_calls.load(Ordering::SeqCst) + second_calls.load(Ordering::SeqCst),
        1
    );
}

// =============================================================================
// Staleness
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_fresh_list_served_from_cache() {
    let upstream = CountingService::new(seeded());
    let calls = upstream.counter();
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let _: Vec<Widget> = service.list().await.unwrap();
    tokio::time::advance(Duration::from_secs(4 * 60)).await;
    let _: Vec<Widget> = service.list().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stale_list_refetched() {
    let upstream = CountingService::new(seeded());
    let calls = upstream.counter();
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let _: Vec<Widget> = service.list().await.unwrap();
    tokio::time::advance(Duration::from_secs(5 * 60 + 1)).await;
    let _: Vec<Widget> = service.list().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let upstream = CountingService::new(seeded());
    let calls = upstream.counter();
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let _: Vec<Widget> = service.list().await.unwrap();
    service.invalidate();
    let _: Vec<Widget> = service.list().await.unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let (base_url, _backend) = spawn_backend().await;
    let session = Session::in_memory();
    session.login("revoked").unwrap();
    let client = ApiClient::new(base_url, session).unwrap();
    let cache = Arc::new(QueryCache::default());
    let service = CachedEntityService::<Widget, _>::new(
        HttpEntityService::<Widget>::new(client, widget_endpoint()),
        cache.clone(),
    );

    assert!(service.list().await.is_err());
    assert!(!cache.is_fresh::<Widget>());
}

// =============================================================================
// Write-through
// =============================================================================

#[tokio::test]
async fn test_mutation_visible_to_other_screen() {
    let cache = Arc::new(QueryCache::default());
    let shared = seeded();
    let editor = CachedEntityService::<Widget, _>::new(shared.clone(), cache.clone());
    let upstream = CountingService::new(shared);
    let calls = upstream.counter();
    let viewer = CachedEntityService::<Widget, _>::new(upstream, cache.clone());

    let _: Vec<Widget> = viewer.list().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let created = editor
        .create(widget_payload("Chisel", 7.0, 4, true))
        .await
        .unwrap();
    editor
        .update("1", serde_json::json!({"name": "Anvil XL"}))
        .await
        .unwrap();
    editor.delete("2").await.unwrap();

    let seen: Vec<Widget> = viewer.list().await.unwrap();
    let names: Vec<&str> = seen.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Anvil XL", "Chisel"]);
    assert_eq!(seen[1].id(), created.id());

    // Served from the cache, not upstream
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_write_during_fetch_survives_snapshot() {
    let cache = Arc::new(QueryCache::default());
    let shared = seeded();
    let editor = CachedEntityService::<Widget, _>::new(shared.clone(), cache.clone());
    let viewer = CachedEntityService::<Widget, _>::new(
        CountingService::new(shared).with_delay(Duration::from_millis(50)),
        cache.clone(),
    );

    // The viewer reads upstream before the create lands and answers after it
    let (listed, created) = tokio::join!(viewer.list(), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        editor.create(widget_payload("Chisel", 7.0, 4, true)).await
    });
    assert_eq!(listed.unwrap().len(), 2);
    let created = created.unwrap();

    let seen: Vec<Widget> = viewer.list().await.unwrap();
    assert_eq!(seen.len(), 3);
    assert!(seen.iter().any(|w| w.id() == created.id()));
}

#[tokio::test]
async fn test_get_served_from_fresh_cache() {
    let upstream = CountingService::new(seeded());
    let service =
        CachedEntityService::<Widget, _>::new(upstream, Arc::new(QueryCache::default()));

    let _: Vec<Widget> = service.list().await.unwrap();
    let anvil: Option<Widget> = service.get("1").await.unwrap();
    assert_eq!(anvil.unwrap().name, "Anvil");
    assert!(service.get("404").await.unwrap().is_none());
}
