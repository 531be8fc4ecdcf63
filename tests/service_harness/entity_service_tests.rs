//! Macro-generated test suite for `EntityService<Widget>` contract validation.
//!
//! The `entity_service_tests!` macro generates a test module that validates
//! any `EntityService<Widget>` implementation against the full contract:
//! CRUD operations, missing records and concurrent access.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod service_harness;
//!
//! use service_harness::*;
//!
//! entity_service_tests!(InMemoryEntityService::<Widget>::new());
//! entity_service_tests!(http_widgets().await);
//! ```
//!
//! # Generated Tests
//!
//! - `test_create_and_get`: create then retrieve, verify all fields
//! - `test_get_nonexistent`: get with an unknown id returns None
//! - `test_list_empty`: list on an empty store returns an empty vec
//! - `test_list_multiple`: create 5 records, list returns all 5 in order
//! - `test_update_existing`: partial update keeps untouched fields
//! - `test_update_nonexistent`: update of an unknown id returns Err
//! - `test_delete_existing`: delete then get returns None
//! - `test_delete_nonexistent`: delete of an unknown id (Ok or Err, both accepted)
//! - `test_concurrent_access`: parallel creates from spawned tasks

/// Generate a full `EntityService<Widget>` conformance test suite.
///
/// `$factory` must be an expression evaluating to a fresh, empty service. It
/// is evaluated inside each async test, so it may `.await`.
#[macro_export]
macro_rules! entity_service_tests {
    ($factory:expr) => {
        mod entity_service_contract_tests {
            use super::*;
            use std::sync::Arc;
            use storedesk::core::entity::Entity;
            use storedesk::core::service::EntityService;

            // ==================================================================
            // CRUD: Create & Get
            // ==================================================================

            #[tokio::test]
            async fn test_create_and_get() {
                let service = $factory;

                let created = service
                    .create(widget_payload("Alice", 4.5, 30, true))
                    .await
                    .unwrap();
                assert!(!created.id().is_empty());
                assert_eq!(created.name, "Alice");
                assert!((created.price - 4.5).abs() < f64::EPSILON);
                assert_eq!(created.stock, 30);
                assert!(created.active);
                assert_eq!(created.created_at, "2024-05-01T09:00:00Z");

                let retrieved = service.get(created.id()).await.unwrap();
                assert_eq!(retrieved, Some(created));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let service = $factory;
                assert!(service.get("does-not-exist").await.unwrap().is_none());
            }

            // ==================================================================
            // CRUD: List
            // ==================================================================

            #[tokio::test]
            async fn test_list_empty() {
                let service = $factory;
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_multiple() {
                let service = $factory;
                for i in 0..5 {
                    service
                        .create(widget_payload(&format!("W{}", i), 1.0 + i as f64, i, i % 2 == 0))
                        .await
                        .unwrap();
                }

                let names: Vec<String> = service
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|w| w.name)
                    .collect();
                assert_eq!(names, vec!["W0", "W1", "W2", "W3", "W4"]);
            }

            // ==================================================================
            // CRUD: Update
            // ==================================================================

            #[tokio::test]
            async fn test_update_existing() {
                let service = $factory;
                let created = service
                    .create(widget_payload("Before", 2.0, 1, true))
                    .await
                    .unwrap();

                let updated = service
                    .update(created.id(), serde_json::json!({"name": "After", "stock": 9}))
                    .await
                    .unwrap();
                assert_eq!(updated.id(), created.id());
                assert_eq!(updated.name, "After");
                assert_eq!(updated.stock, 9);
                assert!((updated.price - 2.0).abs() < f64::EPSILON);

                let retrieved = service.get(created.id()).await.unwrap().unwrap();
                assert_eq!(retrieved.name, "After");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let service = $factory;
                let result = service
                    .update("does-not-exist", serde_json::json!({"name": "x"}))
                    .await;
                assert!(result.is_err(), "Updating a missing record should fail");
            }

            // ==================================================================
            // CRUD: Delete
            // ==================================================================

            #[tokio::test]
            async fn test_delete_existing() {
                let service = $factory;
                let created = service
                    .create(widget_payload("Doomed", 1.0, 1, true))
                    .await
                    .unwrap();

                service.delete(created.id()).await.unwrap();
                assert!(service.get(created.id()).await.unwrap().is_none());
                assert!(service.list().await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let service = $factory;
                // Backends differ here: a 404 and a silent no-op are both acceptable
                let _ = service.delete("does-not-exist").await;
                assert!(service.list().await.unwrap().is_empty());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            /// Uses the multi-thread runtime so both creates really overlap.
            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn test_concurrent_access() {
                let service = Arc::new($factory);
                let s1 = service.clone();
                let s2 = service.clone();

                let h1 = tokio::spawn(async move {
                    s1.create(widget_payload("Concurrent_A", 1.0, 1, true)).await
                });
                let h2 = tokio::spawn(async move {
                    s2.create(widget_payload("Concurrent_B", 2.0, 2, false)).await
                });

                let (r1, r2) = tokio::time::timeout(std::time::Duration::from_secs(30), async {
                    tokio::try_join!(h1, h2).unwrap()
                })
                .await
                .expect("Concurrent creates timed out after 30s, possible deadlock");

                let a: Widget = r1.unwrap();
                let b: Widget = r2.unwrap();
                assert_ne!(a.id(), b.id());

                let all: Vec<Widget> = service.list().await.unwrap();
                assert_eq!(all.len(), 2, "Both concurrently created records should be present");
            }
        }
    };
}
