//! Comprehensive tests for TaxonomyService
//!
//! Tests cover:
//! - Local validation short-circuits (no store traffic)
//! - Write payloads (parent path, explicit null parent)
//! - Canonical refresh after every write
//! - Failure handling (failed write, failed refresh)

#[cfg(test)]
mod tests {
    use crate::models::{NewTag, TagId, TagRecord, TagTree, TagUpdate, Tier};
    use crate::services::error::{TaxonomyError, ValidationError};
    use crate::services::TaxonomyService;
    use crate::store::{InMemoryTagStore, StoreError, TagStore};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Wraps an in-memory store, recording every call and failing on demand
    struct RecordingStore {
        inner: InMemoryTagStore,
        calls: Mutex<Vec<String>>,
        created: Mutex<Vec<NewTag>>,
        updates: Mutex<Vec<(TagId, TagUpdate)>>,
        fail_writes: AtomicBool,
        fail_lists: AtomicBool,
    }

    impl RecordingStore {
        fn new(records: Vec<TagRecord>) -> Self {
            Self {
                inner: InMemoryTagStore::seeded(records),
                calls: Mutex::new(Vec::new()),
                created: Mutex::new(Vec::new()),
                updates: Mutex::new(Vec::new()),
                fail_writes: AtomicBool::new(false),
                fail_lists: AtomicBool::new(false),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &str) {
            self.calls.lock().unwrap().push(call.to_string());
        }

        fn write_guard(&self) -> Result<(), StoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StoreError::rejected(503, "UNAVAILABLE", "store is down"));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl TagStore for RecordingStore {
        async fn list_tags(&self) -> Result<Vec<TagRecord>, StoreError> {
            self.record("list");
            if self.fail_lists.load(Ordering::SeqCst) {
                return Err(StoreError::invalid_response("garbage"));
            }
            self.inner.list_tags().await
        }

        async fn create_tag(&self, tag: NewTag) -> Result<TagRecord, StoreError> {
            self.record("create");
            self.write_guard()?;
            self.created.lock().unwrap().push(tag.clone());
            self.inner.create_tag(tag).await
        }

        async fn update_tag(&self, id: TagId, update: TagUpdate) -> Result<TagRecord, StoreError> {
            self.record("update");
            self.write_guard()?;
            self.updates.lock().unwrap().push((id, update.clone()));
            self.inner.update_tag(id, update).await
        }

        async fn delete_tag(&self, id: TagId) -> Result<(), StoreError> {
            self.record("delete");
            self.write_guard()?;
            self.inner.delete_tag(id).await
        }
    }

    /// Finance(1) -> Invoices(2) -> 2024(3); Finance(1) -> Receipts(4); Legal(5)
    fn seed() -> Vec<TagRecord> {
        vec![
            TagRecord::new(1, "Finance", None),
            TagRecord::new(2, "Invoices", Some(1)),
            TagRecord::new(3, "2024", Some(2)),
            TagRecord::new(4, "Receipts", Some(1)),
            TagRecord::new(5, "Legal", None),
        ]
    }

    async fn setup() -> (TaxonomyService, Arc<RecordingStore>, TagTree) {
        let store = Arc::new(RecordingStore::new(seed()));
        let service = TaxonomyService::new(store.clone());
        let tree = service.load().await.unwrap();
        store.calls.lock().unwrap().clear();
        (service, store, tree)
    }

    #[tokio::test]
    async fn test_load_builds_tiers() {
        let (_service, _store, tree) = setup().await;
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.find(1).unwrap().tier, Tier::Primary);
        assert_eq!(tree.find(2).unwrap().tier, Tier::Secondary);
        assert_eq!(tree.find(3).unwrap().tier, Tier::Tertiary);
    }

    #[tokio::test]
    async fn test_empty_name_never_reaches_store() {
        let (service, store, tree) = setup().await;

        let err = service.create_tag(&tree, "", None).await.unwrap_err();
        assert_eq!(err.validation(), Some(&ValidationError::EmptyName));
        assert_eq!(err.validation().unwrap().to_string(), "name required");
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_structural_violations_never_reach_store() {
        let (service, store, tree) = setup().await;

        let err = service.create_tag(&tree, "Q1", Some(3)).await.unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::TertiaryParent { parent_id: 3 })
        );

        let err = service.move_tag(&tree, 1, Some(3)).await.unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::cyclic_reparent(1, 3))
        );

        let err = service.move_tag(&tree, 2, Some(2)).await.unwrap_err();
        assert!(err.is_validation());

        let err = service.delete_tag(&tree, 42).await.unwrap_err();
        assert_eq!(
            err.validation(),
            Some(&ValidationError::TagNotFound { tag_id: 42 })
        );

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_parent_path_and_refreshes() {
        let (service, store, tree) = setup().await;

        let outcome = service
            .create_tag(&tree, "  Q1  ", Some(2))
            .await
            .unwrap();

        let sent = store.created.lock().unwrap()[0].clone();
        assert_eq!(sent.tag_name, "Q1");
        assert_eq!(sent.parent_id, Some(2));
        assert_eq!(
            sent.parent_path,
            Some(vec!["Finance".to_string(), "Invoices".to_string()])
        );

        let created = outcome.tag.unwrap();
        let node = outcome.tree.find(created.id).unwrap();
        assert_eq!(node.tier, Tier::Tertiary);
        assert_eq!(store.calls(), vec!["create", "list"]);

        // Caller's tree untouched
        assert_eq!(tree.len(), 5);
    }

    #[tokio::test]
    async fn test_root_create_omits_parent_path() {
        let (service, store, tree) = setup().await;
        service.create_tag(&tree, "HR", None).await.unwrap();
        assert_eq!(store.created.lock().unwrap()[0].parent_path, None);
    }

    #[tokio::test]
    async fn test_rename_sends_only_the_name() {
        let (service, store, tree) = setup().await;

        let outcome = service.rename_tag(&tree, 4, "Bills").await.unwrap();
        assert_eq!(outcome.tree.find(4).unwrap().name, "Bills");
        assert_eq!(
            store.updates.lock().unwrap()[0],
            (4, TagUpdate::rename("Bills"))
        );
    }

    #[tokio::test]
    async fn test_move_to_root_sends_explicit_null() {
        let (service, store, tree) = setup().await;

        let outcome = service.move_tag(&tree, 2, None).await.unwrap();
        assert_eq!(store.updates.lock().unwrap()[0], (2, TagUpdate::reparent(None)));

        let moved = outcome.tree.find(2).unwrap();
        assert_eq!(moved.tier, Tier::Primary);
        assert_eq!(outcome.tree.find(3).unwrap().tier, Tier::Secondary);
    }

    #[tokio::test]
    async fn test_empty_update_is_not_sent() {
        let (service, store, tree) = setup().await;
        let outcome = service
            .update_tag(&tree, 2, TagUpdate::default())
            .await
            .unwrap();
        assert_eq!(outcome.tree, tree);
        assert!(outcome.tag.is_none());
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_subtree() {
        let (service, _store, tree) = setup().await;

        let outcome = service.delete_tag(&tree, 1).await.unwrap();
        assert_eq!(outcome.tree.len(), 1);
        assert!(outcome.tree.find(3).is_none());
        assert!(outcome.tag.is_none());
    }

    #[tokio::test]
    async fn test_failed_write_skips_refresh() {
        let (service, store, tree) = setup().await;
        store.fail_writes.store(true, Ordering::SeqCst);

        let err = service.create_tag(&tree, "HR", None).await.unwrap_err();
        match err {
            TaxonomyError::Store(store_err) => assert_eq!(store_err.status(), Some(503)),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.calls(), vec!["create"]);
        assert_eq!(tree.len(), 5);
    }

    #[tokio::test]
    async fn test_failed_refresh_reports_landed_write() {
        let (service, store, tree) = setup().await;
        store.fail_lists.store(true, Ordering::SeqCst);

        let err = service.create_tag(&tree, "HR", None).await.unwrap_err();
        assert!(matches!(err, TaxonomyError::RefreshFailed { .. }));

        // The write landed
        assert_eq!(store.inner.len().await, 6);
    }

    #[tokio::test]
    async fn test_refresh_picks_up_external_changes() {
        let (service, store, tree) = setup().await;

        // Another client adds a tag behind our back
        store
            .inner
            .create_tag(NewTag {
                tag_name: "Contracts".to_string(),
                parent_id: Some(5),
                parent_path: None,
            })
            .await
            .unwrap();

        let outcome = service.rename_tag(&tree, 5, "Legal & Compliance").await.unwrap();
        assert_eq!(outcome.tree.len(), 6);
        let legal = outcome.tree.find(5).unwrap();
        assert_eq!(legal.name, "Legal & Compliance");
        assert_eq!(legal.children[0].name, "Contracts");
    }

    #[tokio::test]
    async fn test_store_rejection_surfaces_when_local_tree_is_stale() {
        let (service, store, tree) = setup().await;

        // Someone else already created "HR"
        store
            .inner
            .create_tag(NewTag {
                tag_name: "HR".to_string(),
                parent_id: None,
                parent_path: None,
            })
            .await
            .unwrap();

        let err = service.create_tag(&tree, "hr", None).await.unwrap_err();
        match err {
            TaxonomyError::Store(store_err) => {
                assert_eq!(store_err.status(), Some(409));
                assert_eq!(store_err.rejection_code(), Some("DUPLICATE_SIBLING"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_search_is_local() {
        let store = Arc::new(RecordingStore::new(seed()));
        let service = TaxonomyService::new(store.clone());
        let tree = tokio_test::block_on(service.load()).unwrap();

        let hits = service.search(&tree, "2024");
        assert_eq!(hits.len(), 3);
        assert_eq!(service.search(&tree, ""), tree);
        assert_eq!(store.calls(), vec!["list"]);
    }
}
