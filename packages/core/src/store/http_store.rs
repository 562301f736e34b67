//! HTTP-backed tag store
//!
//! Every call goes through the [`UpstreamResolver`], so each request finds a
//! live instance on its own. Reads only ever see success bodies; writes may
//! come back with a store-side error body, which is surfaced unchanged as
//! [`StoreError::UpstreamRejected`].

use super::{StoreError, TagStore};
use crate::models::{NewTag, TagId, TagRecord, TagUpdate};
use crate::upstream::{
    HttpTransport, ReqwestTransport, UpstreamConfig, UpstreamRequest, UpstreamResolver,
    UpstreamResponse,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

const TAGS_PATH: &str = "/tags";

/// [`TagStore`] client for the remote tag service
pub struct HttpTagStore<T = ReqwestTransport>
where
    T: HttpTransport,
{
    resolver: UpstreamResolver<T>,
}

impl HttpTagStore<ReqwestTransport> {
    /// Create a store client with a reqwest transport
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, StoreError> {
        Ok(Self::new(UpstreamResolver::from_config(config)?))
    }
}

impl<T> HttpTagStore<T>
where
    T: HttpTransport,
{
    pub fn new(resolver: UpstreamResolver<T>) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &UpstreamResolver<T> {
        &self.resolver
    }

    async fn write(&self, request: UpstreamRequest) -> Result<UpstreamResponse, StoreError> {
        let resolved = self.resolver.execute(&request).await?;
        let response = resolved.response;

        if !response.is_success() {
            let body = response
                .json_body()
                .unwrap_or_else(|_| Value::String(response.body.clone()));
            debug!(
                "{} rejected by {}{} with status {}",
                request.describe(),
                resolved.origin,
                resolved.prefix,
                response.status
            );
            return Err(StoreError::UpstreamRejected {
                status: response.status,
                body,
            });
        }

        Ok(response)
    }
}

fn decode<D: DeserializeOwned>(response: &UpstreamResponse, what: &str) -> Result<D, StoreError> {
    response
        .decode()
        .map_err(|e| StoreError::invalid_response(format!("{}: {}", what, e)))
}

fn tag_path(id: TagId) -> String {
    format!("{}/{}", TAGS_PATH, id)
}

#[async_trait]
impl<T> TagStore for HttpTagStore<T>
where
    T: HttpTransport,
{
    async fn list_tags(&self) -> Result<Vec<TagRecord>, StoreError> {
        let resolved = self.resolver.execute(&UpstreamRequest::get(TAGS_PATH)).await?;
        decode(&resolved.response, "expected an array of tags")
    }

    async fn create_tag(&self, tag: NewTag) -> Result<TagRecord, StoreError> {
        let body = serde_json::to_value(&tag)?;
        let response = self.write(UpstreamRequest::post(TAGS_PATH, body)).await?;
        decode(&response, "expected the created tag")
    }

    async fn update_tag(&self, id: TagId, update: TagUpdate) -> Result<TagRecord, StoreError> {
        let body = serde_json::to_value(&update)?;
        let response = self.write(UpstreamRequest::patch(tag_path(id), body)).await?;
        decode(&response, "expected the updated tag")
    }

    async fn delete_tag(&self, id: TagId) -> Result<(), StoreError> {
        self.write(UpstreamRequest::delete(tag_path(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::TransportError;
    use serde_json::json;
    use std::sync::Mutex;

    /// Answers every request with the same response and records what was sent
    struct FixedTransport {
        response: UpstreamResponse,
        sent: Mutex<Vec<(String, UpstreamRequest)>>,
    }

    impl FixedTransport {
        fn new(response: UpstreamResponse) -> Self {
            Self {
                response,
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn send(
            &self,
            url: &str,
            request: &UpstreamRequest,
        ) -> Result<UpstreamResponse, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push((url.to_string(), request.clone()));
            Ok(self.response.clone())
        }
    }

    fn store(response: UpstreamResponse) -> HttpTagStore<FixedTransport> {
        let config = UpstreamConfig::default()
            .without_fallbacks()
            .with_origins(["http://tags.test"])
            .with_service_prefix(None);
        HttpTagStore::new(UpstreamResolver::new(&config, FixedTransport::new(response)))
    }

    fn sent(store: &HttpTagStore<FixedTransport>) -> Vec<(String, UpstreamRequest)> {
        store.resolver().transport().sent.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_list_decodes_nested_records() {
        let store = store(UpstreamResponse::json(
            200,
            &json!([{"id": 1, "name": "Finance", "children": [{"id": 2, "name": "Tax", "parent_id": 1}]}]),
        ));

        let records = store.list_tags().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].children[0].id, 2);
        assert_eq!(sent(&store)[0].0, "http://tags.test/tags");
    }

    #[tokio::test]
    async fn test_list_rejects_unexpected_shape() {
        let store = store(UpstreamResponse::json(200, &json!({"items": []})));
        let err = store.list_tags().await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_write_error_body_is_forwarded_verbatim() {
        let body = json!({"detail": "Tag name already exists"});
        let store = store(UpstreamResponse::json(409, &body));

        let err = store
            .create_tag(NewTag {
                tag_name: "Finance".to_string(),
                parent_id: None,
                parent_path: None,
            })
            .await
            .unwrap_err();

        match err {
            StoreError::UpstreamRejected { status, body: got } => {
                assert_eq!(status, 409);
                assert_eq!(got, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_sends_explicit_null_parent() {
        let store = store(UpstreamResponse::json(
            200,
            &json!({"id": 4, "name": "Moved", "parent_id": null}),
        ));

        let record = store.update_tag(4, TagUpdate::reparent(None)).await.unwrap();
        assert_eq!(record.parent_id, None);

        let (url, request) = sent(&store).remove(0);
        assert_eq!(url, "http://tags.test/tags/4");
        assert_eq!(request.body, Some(json!({"parent_id": null})));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_no_content() {
        let store = store(UpstreamResponse::new(204, None, ""));
        store.delete_tag(9).await.unwrap();
        assert_eq!(sent(&store)[0].1.describe(), "DELETE /tags/9");
    }

    #[tokio::test]
    async fn test_update_error_body_is_forwarded_verbatim() {
        let body = json!({"code": "TAG_NOT_FOUND", "message": "no tag 41"});
        let store = store(UpstreamResponse::json(404, &body));

        let err = store
            .update_tag(41, TagUpdate::rename("Bills"))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert!(matches!(err, StoreError::UpstreamRejected { body: ref got, .. } if *got == body));
        assert_eq!(sent(&store)[0].1.describe(), "PATCH /tags/41");
    }

    #[tokio::test]
    async fn test_delete_error_body_is_forwarded_verbatim() {
        let body = json!({"detail": "tag is in use"});
        let store = store(UpstreamResponse::json(409, &body));

        match store.delete_tag(3).await.unwrap_err() {
            StoreError::UpstreamRejected { status, body: got } => {
                assert_eq!(status, 409);
                assert_eq!(got, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_with_html_success_body_keeps_probing() {
        let store = store(UpstreamResponse::new(200, Some("text/html"), "<p>deleted</p>"));

        let err = store.delete_tag(3).await.unwrap_err();

        assert!(err.is_unreachable());
        // The only candidate was tried once and rejected
        assert_eq!(sent(&store).len(), 1);
    }
}
