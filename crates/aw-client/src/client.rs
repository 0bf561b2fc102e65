//! Read-through service client
//!
//! A call is answered from the cache when its fingerprint is present there;
//! otherwise it goes through the transport and, once the response decodes,
//! the raw bytes are cached. Every call is recorded in [`CallStats`].

use std::sync::Arc;
use std::time::Instant;

use aw_protocol::{CodecError, Page, PolymorphicCodec, SharedGroup};
use tracing::{debug, warn};

use crate::cache::ContentCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::fingerprint::Fingerprint;
use crate::stats::{CacheTier, CallStats};
use crate::transport::Transport;

/// One call to a service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRequest {
    service: String,
    endpoint: String,
    operation: String,
    body: Vec<u8>,
    key: Vec<Vec<u8>>,
}

impl ServiceRequest {
    /// Request keyed on service, operation and body
    pub fn new(
        service: impl Into<String>,
        endpoint: impl Into<String>,
        operation: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        let service = service.into();
        let operation = operation.into();
        let body = body.into();
        let key = vec![
            service.clone().into_bytes(),
            operation.clone().into_bytes(),
            body.clone(),
        ];
        Self {
            service,
            endpoint: endpoint.into(),
            operation,
            body,
            key,
        }
    }

    /// Replace the cache key parts, e.g. with selector parameters instead of the raw body
    pub fn with_key_parts<I, S>(mut self, parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Vec<u8>>,
    {
        self.key = parts.into_iter().map(Into::into).collect();
        self
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn key_parts(&self) -> &[Vec<u8>] {
        &self.key
    }

    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::of(&self.key)
    }
}

/// Service client with a read-through response cache
pub struct ServiceClient<T> {
    transport: T,
    cache: Arc<ContentCache>,
    stats: Arc<CallStats>,
    config: ClientConfig,
}

impl<T: Transport> ServiceClient<T> {
    /// Client with its own cache and statistics
    pub fn new(transport: T, config: ClientConfig) -> Self {
        let cache = Arc::new(ContentCache::new(config.cache.clone()));
        Self::with_shared(transport, cache, Arc::new(CallStats::new()), config)
    }

    /// Client sharing a cache and statistics with other clients
    pub fn with_shared(
        transport: T,
        cache: Arc<ContentCache>,
        stats: Arc<CallStats>,
        config: ClientConfig,
    ) -> Self {
        Self {
            transport,
            cache,
            stats,
            config,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub fn stats(&self) -> &Arc<CallStats> {
        &self.stats
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Perform `request`, decoding the response with `decode`
    ///
    /// Only responses that decode are cached, unless
    /// [`ClientConfig::store_on_decode_error`] is set. Transport failures are
    /// not recorded in the statistics.
    pub async fn call<R, F>(&self, request: &ServiceRequest, decode: F) -> Result<R, ClientError>
    where
        F: FnOnce(&[u8]) -> Result<R, CodecError>,
    {
        let key = request.fingerprint();
        let started = Instant::now();

        if let Some(hit) = self.cache.lookup(&key) {
            self.stats.record(&request.service, hit.tier, started.elapsed());
            return decode(&hit.payload).map_err(ClientError::from);
        }

        debug!(
            "Calling {}.{} ({})",
            request.service, request.operation, request.endpoint
        );
        let payload = self
            .transport
            .request(&request.endpoint, &request.operation, request.body.clone())
            .await?;
        self.stats
            .record(&request.service, CacheTier::Miss, started.elapsed());

        match decode(&payload) {
            Ok(value) => {
                self.cache.store(key, payload);
                Ok(value)
            }
            Err(e) => {
                if self.config.store_on_decode_error {
                    self.cache.store(key, payload);
                }
                warn!(
                    "Failed to decode {}.{} response: {}",
                    request.service, request.operation, e
                );
                Err(e.into())
            }
        }
    }

    /// Perform `request` and return the raw response body
    pub async fn fetch(&self, request: &ServiceRequest) -> Result<Vec<u8>, ClientError> {
        self.call(request, |payload| Ok(payload.to_vec())).await
    }

    /// Perform a `get` and decode its result page with `codec`
    pub async fn get_page<G: SharedGroup>(
        &self,
        request: &ServiceRequest,
        codec: &PolymorphicCodec<G>,
    ) -> Result<Page<G>, ClientError> {
        self.call(request, |payload| codec.decode_page(payload)).await
    }

    /// Persist cached responses to disk
    pub fn flush_cache(&self) -> Result<usize, ClientError> {
        self.cache.flush().map_err(|e| {
            warn!("Failed to flush response cache: {}", e);
            ClientError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheConfig;
    use crate::error::TransportError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct EchoTransport {
        calls: AtomicUsize,
        response: Result<Vec<u8>, TransportError>,
    }

    impl EchoTransport {
        fn ok(response: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(response.as_bytes().to_vec()),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(TransportError::new("quota exceeded")),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Transport for EchoTransport {
        async fn request(
            &self,
            _endpoint: &str,
            _operation: &str,
            _body: Vec<u8>,
        ) -> Result<Vec<u8>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.response.clone()
        }
    }

    fn config(dir: &std::path::Path) -> ClientConfig {
        ClientConfig {
            cache: CacheConfig::in_dir(dir),
            ..Default::default()
        }
    }

    fn request() -> ServiceRequest {
        ServiceRequest::new(
            "CampaignService",
            "https://adwords.example/api/CampaignService",
            "get",
            "<get><selector/></get>",
        )
    }

    fn parse_len(payload: &[u8]) -> Result<usize, CodecError> {
        if payload.starts_with(b"<") {
            Ok(payload.len())
        } else {
            Err(CodecError::malformed("rval", "not XML"))
        }
    }

    #[test]
    fn test_request_key_defaults_to_service_operation_body() {
        let request = request();
        assert_eq!(
            request.key_parts(),
            &[
                b"CampaignService".to_vec(),
                b"get".to_vec(),
                b"<get><selector/></get>".to_vec()
            ]
        );
        let rekeyed = request.clone().with_key_parts(["CampaignService", "get", "Id,Name"]);
        assert_ne!(request.fingerprint(), rekeyed.fingerprint());
        assert_eq!(rekeyed.body(), request.body());
    }

    #[test]
    fn test_non_utf8_bodies_get_distinct_keys() {
        let a = ServiceRequest::new("S", "e", "get", vec![b'<', 0xff, b'>']);
        let b = ServiceRequest::new("S", "e", "get", vec![b'<', 0xfe, b'>']);
        assert_ne!(a.body(), b.body());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[tokio::test]
    async fn test_second_call_served_from_memory() {
        let dir = tempfile::tempdir().unwrap();
        let client = ServiceClient::new(EchoTransport::ok("<rval/>"), config(dir.path()));

        assert_eq!(client.call(&request(), parse_len).await.unwrap(), 7);
        assert_eq!(client.call(&request(), parse_len).await.unwrap(), 7);
        assert_eq!(client.transport().calls(), 1);

        let stats = client.stats().snapshot();
        assert_eq!(stats.global.requests, 2);
        assert_eq!(stats.global.mem_cached, 1);
        assert_eq!(stats.service("CampaignService").unwrap().cached, 1);
    }

    #[tokio::test]
    async fn test_flushed_response_served_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let client = ServiceClient::new(EchoTransport::ok("<rval/>"), config(dir.path()));

        client.fetch(&request()).await.unwrap();
        assert_eq!(client.flush_cache().unwrap(), 1);
        assert_eq!(client.fetch(&request()).await.unwrap(), b"<rval/>");

        let stats = client.stats().snapshot();
        assert_eq!(stats.global.cached, 1);
        assert_eq!(stats.global.mem_cached, 0);
        assert_eq!(client.transport().calls(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_response_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let client = ServiceClient::new(EchoTransport::ok("garbage"), config(dir.path()));

        let err = client.call(&request(), parse_len).await.unwrap_err();
        assert!(matches!(err, ClientError::Codec(_)));
        assert_eq!(client.cache().memory_len(), 0);
        assert_eq!(client.stats().snapshot().global.requests, 1);
    }

    #[tokio::test]
    async fn test_store_on_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig {
            store_on_decode_error: true,
            ..config(dir.path())
        };
        let client = ServiceClient::new(EchoTransport::ok("garbage"), config);

        assert!(client.call(&request(), parse_len).await.is_err());
        assert_eq!(client.cache().memory_len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let client = ServiceClient::new(EchoTransport::failing(), config(dir.path()));

        let err = client.fetch(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(ref e) if e.message() == "quota exceeded"));
        assert_eq!(client.stats().snapshot().global.requests, 0);
        assert_eq!(client.cache().memory_len(), 0);
    }

    #[tokio::test]
    async fn test_paused_cache_always_calls_transport() {
        let dir = tempfile::tempdir().unwrap();
        let client = ServiceClient::new(EchoTransport::ok("<rval/>"), config(dir.path()));
        client.cache().pause();

        client.fetch(&request()).await.unwrap();
        client.fetch(&request()).await.unwrap();
        assert_eq!(client.transport().calls(), 2);
        assert_eq!(client.stats().snapshot().global.cached, 0);
    }
}
