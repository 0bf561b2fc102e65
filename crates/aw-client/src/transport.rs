//! Boundary to the authenticated SOAP transport

use std::future::Future;
use std::sync::Arc;

use crate::error::TransportError;

/// Performs one SOAP call and returns the raw response body
///
/// Implementations own authentication, envelopes on the wire, retries and
/// rate limiting. The client only sees bytes in and bytes out.
pub trait Transport: Send + Sync {
    fn request(
        &self,
        endpoint: &str,
        operation: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn request(
        &self,
        endpoint: &str,
        operation: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send {
        (**self).request(endpoint, operation, body)
    }
}
