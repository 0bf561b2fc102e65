//! Read-through response cache and call statistics for SOAP service calls
//!
//! [`ServiceClient`] sits between callers and an opaque [`Transport`]. Each
//! request is fingerprinted from its key parts; the [`ContentCache`] answers
//! repeated requests from memory or from files written by an explicit flush,
//! and [`CallStats`] tracks how often and how fast that happens.
//!
//! ```rust,no_run
//! use aw_client::{CacheConfig, ContentCache};
//!
//! let cache = ContentCache::new(CacheConfig::in_dir("/tmp/adwire"));
//! let key = ["AdGroupAdService", "get", "<selector/>"];
//! cache.set(&key, b"<rval/>".to_vec());
//! assert_eq!(cache.get(&key), Some(b"<rval/>".to_vec()));
//! cache.flush().unwrap();
//! ```

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod stats;
pub mod transport;

pub use cache::{CacheHit, ContentCache};
pub use client::{ServiceClient, ServiceRequest};
pub use config::{default_cache_dir, CacheConfig, ClientConfig};
pub use error::{CacheError, ClientError, TransportError};
pub use fingerprint::Fingerprint;
pub use stats::{CacheTier, CallStats, StatCounter, StatsSnapshot};
pub use transport::Transport;
