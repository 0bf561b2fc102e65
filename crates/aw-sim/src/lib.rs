//! Simulation layer for exercising service clients without a network
//!
//! - **ScriptedTransport**: a [`Transport`](aw_client::Transport) answering
//!   from canned responses, counting calls and optionally adding latency
//! - **fixtures**: SOAP response envelopes built from protocol values
//!
//! # Example
//!
//! ```rust
//! use aw_client::{CacheConfig, ClientConfig, ServiceClient, ServiceRequest};
//! use aw_sim::{fixtures, ScriptedTransport};
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let transport = ScriptedTransport::new();
//! transport.respond("get", fixtures::soap_response("get", "<rval/>"));
//!
//! let dir = std::env::temp_dir().join("aw-sim-doc");
//! let config = ClientConfig { cache: CacheConfig::in_dir(dir), ..Default::default() };
//! let client = ServiceClient::new(transport, config);
//!
//! let request = ServiceRequest::new("CampaignService", "https://sim/CampaignService", "get", "<get/>");
//! client.fetch(&request).await.unwrap();
//! client.fetch(&request).await.unwrap();
//! assert_eq!(client.transport().calls(), 1);
//! # });
//! ```

pub mod fixtures;
pub mod transport;

pub use transport::{RecordedRequest, ScriptedTransport};
