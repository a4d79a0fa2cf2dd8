//! Adapters layer: HTTP, scripted and simulated JSON-RPC transports.

pub mod http;
pub mod mock_chain;
pub mod scripted;

pub use http::HttpTransport;
pub use mock_chain::MockChain;
pub use scripted::ScriptedTransport;
