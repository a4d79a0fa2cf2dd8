//! # Scripted Transport
//!
//! An in-process transport that answers each method with a registered
//! handler and records every request. Used by tests and offline demos.

use crate::domain::errors::RpcError;
use crate::ports::outbound::RpcTransport;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

type Handler = Arc<dyn Fn(&Value) -> Result<Value, RpcError> + Send + Sync>;

/// Transport with per-method handlers.
#[derive(Default)]
pub struct ScriptedTransport {
    handlers: RwLock<HashMap<String, Handler>>,
    requests: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with `handler`, replacing any earlier handler.
    pub fn on<F>(&self, method: &str, handler: F)
    where
        F: Fn(&Value) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        self.handlers
            .write()
            .insert(method.to_string(), Arc::new(handler));
    }

    /// Answer `method` with a fixed result.
    pub fn respond(&self, method: &str, result: Value) {
        self.on(method, move |_| Ok(result.clone()));
    }

    /// Requests seen so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<(String, Value)> {
        self.requests.lock().clone()
    }

    /// Number of requests for `method`.
    #[must_use]
    pub fn count(&self, method: &str) -> usize {
        self.requests.lock().iter().filter(|(m, _)| m == method).count()
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn request(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        self.requests.lock().push((method.to_string(), params.clone()));
        let handler = self
            .handlers
            .read()
            .get(method)
            .cloned()
            .ok_or_else(|| RpcError::Unsupported(method.to_string()))?;
        handler(&params)
    }
}
