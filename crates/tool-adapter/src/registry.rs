//! The host-side tool registry surface the adapter bridges into.
//!
//! The concrete host registry lives outside this crate; what ships here is
//! the trait contract plus an in-memory implementation used by this crate's
//! own tests and by anything standing up the fabric without a real host.

use async_trait::async_trait;
use mcp_client::ToolDescriptor;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Executes one registered tool by name with JSON arguments.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, arguments: serde_json::Value) -> Result<serde_json::Value, String>;
}

#[derive(Clone)]
pub struct ToolHandle {
    pub descriptor: ToolDescriptor,
    pub executor: Arc<dyn ToolExecutor>,
}

#[async_trait]
pub trait ToolRegistry: Send + Sync {
    async fn register(&self, descriptor: ToolDescriptor, executor: Arc<dyn ToolExecutor>);
    async fn unregister(&self, name: &str);
    async fn get(&self, name: &str) -> Option<ToolHandle>;
    async fn list(&self) -> Vec<ToolDescriptor>;
}

#[derive(Default)]
pub struct InMemoryToolRegistry {
    tools: RwLock<HashMap<String, ToolHandle>>,
}

impl InMemoryToolRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ToolRegistry for InMemoryToolRegistry {
    async fn register(&self, descriptor: ToolDescriptor, executor: Arc<dyn ToolExecutor>) {
        let name = descriptor.name.clone();
        self.tools.write().await.insert(name, ToolHandle { descriptor, executor });
    }

    async fn unregister(&self, name: &str) {
        self.tools.write().await.remove(name);
    }

    async fn get(&self, name: &str) -> Option<ToolHandle> {
        self.tools.read().await.get(name).cloned()
    }

    async fn list(&self) -> Vec<ToolDescriptor> {
        self.tools.read().await.values().map(|h| h.descriptor.clone()).collect()
    }
}
