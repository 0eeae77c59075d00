//! JSON-RPC 2.0 client layered over a [`Transport`].
//!
//! Grounded on the pending-map / oneshot-response-slot pattern: the slot is
//! registered in `pending` *before* the request is sent, so a response that
//! races ahead of the registration can never be lost.

use crate::errors::{RpcError, RpcResult};
use crate::transport::Transport;
use crate::types::*;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const CALL_TIMEOUT: Duration = Duration::from_secs(30);

enum Slot {
    Response(IncomingMessage),
}

pub struct RpcClient {
    transport: Arc<dyn Transport>,
    next_id: AtomicI64,
    pending: Arc<Mutex<HashMap<RequestId, oneshot::Sender<Slot>>>>,
    server_info: RwLock<Option<ServerInfo>>,
    initialized: std::sync::atomic::AtomicBool,
    closed: std::sync::atomic::AtomicBool,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        let client = Arc::new(Self {
            transport,
            next_id: AtomicI64::new(1),
            pending: Arc::new(Mutex::new(HashMap::new())),
            server_info: RwLock::new(None),
            initialized: std::sync::atomic::AtomicBool::new(false),
            closed: std::sync::atomic::AtomicBool::new(false),
        });
        tokio::spawn(Self::receive_loop(client.clone()));
        client
    }

    async fn receive_loop(self: Arc<Self>) {
        while let Some(incoming) = self.transport.recv().await {
            match incoming {
                Ok(line) => {
                    let message: IncomingMessage = match serde_json::from_str(&line) {
                        Ok(m) => m,
                        Err(e) => {
                            warn!(error = %e, "failed to decode incoming mcp message");
                            continue;
                        }
                    };
                    self.dispatch(message).await;
                }
                Err(e) => {
                    warn!(error = %e, "transport read error");
                }
            }
        }
        debug!("mcp rpc client: receive loop ended");
        // The transport is gone; nothing will ever answer requests still
        // waiting on it, so release them now rather than making each one
        // wait out its own 30s timeout.
        self.pending.lock().await.clear();
    }

    async fn dispatch(&self, message: IncomingMessage) {
        if message.is_notification() {
            let method = message.method.as_deref().unwrap_or("");
            let params = message.params.clone();
            match method {
                "notifications/progress" => debug!(?params, "mcp progress notification"),
                "notifications/cancelled" => debug!(?params, "mcp cancelled notification"),
                other => debug!(method = other, "unhandled mcp notification"),
            }
            return;
        }

        let Some(id) = message.normalized_id() else {
            warn!("received response with unparseable id, dropping");
            return;
        };

        let sender = self.pending.lock().await.remove(&id);
        if let Some(sender) = sender {
            // Non-blocking by construction: oneshot::send never awaits.
            let _ = sender.send(Slot::Response(message));
        } else {
            debug!(id, "no pending request for response id, dropping");
        }
    }

    async fn call_raw(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
        cancel: Option<&CancellationToken>,
    ) -> RpcResult<serde_json::Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(RpcError::Closed);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id, tx);

        let request = JsonRpcRequest::new(id, method, params);
        let payload = serde_json::to_string(&request)?;
        if let Err(e) = self.transport.send(&payload).await {
            self.pending.lock().await.remove(&id);
            return Err(e.into());
        }

        let wait = tokio::time::timeout(CALL_TIMEOUT, rx);
        let slot = match cancel {
            Some(token) => tokio::select! {
                res = wait => res,
                _ = token.cancelled() => {
                    self.pending.lock().await.remove(&id);
                    return Err(RpcError::Cancelled);
                }
            },
            None => wait.await,
        };

        let slot = match slot {
            Ok(Ok(slot)) => slot,
            Ok(Err(_recv_closed)) => {
                self.pending.lock().await.remove(&id);
                return Err(RpcError::Closed);
            }
            Err(_timeout) => {
                self.pending.lock().await.remove(&id);
                return Err(RpcError::Timeout(CALL_TIMEOUT));
            }
        };

        let Slot::Response(message) = slot;
        if let Some(error) = message.error {
            return Err(RpcError::Remote { code: error.code, message: error.message });
        }
        Ok(message.result.unwrap_or(serde_json::Value::Null))
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<serde_json::Value>,
        cancel: Option<&CancellationToken>,
    ) -> RpcResult<R> {
        let value = self.call_raw(method, params, cancel).await?;
        Ok(serde_json::from_value(value)?)
    }

    async fn notify(&self, method: &str, params: Option<serde_json::Value>) -> RpcResult<()> {
        let notification = JsonRpcNotification::new(method, params);
        let payload = serde_json::to_string(&notification)?;
        self.transport.send(&payload).await?;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn initialize(&self) -> RpcResult<InitializeResult> {
        let params = serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "clientInfo": {"name": "mcp-client", "version": env!("CARGO_PKG_VERSION")},
            "capabilities": {},
        });
        let result: InitializeResult = self.call("initialize", Some(params), None).await?;
        *self.server_info.write().await = Some(result.server_info.clone());
        self.initialized.store(true, Ordering::SeqCst);
        self.notify("notifications/initialized", None).await?;
        Ok(result)
    }

    fn require_initialized(&self) -> RpcResult<()> {
        if self.initialized.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RpcError::NotInitialized)
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_tools(&self) -> RpcResult<Vec<ToolDescriptor>> {
        self.require_initialized()?;
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let params = cursor
                .as_ref()
                .map(|c| serde_json::json!({ "cursor": c }));
            let page: ListToolsResult = self.call("tools/list", params, None).await?;
            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }
        Ok(tools)
    }

    #[tracing::instrument(skip(self, arguments))]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> RpcResult<CallToolResult> {
        self.require_initialized()?;
        let params = serde_json::json!({ "name": name, "arguments": arguments });
        self.call("tools/call", Some(params), None).await
    }

    pub async fn ping(&self) -> RpcResult<()> {
        self.require_initialized()?;
        let _: serde_json::Value = self.call("ping", None, None).await?;
        Ok(())
    }

    pub async fn server_info(&self) -> Option<ServerInfo> {
        self.server_info.read().await.clone()
    }

    pub async fn close(&self) -> RpcResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        let mut pending = self.pending.lock().await;
        pending.clear();
        drop(pending);
        self.transport.close().await?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        !self.closed.load(Ordering::SeqCst) && self.transport.is_connected()
    }
}
