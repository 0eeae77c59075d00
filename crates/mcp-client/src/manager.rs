//! Connection manager: owns a fleet of managed MCP clients and keeps them
//! alive with a ticking reconnect monitor.
//!
//! Grounded on the worker pool's tick-based monitor loop and
//! `Arc<RwLock<state>>` bookkeeping, and on the connection-state-machine
//! shape used by connection proxies elsewhere in the pack: state
//! transitions are logged, and callbacks always fire outside any lock held
//! by this module.

use crate::errors::{ManagerError, ManagerResult};
use crate::rpc_client::RpcClient;
use crate::transport::{HttpSseTransport, StdioTransport, Transport};
use crate::types::{McpServerConfig, TransportKind};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const MONITOR_TICK: Duration = Duration::from_secs(5);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Connecting,
    Connected,
    Reconnecting,
    Closed,
}

pub type ConnectionCallback = Arc<dyn Fn(&str, bool) + Send + Sync>;

pub struct ManagedClient {
    config: McpServerConfig,
    state: RwLock<ClientState>,
    rpc: RwLock<Option<Arc<RpcClient>>>,
    reconnecting: AtomicBool,
}

impl ManagedClient {
    async fn set_state(&self, next: ClientState) {
        let mut state = self.state.write().await;
        if *state != next {
            info!(server = %self.config.name, ?state, ?next, "mcp connection state transition");
        }
        *state = next;
    }

    pub async fn state(&self) -> ClientState {
        *self.state.read().await
    }

    pub async fn is_connected(&self) -> bool {
        matches!(self.state().await, ClientState::Connected)
    }

    pub async fn rpc(&self) -> Option<Arc<RpcClient>> {
        self.rpc.read().await.clone()
    }
}

async fn build_transport(
    config: &McpServerConfig,
    allow_list: Option<&[String]>,
) -> ManagerResult<Arc<dyn Transport>> {
    match config.transport {
        TransportKind::Stdio => {
            let command = config
                .command
                .as_deref()
                .ok_or_else(|| ManagerError::Transport(crate::errors::TransportError::InvalidCommand(
                    "stdio server missing command".into(),
                )))?;
            let transport = StdioTransport::connect(command, &config.args, &config.env).await?;
            Ok(transport as Arc<dyn Transport>)
        }
        TransportKind::Sse => {
            let url = config
                .url
                .as_deref()
                .ok_or_else(|| ManagerError::Transport(crate::errors::TransportError::InvalidUrl(
                    "sse server missing url".into(),
                )))?;
            let transport =
                HttpSseTransport::connect(url, config.api_key.as_deref(), allow_list).await?;
            Ok(transport as Arc<dyn Transport>)
        }
    }
}

async fn connect_one(
    config: &McpServerConfig,
    allow_list: Option<&[String]>,
) -> ManagerResult<Arc<RpcClient>> {
    let transport = build_transport(config, allow_list).await?;
    let rpc = RpcClient::new(transport);
    rpc.initialize().await?;
    Ok(rpc)
}

pub struct ConnectionManager {
    clients: RwLock<HashMap<String, Arc<ManagedClient>>>,
    callback: RwLock<Option<ConnectionCallback>>,
    cancel: CancellationToken,
    allow_list: Option<Vec<String>>,
    monitor: std::sync::Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl ConnectionManager {
    pub fn new(allow_list: Option<Vec<String>>) -> Arc<Self> {
        let manager = Arc::new(Self {
            clients: RwLock::new(HashMap::new()),
            callback: RwLock::new(None),
            cancel: CancellationToken::new(),
            allow_list,
            monitor: std::sync::Mutex::new(None),
        });
        let handle = tokio::spawn(Self::monitor_loop(manager.clone()));
        // Stored so `close` can abort it deterministically rather than
        // relying on the cancellation token alone.
        *manager.monitor.lock().expect("monitor mutex poisoned") = Some(handle);
        manager
    }

    pub async fn set_callback(&self, callback: ConnectionCallback) {
        *self.callback.write().await = Some(callback);
    }

    #[tracing::instrument(skip(self, config), fields(server = %config.name))]
    pub async fn add_server(&self, config: McpServerConfig) -> ManagerResult<()> {
        {
            let clients = self.clients.read().await;
            if clients.contains_key(&config.name) {
                return Err(ManagerError::AlreadyExists(config.name));
            }
        }

        let managed = Arc::new(ManagedClient {
            config: config.clone(),
            state: RwLock::new(ClientState::Connecting),
            rpc: RwLock::new(None),
            reconnecting: AtomicBool::new(false),
        });

        self.clients
            .write()
            .await
            .insert(config.name.clone(), managed.clone());

        match connect_one(&config, self.allow_list.as_deref()).await {
            Ok(rpc) => {
                *managed.rpc.write().await = Some(rpc);
                managed.set_state(ClientState::Connected).await;
                self.fire_callback(&config.name, true).await;
                Ok(())
            }
            Err(e) => {
                managed.set_state(ClientState::Reconnecting).await;
                warn!(server = %config.name, error = %e, "initial connection failed");
                if !config.auto_reconnect {
                    self.clients.write().await.remove(&config.name);
                    return Err(e);
                }
                Ok(())
            }
        }
    }

    pub async fn remove_server(&self, name: &str) -> ManagerResult<()> {
        let managed = self
            .clients
            .write()
            .await
            .remove(name)
            .ok_or_else(|| ManagerError::NotFound(name.to_string()))?;
        managed.set_state(ClientState::Closed).await;
        if let Some(rpc) = managed.rpc().await {
            let _ = rpc.close().await;
        }
        Ok(())
    }

    pub async fn get_client(&self, name: &str) -> ManagerResult<Arc<RpcClient>> {
        let clients = self.clients.read().await;
        let managed = clients
            .get(name)
            .ok_or_else(|| ManagerError::NotFound(name.to_string()))?
            .clone();
        drop(clients);

        if !managed.is_connected().await {
            return Err(ManagerError::NotConnected(name.to_string()));
        }
        managed
            .rpc()
            .await
            .ok_or_else(|| ManagerError::NotConnected(name.to_string()))
    }

    pub async fn server_names(&self) -> Vec<String> {
        self.clients.read().await.keys().cloned().collect()
    }

    async fn fire_callback(&self, name: &str, connected: bool) {
        let callback = self.callback.read().await.clone();
        // Invoked outside the clients/state locks, never while holding them.
        if let Some(callback) = callback {
            callback(name, connected);
        }
    }

    async fn monitor_loop(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(MONITOR_TICK);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = self.cancel.cancelled() => break,
            }

            let snapshot: Vec<Arc<ManagedClient>> = self.clients.read().await.values().cloned().collect();
            for managed in snapshot {
                if managed.config.auto_reconnect
                    && !managed.is_connected().await
                    && !managed.reconnecting.swap(true, Ordering::SeqCst)
                {
                    let manager = self.clone();
                    tokio::spawn(async move {
                        manager.reconnect_loop(managed).await;
                    });
                }
            }
        }
    }

    async fn reconnect_loop(self: Arc<Self>, managed: Arc<ManagedClient>) {
        managed.set_state(ClientState::Reconnecting).await;
        let mut delay = Duration::from_millis(managed.config.reconnect_delay_ms.max(1));

        loop {
            if self.cancel.is_cancelled() || managed.state().await == ClientState::Closed {
                managed.reconnecting.store(false, Ordering::SeqCst);
                return;
            }

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancel.cancelled() => {
                    managed.reconnecting.store(false, Ordering::SeqCst);
                    return;
                }
            }

            match connect_one(&managed.config, self.allow_list.as_deref()).await {
                Ok(rpc) => {
                    *managed.rpc.write().await = Some(rpc);
                    managed.set_state(ClientState::Connected).await;
                    managed.reconnecting.store(false, Ordering::SeqCst);
                    self.fire_callback(&managed.config.name, true).await;
                    return;
                }
                Err(e) => {
                    warn!(server = %managed.config.name, error = %e, ?delay, "reconnect attempt failed");
                    delay = std::cmp::min(delay * 2, MAX_BACKOFF);
                }
            }
        }
    }

    pub async fn close(&self) {
        self.cancel.cancel();
        if let Some(handle) = self.monitor.lock().expect("monitor mutex poisoned").take() {
            handle.abort();
        }
        let snapshot: Vec<Arc<ManagedClient>> = {
            let mut clients = self.clients.write().await;
            clients.drain().map(|(_, v)| v).collect()
        };
        for managed in snapshot {
            managed.set_state(ClientState::Closed).await;
            if let Some(rpc) = managed.rpc().await {
                let _ = rpc.close().await;
            }
        }
    }
}
