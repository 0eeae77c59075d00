//! Model Context Protocol client fabric: transports, a JSON-RPC client,
//! and a connection manager with reconnect/backoff.

pub mod errors;
pub mod manager;
pub mod rpc_client;
pub mod transport;
pub mod types;

pub use errors::{ManagerError, ManagerResult, RpcError, RpcResult, TransportError, TransportResult};
pub use manager::{ClientState, ConnectionCallback, ConnectionManager, ManagedClient};
pub use rpc_client::RpcClient;
pub use transport::{HttpSseTransport, StdioTransport, Transport};
pub use types::{
    CallToolResult, InitializeResult, JsonRpcNotification, JsonRpcRequest, ListToolsResult,
    McpServerConfig, RequestId, ServerInfo, ToolContent, ToolDescriptor, TransportKind,
    PROTOCOL_VERSION,
};
