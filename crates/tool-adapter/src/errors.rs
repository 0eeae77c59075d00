use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("server '{0}' not found")]
    ServerNotFound(String),

    #[error("tool '{0}' not found")]
    ToolNotFound(String),

    #[error(transparent)]
    Manager(#[from] mcp_client::ManagerError),

    #[error(transparent)]
    Rpc(#[from] mcp_client::RpcError),

    #[error("remote tool error: {0}")]
    RemoteToolError(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
