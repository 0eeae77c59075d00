use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("transport closed")]
    Closed,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    BadStatus { status: u16, body: String },

    #[error("process exited: {0}")]
    ProcessExited(String),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[derive(Error, Debug)]
pub enum RpcError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("client not initialized")]
    NotInitialized,

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("client closed")]
    Closed,

    #[error("remote error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("tool call failed: {0}")]
    RemoteToolError(String),
}

pub type RpcResult<T> = std::result::Result<T, RpcError>;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("server '{0}' already exists")]
    AlreadyExists(String),

    #[error("server '{0}' not found")]
    NotFound(String),

    #[error("server '{0}' is not connected")]
    NotConnected(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

pub type ManagerResult<T> = std::result::Result<T, ManagerError>;
