//! Child-process stdio transport: newline-delimited JSON over stdin/stdout.

use super::validate::validate_command;
use super::{Incoming, Transport};
use crate::errors::{TransportError, TransportResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct StdioTransport {
    child: Mutex<Child>,
    stdin: Mutex<tokio::process::ChildStdin>,
    incoming_rx: Mutex<mpsc::Receiver<Incoming>>,
    connected: AtomicBool,
}

impl StdioTransport {
    #[tracing::instrument(skip(env), fields(%command))]
    pub async fn connect(
        command: &str,
        args: &[String],
        env: &HashMap<String, String>,
    ) -> TransportResult<Arc<Self>> {
        validate_command(command, args)?;

        let mut cmd = Command::new(command);
        cmd.args(args)
            .envs(env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn()?;
        let stdin = child.stdin.take().ok_or_else(|| {
            TransportError::ProcessExited("child has no stdin handle".into())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            TransportError::ProcessExited("child has no stdout handle".into())
        })?;
        let stderr = child.stderr.take();

        let (tx, rx) = mpsc::channel(256);

        tokio::spawn(read_stdout(stdout, tx.clone()));
        if let Some(stderr) = stderr {
            tokio::spawn(drain_stderr(stderr));
        }

        Ok(Arc::new(Self {
            child: Mutex::new(child),
            stdin: Mutex::new(stdin),
            incoming_rx: Mutex::new(rx),
            connected: AtomicBool::new(true),
        }))
    }
}

async fn read_stdout(stdout: tokio::process::ChildStdout, tx: mpsc::Sender<Incoming>) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(Ok(line)).await.is_err() {
                    break;
                }
            }
            Ok(None) => {
                debug!("stdio transport: stdout closed");
                break;
            }
            Err(e) => {
                let _ = tx.send(Err(TransportError::Io(e))).await;
                break;
            }
        }
    }
}

async fn drain_stderr(stderr: tokio::process::ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        warn!(target: "mcp_client::stderr", "{line}");
    }
}

#[async_trait]
impl Transport for StdioTransport {
    async fn send(&self, message: &str) -> TransportResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        let mut stdin = self.stdin.lock().await;
        stdin.write_all(message.as_bytes()).await?;
        stdin.write_all(b"\n").await?;
        stdin.flush().await?;
        Ok(())
    }

    async fn recv(&self) -> Option<Incoming> {
        self.incoming_rx.lock().await.recv().await
    }

    async fn close(&self) -> TransportResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        {
            let mut stdin = self.stdin.lock().await;
            let _ = stdin.shutdown().await;
        }
        let mut child = self.child.lock().await;
        let _ = child.start_kill();
        let _ = child.try_wait();
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
