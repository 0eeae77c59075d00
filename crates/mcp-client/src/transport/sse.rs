//! HTTP + Server-Sent-Events transport.
//!
//! `connect` opens the `/sse` stream; `send` posts to `/message`. Both
//! requests carry an `X-Session-ID` header once the server has handed one
//! out in a prior response.

use super::validate::validate_url;
use super::{Incoming, Transport};
use crate::errors::{TransportError, TransportResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, warn};

const SESSION_HEADER: &str = "X-Session-ID";

pub struct HttpSseTransport {
    client: reqwest::Client,
    base_url: url::Url,
    session_id: RwLock<Option<String>>,
    incoming_rx: tokio::sync::Mutex<mpsc::Receiver<Incoming>>,
    connected: AtomicBool,
}

impl HttpSseTransport {
    #[tracing::instrument(skip(allow_list), fields(%base_url))]
    pub async fn connect(
        base_url: &str,
        api_key: Option<&str>,
        allow_list: Option<&[String]>,
    ) -> TransportResult<Arc<Self>> {
        let validated = validate_url(base_url, allow_list).await?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()?;

        let sse_url = join(&validated, "sse");
        let mut req = client.get(sse_url).header("Accept", "text/event-stream");
        if let Some(key) = api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::BadStatus { status, body });
        }

        let session_id = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(read_sse_stream(response, tx));

        Ok(Arc::new(Self {
            client,
            base_url: validated,
            session_id: RwLock::new(session_id),
            incoming_rx: tokio::sync::Mutex::new(rx),
            connected: AtomicBool::new(true),
        }))
    }
}

fn join(base: &url::Url, segment: &str) -> url::Url {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
        segments.pop_if_empty().push(segment);
    }
    url
}

async fn read_sse_stream(response: reqwest::Response, tx: mpsc::Sender<Incoming>) {
    let mut stream = response.bytes_stream();
    let mut buffer = String::new();
    let mut data_lines: Vec<String> = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(Err(TransportError::Http(e))).await;
                break;
            }
        };
        buffer.push_str(&String::from_utf8_lossy(&chunk));

        while let Some(pos) = buffer.find('\n') {
            let line = buffer[..pos].trim_end_matches('\r').to_string();
            buffer.drain(..=pos);

            if line.is_empty() {
                if !data_lines.is_empty() {
                    let payload = data_lines.join("\n");
                    data_lines.clear();
                    if tx.send(Ok(payload)).await.is_err() {
                        return;
                    }
                }
                continue;
            }

            if let Some(data) = line.strip_prefix("data:") {
                data_lines.push(data.trim_start().to_string());
            } else if line.starts_with("event:") {
                debug!(event = %line, "sse event field");
            }
        }
    }
}

#[async_trait]
impl Transport for HttpSseTransport {
    async fn send(&self, message: &str) -> TransportResult<()> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(TransportError::Closed);
        }
        let url = join(&self.base_url, "message");
        let mut req = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .body(message.to_string());

        if let Some(session) = self.session_id.read().await.as_ref() {
            req = req.header(SESSION_HEADER, session);
        }

        let response = req.send().await?;
        let status = response.status();
        if let Some(session) = response
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            *self.session_id.write().await = Some(session.to_string());
        }

        if status.as_u16() != 200 && status.as_u16() != 202 {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::BadStatus { status: status.as_u16(), body });
        }

        Ok(())
    }

    async fn recv(&self) -> Option<Incoming> {
        self.incoming_rx.lock().await.recv().await
    }

    async fn close(&self) -> TransportResult<()> {
        self.connected.store(false, Ordering::SeqCst);
        let url = join(&self.base_url, "session");
        if let Some(session) = self.session_id.read().await.clone() {
            if let Err(e) = self
                .client
                .delete(url)
                .header(SESSION_HEADER, session)
                .send()
                .await
            {
                warn!(error = %e, "failed to tear down sse session");
            }
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
