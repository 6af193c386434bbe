//! Async client for the backend service.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use super::error::{ApiError, ApiResult};
use super::protocol::{methods, ErrorInfo, LoginParams, LoginResponse, LogoutParams, RequestEnvelope, ResponseEnvelope};

/// Default timeout for requests (30 seconds).
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async client for the migration backend.
///
/// The client holds one TCP connection and communicates via NDJSON
/// (newline-delimited JSON). Each request has a unique ID for correlation
/// with responses, enabling concurrent requests over the single connection.
/// After a successful [`login`](Self::login) the session token is attached
/// to every request.
///
/// # Example
///
/// ```ignore
/// use ferry::api::ApiClient;
///
/// let client = ApiClient::connect("127.0.0.1:7171").await?;
/// client.login("admin", "secret").await?;
///
/// let response: ListConnectionsResponse = client
///     .request(methods::LIST_CONNECTIONS, ListConnectionsParams {})
///     .await?;
/// ```
pub struct ApiClient {
    /// Writer for sending requests.
    writer: Arc<Mutex<BufWriter<OwnedWriteHalf>>>,

    /// Map of pending request IDs to response channels.
    pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,

    /// Session token, once logged in.
    token: Arc<Mutex<Option<String>>>,

    /// Handle to the background reader task.
    _reader_task: tokio::task::JoinHandle<()>,

    /// Request timeout duration.
    timeout: Duration,
}

impl ApiClient {
    /// Connect to the backend endpoint (`host:port`).
    pub async fn connect(endpoint: &str) -> ApiResult<Self> {
        Self::connect_with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS)).await
    }

    /// Connect with a custom request timeout.
    pub async fn connect_with_timeout(endpoint: &str, timeout: Duration) -> ApiResult<Self> {
        let stream = TcpStream::connect(endpoint)
            .await
            .map_err(ApiError::ConnectFailed)?;
        let (read_half, write_half) = stream.into_split();

        let writer = Arc::new(Mutex::new(BufWriter::new(write_half)));
        let pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>> =
            Arc::new(Mutex::new(HashMap::new()));

        let reader_task = Self::spawn_reader_task(read_half, pending.clone());

        Ok(Self {
            writer,
            pending,
            token: Arc::new(Mutex::new(None)),
            _reader_task: reader_task,
            timeout,
        })
    }

    /// Spawn the background task that reads responses from the backend.
    fn spawn_reader_task(
        read_half: OwnedReadHalf,
        pending: Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(read_half);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        // EOF - backend closed the connection.
                        break;
                    }
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            let mut pending = pending.lock().await;
                            if let Some(tx) = pending.remove(&resp.id) {
                                let _ = tx.send(resp);
                            } else {
                                debug!(id = %resp.id, "response for unknown request id");
                            }
                        }
                        Err(e) => {
                            warn!("backend: failed to parse response: {}", e);
                        }
                    },
                    Err(e) => {
                        warn!("backend: read error: {}", e);
                        break;
                    }
                }
            }

            // Connection gone - fail all pending requests.
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let error_response = ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "CONNECTION_CLOSED".to_string(),
                        message: "Backend connection closed unexpectedly".to_string(),
                    }),
                };
                let _ = tx.send(error_response);
            }
        })
    }

    /// Send a request and wait for its response.
    ///
    /// # Type Parameters
    ///
    /// * `P` - Request parameters type (must implement Serialize).
    /// * `R` - Response type (must implement DeserializeOwned).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails, the write fails, the request
    /// times out, the backend returns an error response, or the response
    /// cannot be deserialized.
    pub async fn request<P, R>(&self, method: &str, params: P) -> ApiResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            token: self.token.lock().await.clone(),
            params: serde_json::to_value(params).map_err(ApiError::SerializeFailed)?,
        };

        // Register response channel.
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock().await;
            pending.insert(id.clone(), tx);
        }

        // Send request.
        {
            let mut writer = self.writer.lock().await;
            let line =
                serde_json::to_string(&request).map_err(ApiError::SerializeFailed)? + "\n";
            writer
                .write_all(line.as_bytes())
                .await
                .map_err(ApiError::WriteFailed)?;
            writer.flush().await.map_err(ApiError::WriteFailed)?;
        }

        // Wait for response with timeout.
        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(_)) => {
                return Err(ApiError::ChannelClosed);
            }
            Err(_) => {
                // Timeout - clean up the pending entry to prevent a leak.
                let mut pending = self.pending.lock().await;
                pending.remove(&id);
                return Err(ApiError::Timeout(self.timeout.as_secs()));
            }
        };

        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(ApiError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    /// Classify a backend error into a more specific error type.
    fn classify_error(code: &str, message: &str) -> ApiError {
        match code {
            "UNAUTHORIZED" => ApiError::Unauthorized(message.to_string()),
            "INVALID_REQUEST" => ApiError::InvalidRequest(message.to_string()),
            "METHOD_NOT_FOUND" => ApiError::MethodNotFound(message.to_string()),
            "CONNECTION_CLOSED" => ApiError::ConnectionClosed,
            _ => ApiError::remote(code, message),
        }
    }

    /// Log in and store the session token for subsequent requests.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<()> {
        let response: LoginResponse = self
            .request(
                methods::LOGIN,
                LoginParams {
                    username: username.to_string(),
                    password: password.to_string(),
                },
            )
            .await?;

        *self.token.lock().await = Some(response.token);
        Ok(())
    }

    /// Log out and drop the session token.
    ///
    /// The token is cleared locally even if the backend call fails - the
    /// console must not keep using a token it has asked to invalidate.
    pub async fn logout(&self) -> ApiResult<()> {
        let result: ApiResult<serde_json::Value> =
            self.request(methods::LOGOUT, LogoutParams {}).await;
        *self.token.lock().await = None;
        result.map(|_| ())
    }

    /// Whether a session token is currently held.
    pub async fn is_logged_in(&self) -> bool {
        self.token.lock().await.is_some()
    }

    /// Check if the connection is still up.
    ///
    /// Returns `false` once the reader task has finished, which means the
    /// backend closed the connection.
    pub fn is_alive(&self) -> bool {
        !self._reader_task.is_finished()
    }

    /// Get the current request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Set the request timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}
