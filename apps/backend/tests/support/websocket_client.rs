// WebSocket client utilities for testing

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// WebSocket test client
pub struct WebSocketClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketClient {
    /// Connect to a WebSocket endpoint
    pub async fn connect(url: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let (stream, _) = connect_async(url).await?;
        Ok(Self { stream })
    }

    /// Connect to a WebSocket endpoint, retrying until success or timeout.
    pub async fn connect_retry(
        url: &str,
        timeout: Duration,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let start = tokio::time::Instant::now();
        loop {
            match connect_async(url).await {
                Ok((stream, _)) => return Ok(Self { stream }),
                Err(err) => {
                    if start.elapsed() >= timeout {
                        return Err(Box::new(err));
                    }
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            }
        }
    }

    /// Receive the next message with a timeout
    pub async fn recv_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Message>, Box<dyn std::error::Error>> {
        tokio::time::timeout(timeout, self.stream.next())
            .await
            .map_err(|_| "Timeout waiting for message")?
            .transpose()
            .map_err(|e| e.into())
    }

    /// Send a text message
    pub async fn send(&mut self, text: &str) -> Result<(), Box<dyn std::error::Error>> {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await?;
        Ok(())
    }

    /// Send a pick request the way the browser client does.
    pub async fn send_pick(
        &mut self,
        movie_id: i64,
        user_id: i64,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let payload =
            format!(r#"{{"type":"pick","movieId":{movie_id},"userId":{user_id}}}"#);
        self.send(&payload).await
    }

    /// Close the connection
    pub async fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.stream.close(None).await?;
        Ok(())
    }

    /// Parse next text message as JSON, skipping ping/pong frames.
    pub async fn recv_json_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<Option<Value>, Box<dyn std::error::Error>> {
        let start = tokio::time::Instant::now();
        loop {
            let remaining = timeout
                .checked_sub(start.elapsed())
                .ok_or("Timeout waiting for message")?;
            match self.recv_timeout(remaining).await? {
                Some(Message::Text(text)) => {
                    let json: Value = serde_json::from_str(&text)?;
                    return Ok(Some(json));
                }
                Some(Message::Ping(_)) | Some(Message::Pong(_)) => continue,
                Some(Message::Close(_)) => return Ok(None),
                Some(_) => return Ok(None),
                None => return Ok(None),
            }
        }
    }

    /// Wait for a message of the given `type` tag, skipping others.
    pub async fn recv_until_type(
        &mut self,
        msg_type: &str,
        timeout: Duration,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let start = tokio::time::Instant::now();
        loop {
            let remaining = timeout
                .checked_sub(start.elapsed())
                .ok_or_else(|| format!("Timeout waiting for message of type {msg_type}"))?;
            match self.recv_json_timeout(remaining).await? {
                Some(json) if json["type"] == msg_type => return Ok(json),
                Some(_) => continue,
                None => return Err("connection closed".into()),
            }
        }
    }
}
