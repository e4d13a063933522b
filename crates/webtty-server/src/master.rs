//! WebSocket connection as a session master.

use std::io;

use async_trait::async_trait;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;
use webtty::{InboundMessage, Master};

use crate::pending::Pending;

const INPUT: u8 = InboundMessage::Input.tag();

/// Each WebSocket message is one frame. Text is used for UTF-8 frames so
/// browser clients can treat the stream as strings.
///
/// An Input message longer than the read buffer is handed out as several
/// Input frames, each carrying the next slice of the payload. Any other
/// message that does not fit fails the read.
pub struct WsMaster<S> {
    sink: Mutex<SplitSink<WebSocketStream<S>, Message>>,
    reader: Mutex<Reader<S>>,
}

struct Reader<S> {
    stream: SplitStream<WebSocketStream<S>>,
    pending: Pending,
}

impl<S> WsMaster<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(ws: WebSocketStream<S>) -> Self {
        let (sink, stream) = ws.split();
        Self {
            sink: Mutex::new(sink),
            reader: Mutex::new(Reader {
                stream,
                pending: Pending::default(),
            }),
        }
    }

    /// Send a Close frame. Errors mean the peer is already gone.
    pub async fn close(&self) {
        if let Err(e) = self.sink.lock().await.close().await {
            tracing::debug!(error = %e, "WebSocket close failed");
        }
    }
}

#[async_trait]
impl<S> Master for WsMaster<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut reader = self.reader.lock().await;
        loop {
            if !reader.pending.is_empty() {
                return Ok(reader.pending.copy_prefixed(INPUT, buf));
            }

            let data: Vec<u8> = match reader.stream.next().await {
                Some(Ok(Message::Text(text))) => text.as_bytes().to_vec(),
                Some(Ok(Message::Binary(data))) => data.to_vec(),
                Some(Ok(Message::Close(_))) | None => return Ok(0),
                // Ping/pong are answered by tungstenite itself.
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(io::Error::new(io::ErrorKind::ConnectionAborted, e)),
            };

            if data.is_empty() {
                continue;
            }
            if data.len() <= buf.len() {
                buf[..data.len()].copy_from_slice(&data);
                return Ok(data.len());
            }

            // Only typed input can be split and still decode frame by frame.
            if data[0] != INPUT || buf.len() < 2 {
                tracing::warn!(
                    size = data.len(),
                    buffer = buf.len(),
                    tag = data[0],
                    "Oversized WebSocket message"
                );
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "{} byte message does not fit a {} byte frame",
                        data.len(),
                        buf.len()
                    ),
                ));
            }

            let n = buf.len();
            buf.copy_from_slice(&data[..n]);
            reader.pending.fill(data[n..].to_vec());
            return Ok(n);
        }
    }

    async fn write(&self, data: &[u8]) -> io::Result<usize> {
        let message = match std::str::from_utf8(data) {
            Ok(text) => Message::text(text.to_owned()),
            Err(_) => Message::binary(data.to_vec()),
        };
        self.sink
            .lock()
            .await
            .send(message)
            .await
            .map_err(io::Error::other)?;
        Ok(data.len())
    }
}
