//! Bridges the blocking `Write` side of a request body to the async
//! transport. Chunks written to a [`ChannelSink`] come out of the paired
//! stream in order; the bounded channel makes the writer wait for the
//! transport to catch up.

use bytes::Bytes;
use futures_util::Stream;
use std::io::{self, Write};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

type Chunk = io::Result<Bytes>;

/// Blocking writer half. Must not be used from inside an async task.
pub struct ChannelSink {
    tx: mpsc::Sender<Chunk>,
}

impl ChannelSink {
    /// Hands an error to the transport so the request is aborted.
    pub fn abort(&self, error: &io::Error) {
        let forwarded = io::Error::new(error.kind(), error.to_string());
        // 接收端已關閉就沒什麼好中止的
        let _ = self.tx.blocking_send(Err(forwarded));
    }
}

impl Write for ChannelSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| {
                io::Error::new(io::ErrorKind::BrokenPipe, "request body receiver dropped")
            })?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reading half, handed to the transport as the request body.
pub struct ChunkStream {
    rx: mpsc::Receiver<Chunk>,
}

impl Stream for ChunkStream {
    type Item = Chunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Creates a sink and the stream that yields what is written into it.
pub fn channel(capacity: usize) -> (ChannelSink, ChunkStream) {
    let (tx, rx) = mpsc::channel::<Chunk>(capacity.max(1));
    (ChannelSink { tx }, ChunkStream { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn test_chunks_arrive_in_order() {
        let (mut sink, chunks) = channel(2);
        let writer = tokio::task::spawn_blocking(move || {
            for part in [&b"one"[..], b"two", b"three"] {
                sink.write_all(part)?;
            }
            Ok::<_, io::Error>(())
        });

        let received: Vec<Bytes> = chunks.map(|c| c.unwrap()).collect().await;
        writer.await.unwrap().unwrap();

        assert_eq!(received, vec![&b"one"[..], b"two", b"three"]);
    }

    #[tokio::test]
    async fn test_abort_surfaces_as_stream_error() {
        let (sink, chunks) = channel(1);
        tokio::task::spawn_blocking(move || {
            sink.abort(&io::Error::new(io::ErrorKind::NotFound, "gone"));
        })
        .await
        .unwrap();

        let items: Vec<Chunk> = chunks.collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_write_fails_once_receiver_is_dropped() {
        let (mut sink, chunks) = channel(1);
        drop(chunks);
        let result = tokio::task::spawn_blocking(move || sink.write(b"late"))
            .await
            .unwrap();
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::BrokenPipe);
    }
}
