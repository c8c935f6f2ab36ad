// SPDX-License-Identifier: Apache-2.0

use axum::body::Bytes;
use std::io::{self, Write};
use tokio::sync::mpsc;
use tracing::error;

pub(crate) type BodyChunk = Result<Bytes, io::Error>;

/// Bytes written per channel message.
pub(crate) const CHUNK_BYTES: usize = 8 * 1024;

/// Blocking `Write` sink that forwards every chunk to an async response body.
/// Fails with `BrokenPipe` once the receiving side is gone.
pub(crate) struct ChannelWriter {
    tx: mpsc::Sender<BodyChunk>,
}

impl ChannelWriter {
    pub(crate) fn new(tx: mpsc::Sender<BodyChunk>) -> Self {
        Self { tx }
    }

    /// Terminates the body with an error so the client sees a truncated
    /// transfer instead of a document that looks complete.
    pub(crate) fn abort(&self, reason: &str) {
        let _ = self
            .tx
            .blocking_send(Err(io::Error::new(io::ErrorKind::Other, reason.to_string())));
    }
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.tx
            .blocking_send(Ok(Bytes::copy_from_slice(buf)))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "response body closed"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `job` on the blocking pool against a sink feeding `tx`. A panicking
/// job still terminates the body with an error chunk.
pub(crate) fn spawn_body_writer<F>(tx: mpsc::Sender<BodyChunk>, job: F)
where
    F: FnOnce(ChannelWriter) + Send + 'static,
{
    let guard = tx.clone();
    let handle = tokio::task::spawn_blocking(move || job(ChannelWriter::new(tx)));
    tokio::spawn(async move {
        if let Err(err) = handle.await {
            error!(error = %err, "body writer task failed");
            let _ = guard
                .send(Err(io::Error::new(io::ErrorKind::Other, "body writer failed")))
                .await;
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_arrive_in_order() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut writer = ChannelWriter::new(tx);
        writer.write_all(b"%PDF").expect("write");
        writer.write_all(b"-1.5").expect("write");
        drop(writer);
        let mut got = Vec::new();
        while let Some(chunk) = rx.blocking_recv() {
            got.extend_from_slice(&chunk.expect("chunk"));
        }
        assert_eq!(got, b"%PDF-1.5");
    }

    #[test]
    fn dropped_receiver_surfaces_broken_pipe() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut writer = ChannelWriter::new(tx);
        let err = writer.write(b"x").expect_err("closed");
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[tokio::test]
    async fn panicking_writer_ends_body_with_error_chunk() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_body_writer(tx, |mut writer| {
            writer.write_all(b"%PDF").expect("write");
            panic!("renderer bug");
        });
        let first = rx.recv().await.expect("first chunk").expect("data chunk");
        assert_eq!(&first[..], b"%PDF");
        let last = rx.recv().await.expect("terminal chunk");
        assert!(last.is_err());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn finished_writer_closes_body_cleanly() {
        let (tx, mut rx) = mpsc::channel(4);
        spawn_body_writer(tx, |mut writer| {
            writer.write_all(b"%%EOF").expect("write");
        });
        let chunk = rx.recv().await.expect("chunk").expect("data chunk");
        assert_eq!(&chunk[..], b"%%EOF");
        assert!(rx.recv().await.is_none());
    }
}
