//! Merges the engine's stdout and stderr into one ordered feed.
//!
//! Each stream is read by its own task and forwarded into a shared channel as
//! soon as bytes arrive, so text of one stream keeps its order while the
//! interleaving of the two follows whatever the OS delivers first. Progress
//! messages without a line terminator are not held back.

use log::warn;
use tokio::{
    io::{AsyncRead, AsyncReadExt},
    process::{ChildStderr, ChildStdout},
    sync::mpsc,
    task::JoinHandle,
};

use crate::state::StreamKind;

#[derive(Debug)]
pub(crate) struct OutputChunk {
    pub stream: StreamKind,
    pub text: String,
}

/// Receiving side of the merged feed plus the reader tasks feeding it.
///
/// The receiver yields `None` once both streams reach end of file.
pub(crate) struct Multiplexer {
    rx: mpsc::UnboundedReceiver<OutputChunk>,
    readers: Vec<JoinHandle<()>>,
}

impl Multiplexer {
    pub fn new(stdout: Option<ChildStdout>, stderr: Option<ChildStderr>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut readers = Vec::with_capacity(2);
        if let Some(stdout) = stdout {
            readers.push(tokio::spawn(pump(stdout, StreamKind::Stdout, tx.clone())));
        }
        if let Some(stderr) = stderr {
            readers.push(tokio::spawn(pump(stderr, StreamKind::Stderr, tx.clone())));
        }
        Self { rx, readers }
    }

    /// Next chunk from either stream; cancel safe.
    pub async fn recv(&mut self) -> Option<OutputChunk> {
        self.rx.recv().await
    }

    /// Stop reading. Chunks not yet received are dropped.
    pub fn close(&mut self) {
        for reader in self.readers.drain(..) {
            reader.abort();
        }
        self.rx.close();
    }
}

impl Drop for Multiplexer {
    fn drop(&mut self) {
        self.close();
    }
}

const READ_BUFFER_SIZE: usize = 8 * 1024;

async fn pump<R>(mut reader: R, stream: StreamKind, tx: mpsc::UnboundedSender<OutputChunk>)
where
    R: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; READ_BUFFER_SIZE];
    // Bytes of a UTF-8 sequence split across two reads.
    let mut pending = Vec::new();
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                pending.extend_from_slice(&buf[..n]);
                let complete = pending.len() - incomplete_tail(&pending);
                if complete == 0 {
                    continue;
                }
                let text = String::from_utf8_lossy(&pending[..complete]).into_owned();
                pending.drain(..complete);
                if tx.send(OutputChunk { stream, text }).is_err() {
                    return;
                }
            }
            Err(e) => {
                warn!("Failed to read engine {stream:?}: {e}");
                break;
            }
        }
    }
    if !pending.is_empty() {
        let text = String::from_utf8_lossy(&pending).into_owned();
        let _ = tx.send(OutputChunk { stream, text });
    }
}

/// Length of a trailing, not yet complete UTF-8 sequence in `bytes`.
fn incomplete_tail(bytes: &[u8]) -> usize {
    for back in 1..=bytes.len().min(3) {
        let byte = bytes[bytes.len() - back];
        if byte & 0xC0 == 0x80 {
            continue;
        }
        let width = match byte {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return 0,
        };
        return if width > back { back } else { 0 };
    }
    0
}
