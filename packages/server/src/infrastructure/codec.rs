//! Newline-delimited framing for the relay's text protocol.
//!
//! TCP delivers a byte stream, so a single read may carry half a line or
//! several lines. `LineReader` buffers partial reads until a full line is
//! available.

use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// Upper bound on a single framed line. Bytes past the bound are discarded up
/// to the next newline.
pub const DEFAULT_MAX_LINE_BYTES: usize = 4096;

/// Reads newline-terminated lines from a byte stream.
pub struct LineReader<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    max_line_bytes: usize,
}

impl<R> LineReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(inner: R) -> Self {
        Self::with_limit(inner, DEFAULT_MAX_LINE_BYTES)
    }

    pub fn with_limit(inner: R, max_line_bytes: usize) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
            max_line_bytes,
        }
    }

    /// Read the next line, without its `\n` / `\r\n` terminator.
    ///
    /// Returns `Ok(None)` at end of stream. An unterminated trailing line is
    /// returned before that. Invalid UTF-8 is replaced lossily.
    ///
    /// Cancel safe: bytes already consumed from the stream stay buffered in
    /// the reader and are picked up by the next call.
    pub async fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            let available = self.reader.fill_buf().await?;
            if available.is_empty() {
                if self.pending.is_empty() {
                    return Ok(None);
                }
                return Ok(Some(self.take_pending()));
            }

            let newline = available.iter().position(|byte| *byte == b'\n');
            let chunk_len = newline.unwrap_or(available.len());
            let room = self.max_line_bytes.saturating_sub(self.pending.len());
            self.pending
                .extend_from_slice(&available[..chunk_len.min(room)]);

            match newline {
                Some(position) => {
                    self.reader.consume(position + 1);
                    return Ok(Some(self.take_pending()));
                }
                None => {
                    self.reader.consume(chunk_len);
                }
            }
        }
    }

    fn take_pending(&mut self) -> String {
        let bytes = std::mem::take(&mut self.pending);
        let mut line = String::from_utf8_lossy(&bytes).into_owned();
        if line.ends_with('\r') {
            line.pop();
        }
        line
    }
}

/// Write `line` followed by a newline and flush.
pub async fn write_line<W>(writer: &mut W, line: &str) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = Vec::with_capacity(line.len() + 1);
    encoded.extend_from_slice(line.as_bytes());
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await
}
