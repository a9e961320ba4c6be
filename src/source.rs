// src/source.rs
// =============================================================================
// This module reads candidate URLs, one per line, from any async reader.
//
// Rules:
// - Lines are split on '\n'; a trailing '\r' is dropped (Windows files)
// - The last line is returned even if the file doesn't end with a newline
// - Blank lines are returned as empty strings, we don't validate anything here
// - A line longer than MAX_LINE_LEN is an error, not a truncation
//
// The framing itself is done by tokio-util's LinesCodec, we only map its
// errors to ours.
//
// Rust concepts:
// - Generics with trait bounds: LineSource works with files, sockets, byte slices
// - Option inside Result: Ok(None) means "end of input", which is not an error
// - Streams: FramedRead turns a byte reader into a stream of lines
// =============================================================================

use std::io;

use futures::StreamExt;
use thiserror::Error;
use tokio::io::AsyncRead;
use tokio_util::codec::{FramedRead, LinesCodec, LinesCodecError};

/// Longest line we accept, in bytes (the '\n' excluded, a trailing '\r' included).
pub const MAX_LINE_LEN: usize = 64 * 1024;

/// Errors produced while reading the URL source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A single entry is longer than the maximum line length
    #[error("URL entry is longer than {limit} bytes")]
    TooLong { limit: usize },

    /// The underlying reader failed (or the line is not valid UTF-8)
    #[error("failed to read URL source: {0}")]
    Io(#[from] io::Error),
}

// Reads lines from an async reader
//
// It keeps at most one line (plus the codec's read buffer) in memory,
// so a huge input file is read lazily, batch by batch.
pub struct LineSource<R> {
    lines: FramedRead<R, LinesCodec>,
}

impl<R: AsyncRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LEN)),
        }
    }

    /// Returns the next line, `Ok(None)` once the input is exhausted.
    pub async fn next_line(&mut self) -> Result<Option<String>, SourceError> {
        match self.lines.next().await {
            None => Ok(None),
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(LinesCodecError::MaxLineLengthExceeded)) => Err(SourceError::TooLong {
                limit: MAX_LINE_LEN,
            }),
            Some(Err(LinesCodecError::Io(e))) => Err(SourceError::Io(e)),
        }
    }
}
