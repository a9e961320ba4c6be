// src/sink/json.rs
// Writes one JSON object per result, one per line (JSON Lines).
// Each line is flushed right away, like the table output.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use super::{Sink, SinkError};
use crate::crawler::CrawlResult;

pub struct JsonLinesSink<W: AsyncWrite> {
    output: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin + Send + 'static> JsonLinesSink<W> {
    pub fn new(output: W) -> Self {
        Self {
            output: BufWriter::new(output),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> Sink for JsonLinesSink<W> {
    async fn store_result(&mut self, result: &CrawlResult) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(result)?;
        line.push(b'\n');
        self.output.write_all(&line).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.output.flush().await?;
        Ok(())
    }
}
