// src/sink/table.rs
// =============================================================================
// Writes results as a fixed-width text table:
//
//   URL                                 STATUS    TIMESTAMP
//   https://www.rust-lang.org              200    2024-05-01T10:00:00.123Z
//
// The header is written as soon as the sink is created, so even an empty
// crawl leaves a file with column labels in it. Every row is flushed as soon
// as it is written: a crawl that fails or is interrupted keeps the rows it
// already stored.
// =============================================================================

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use super::{Sink, SinkError};
use crate::crawler::CrawlResult;

pub struct TableSink<W: AsyncWrite> {
    output: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin + Send + 'static> TableSink<W> {
    /// Wraps `output` and writes the header line.
    pub async fn new(output: W) -> Result<Self, SinkError> {
        let mut output = BufWriter::new(output);
        output.write_all(header().as_bytes()).await?;
        output.flush().await?;
        Ok(Self { output })
    }

    /// Gives back the wrapped writer.
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.output.into_inner()
    }
}

fn header() -> String {
    format!("{:<35} {} {:>12}\n", "URL", "STATUS", "TIMESTAMP")
}

fn row(result: &CrawlResult) -> String {
    format!(
        "{:<35} {:>6}    {}\n",
        result.url,
        result.status,
        result.timestamp_rfc3339()
    )
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send + 'static> Sink for TableSink<W> {
    async fn store_result(&mut self, result: &CrawlResult) -> Result<(), SinkError> {
        self.output.write_all(row(result).as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), SinkError> {
        self.output.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> CrawlResult {
        CrawlResult {
            url: "https://www.rust-lang.org".to_string(),
            status: 200,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_header_only() {
        let mut sink = TableSink::new(Vec::new()).await.unwrap();
        sink.flush().await.unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "URL                                 STATUS    TIMESTAMP\n");
    }

    #[tokio::test]
    async fn test_store_result_row() {
        let mut sink = TableSink::new(Vec::new()).await.unwrap();
        sink.store_result(&sample()).await.unwrap();
        sink.flush().await.unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "https://www.rust-lang.org              200    2024-05-01T10:00:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_rows_reach_the_file_without_final_flush() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let file = tokio::fs::File::create(&path).await.unwrap();

        let mut sink = TableSink::new(file).await.unwrap();
        sink.store_result(&sample()).await.unwrap();
        drop(sink);

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.lines().nth(1).unwrap().starts_with("https://www.rust-lang.org"));
    }

    #[tokio::test]
    async fn test_long_url_is_not_truncated() {
        let mut result = sample();
        result.url = format!("https://example.com/{}", "a".repeat(60));
        result.status = 404;

        let mut sink = TableSink::new(Vec::new()).await.unwrap();
        sink.store_result(&result).await.unwrap();
        sink.flush().await.unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with(&result.url));
        assert!(last.contains("    404    "));
    }
}
