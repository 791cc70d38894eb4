//! Newline-delimited JSON enrichment loop.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::MAX_LINE_PREVIEW_CHARS;
use crate::enrich::{Enricher, ProcessedHook, RecordOutcome};
use crate::record::Record;
use crate::whois::DirectoryClient;

/// Counters for one pass over an input stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamTotals {
    /// Records handed back by the enrichment stage
    pub records: usize,
    /// Records with at least one lookup field enriched
    pub enriched: usize,
    /// Records rejected by the sampler
    pub sampled_out: usize,
    /// Input lines that were not JSON objects
    pub malformed: usize,
}

enum LineResult {
    Processed(Record, RecordOutcome),
    Malformed,
    Skipped,
}

/// Enriches every JSON object line of `reader` and writes it to `writer`.
///
/// Up to `max_concurrency` records are in flight at once; output order
/// matches input order. Blank lines are skipped, lines that are not UTF-8
/// JSON objects are logged and dropped. Only I/O failures end the stream.
pub async fn enrich_stream<C, R, W>(
    enricher: &Enricher<C>,
    reader: R,
    writer: &mut W,
    max_concurrency: usize,
) -> Result<StreamTotals>
where
    C: DirectoryClient,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let processed = AtomicUsize::new(0);
    let hook = |_: &mut Record| {
        processed.fetch_add(1, Ordering::Relaxed);
    };

    // Raw segments: a line that is not UTF-8 must not end the stream
    let lines = stream::unfold(reader.split(b'\n'), |mut segments| async move {
        match segments.next_segment().await {
            Ok(Some(line)) => Some((Ok(line), segments)),
            Ok(None) => None,
            Err(e) => Some((Err(e), segments)),
        }
    });

    let results = lines
        .map(|line| process_line(enricher, &hook, line))
        .buffered(max_concurrency.max(1));
    let mut results = std::pin::pin!(results);

    let mut totals = StreamTotals::default();
    while let Some(result) = results.next().await {
        match result? {
            LineResult::Processed(record, outcome) => {
                if outcome.sampled_out {
                    totals.sampled_out += 1;
                }
                if outcome.enriched_fields() > 0 {
                    totals.enriched += 1;
                }
                let mut out =
                    serde_json::to_string(&record).context("Failed to serialize record")?;
                out.push('\n');
                writer
                    .write_all(out.as_bytes())
                    .await
                    .context("Failed to write record")?;
            }
            LineResult::Malformed => totals.malformed += 1,
            LineResult::Skipped => {}
        }
    }
    writer.flush().await.context("Failed to flush output")?;

    totals.records = processed.load(Ordering::Relaxed);
    Ok(totals)
}

async fn process_line<C: DirectoryClient, H: ProcessedHook>(
    enricher: &Enricher<C>,
    hook: &H,
    line: std::io::Result<Vec<u8>>,
) -> Result<LineResult> {
    let bytes = line.context("Failed to read line from input")?;
    let line = match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => {
            let lossy = String::from_utf8_lossy(e.as_bytes()).into_owned();
            log::warn!(
                "Skipping line that is not valid UTF-8 ({}): {}",
                e.utf8_error(),
                preview(&lossy)
            );
            return Ok(LineResult::Malformed);
        }
    };
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(LineResult::Skipped);
    }
    let Some(mut record) = parse_record(trimmed) else {
        return Ok(LineResult::Malformed);
    };
    let outcome = enricher.process(&mut record, hook).await;
    Ok(LineResult::Processed(record, outcome))
}

fn parse_record(line: &str) -> Option<Record> {
    match serde_json::from_str::<Value>(line) {
        Ok(value) => match Record::try_from(value) {
            Ok(record) => Some(record),
            Err(_) => {
                log::warn!("Skipping non-object JSON line: {}", preview(line));
                None
            }
        },
        Err(e) => {
            log::warn!("Skipping malformed JSON line ({}): {}", e, preview(line));
            None
        }
    }
}

fn preview(line: &str) -> String {
    if line.chars().count() <= MAX_LINE_PREVIEW_CHARS {
        line.to_string()
    } else {
        let head: String = line.chars().take(MAX_LINE_PREVIEW_CHARS).collect();
        format!("{head}...")
    }
}
