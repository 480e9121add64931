use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use opsdeck_core::jd::JdAnalysis;
use tokio::sync::mpsc;

use crate::error::ApiError;
use crate::ndjson::{parse_line, AnalysisEvent, LineDecoder};
use crate::Result;

// ─── AnalysisStream ───────────────────────────────────────────────────────

/// An async stream of [`AnalysisEvent`]s from one analysis response.
///
/// Backed by a Tokio mpsc channel. A background task owns the HTTP response
/// body and forwards decoded envelopes until it sees a terminal `result` or
/// `error` event, or the body ends. Dropping `AnalysisStream` closes the
/// receiver, which stops the background task on its next send.
pub struct AnalysisStream {
    rx: mpsc::Receiver<Result<AnalysisEvent>>,
}

impl AnalysisStream {
    pub(crate) fn from_response(response: reqwest::Response) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(forward_body(Box::pin(response.bytes_stream()), tx));
        AnalysisStream { rx }
    }

    /// Test-only constructor: decode a fixed sequence of body chunks.
    #[cfg(test)]
    pub(crate) fn from_chunks(chunks: Vec<Vec<u8>>) -> Self {
        let (tx, rx) = mpsc::channel(32);
        let body = futures::stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(Bytes::from(c))),
        );
        tokio::spawn(forward_body(body, tx));
        AnalysisStream { rx }
    }

    /// Test-only constructor: wrap a raw mpsc receiver.
    #[cfg(test)]
    pub(crate) fn from_channel(rx: mpsc::Receiver<Result<AnalysisEvent>>) -> Self {
        Self { rx }
    }
}

impl Stream for AnalysisStream {
    type Item = Result<AnalysisEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

/// Pump a chunked body through the line decoder into the channel.
///
/// Stops at the first terminal envelope; anything the server writes after it
/// is never decoded. At end-of-body the unterminated tail is parsed once as
/// a final candidate envelope.
async fn forward_body<S, E>(mut body: S, tx: mpsc::Sender<Result<AnalysisEvent>>)
where
    S: Stream<Item = std::result::Result<Bytes, E>> + Unpin,
    E: Into<ApiError>,
{
    let mut decoder = LineDecoder::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(c) => c,
            Err(e) => {
                let _ = tx.send(Err(e.into())).await;
                return;
            }
        };
        for line in decoder.feed(&chunk) {
            let Some(event) = parse_line(&line) else {
                continue;
            };
            let terminal = event.is_terminal();
            if tx.send(Ok(event)).await.is_err() {
                return; // receiver dropped
            }
            if terminal {
                return;
            }
        }
    }

    if let Some(line) = decoder.finish() {
        if let Some(event) = parse_line(&line) {
            let _ = tx.send(Ok(event)).await;
        }
    }
}

// ─── Collector ────────────────────────────────────────────────────────────

/// Drive an [`AnalysisStream`] to completion.
///
/// `on_stage` fires for every progress envelope. Returns the decoded result
/// payload, an [`ApiError::Analysis`] for an in-band error envelope, or
/// [`ApiError::NoAnalysisData`] when the stream ends without a result.
pub async fn collect_analysis<F>(stream: AnalysisStream, mut on_stage: F) -> Result<JdAnalysis>
where
    F: FnMut(&str),
{
    let mut stream = stream;

    while let Some(event) = stream.next().await {
        match event? {
            AnalysisEvent::Progress { stage } => {
                tracing::debug!(stage = %stage, "analysis progress");
                on_stage(&stage);
            }
            AnalysisEvent::Result { data } => {
                let line = data.to_string();
                return serde_json::from_value(data)
                    .map_err(|source| ApiError::Parse { line, source });
            }
            AnalysisEvent::Error {
                error,
                details,
                user_message,
            } => {
                return Err(ApiError::Analysis {
                    message: error,
                    details,
                    user_message,
                });
            }
        }
    }

    Err(ApiError::NoAnalysisData)
}

// ─── Tests ────────────────────────────────────────────────────────────────
