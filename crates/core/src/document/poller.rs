//! Upload poll loop
//!
//! Re-fetches a document until the server reports a terminal progress, the
//! caller's context ends, or a fetch fails.
//!
//! ```text
//! Submitted ──► Fetched ──► Polling ──┬──► Done       (progress terminal)
//!                                     ├──► Failed     (fetch error)
//!                                     ├──► TimedOut   (deadline exceeded)
//!                                     └──► Cancelled  (context cancelled)
//! ```
//!
//! The loop runs in its own task and reports once over a oneshot channel.
//! The task works on a child of the caller's context, so it stops as soon as
//! the caller stops waiting.

use std::sync::Arc;
use std::time::Duration;

use giniapi_common::context::{Context, ContextError};
use giniapi_domain::{impl_wire_name_conversions, Document};
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, instrument, warn};

use super::ports::DocumentSource;

/// Lifecycle of an uploaded document as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollState {
    /// Create request accepted by the server
    Submitted,
    /// Initial fetch after upload succeeded
    Fetched,
    /// Waiting for a terminal progress
    Polling,
    /// Terminal progress observed
    Done,
    /// A fetch failed
    Failed,
    /// Context deadline exceeded before a terminal progress
    TimedOut,
    /// Context cancelled before a terminal progress
    Cancelled,
}

impl_wire_name_conversions!(PollState {
    Submitted => "submitted",
    Fetched => "fetched",
    Polling => "polling",
    Done => "done",
    Failed => "failed",
    TimedOut => "timed_out",
    Cancelled => "cancelled",
});

impl From<ContextError> for PollState {
    fn from(err: ContextError) -> Self {
        match err {
            ContextError::Cancelled => Self::Cancelled,
            ContextError::DeadlineExceeded => Self::TimedOut,
        }
    }
}

/// How a poll loop ended
#[derive(Debug)]
pub enum PollOutcome<M, E> {
    /// Terminal progress reached; carries the metadata of the last fetch
    Completed(M),
    /// A fetch failed; no further fetches were made
    Failed(E),
    /// The caller's context ended first
    Aborted(ContextError),
}

impl<M, E> PollOutcome<M, E> {
    /// Final state corresponding to this outcome.
    pub fn state(&self) -> PollState {
        match self {
            Self::Completed(_) => PollState::Done,
            Self::Failed(_) => PollState::Failed,
            Self::Aborted(err) => PollState::from(*err),
        }
    }
}

enum Step<M, E> {
    Terminal(Document, M),
    Failed(E),
    Aborted(ContextError),
}

/// Poll `document` until its progress is terminal.
///
/// On [`PollOutcome::Completed`] the document is replaced by the last fetched
/// snapshot. Its owner and upload duration are carried over and the
/// processing duration is set to the time spent polling. On any other outcome
/// the document is left untouched.
///
/// Without a deadline on `ctx` and without a terminal progress this never
/// returns.
#[instrument(skip_all, fields(document_id = %document.id, pause_ms = pause.as_millis()))]
pub async fn poll_until_terminal<S>(
    source: Arc<S>,
    ctx: &Context,
    document: &mut Document,
    pause: Duration,
) -> PollOutcome<S::Meta, S::Error>
where
    S: DocumentSource,
{
    if let Some(err) = ctx.err() {
        debug!(state = %PollState::from(err), "context ended before polling");
        return PollOutcome::Aborted(err);
    }

    let started = Instant::now();
    let worker = ctx.child();
    let (tx, rx) = oneshot::channel();

    let url = document.links.document.clone();
    let owner = document.owner.clone();
    let task_ctx = worker.clone();
    let task_owner = owner.clone();
    tokio::spawn(async move {
        let step = poll_loop(source.as_ref(), &task_ctx, &url, &task_owner, pause).await;
        // Receiver is gone when the caller already gave up.
        let _ = tx.send(step);
    });

    debug!(state = %PollState::Polling, "poll loop started");

    let step = tokio::select! {
        biased;
        received = rx => match received {
            Ok(step) => step,
            Err(_) => {
                warn!("poll task ended without reporting");
                Step::Aborted(ContextError::Cancelled)
            }
        },
        err = ctx.done() => Step::Aborted(err),
    };
    // Stops the task if it is still running.
    worker.cancel();

    match step {
        Step::Terminal(fetched, meta) => {
            let upload = document.timing.upload;
            *document = fetched;
            document.owner = owner;
            document.timing.upload = upload;
            document.timing.processing = started.elapsed();
            debug!(
                state = %PollState::Done,
                progress = %document.progress,
                processing_ms = document.timing.processing.as_millis(),
                "poll loop finished"
            );
            PollOutcome::Completed(meta)
        }
        Step::Failed(err) => {
            debug!(state = %PollState::Failed, "fetch failed while polling");
            PollOutcome::Failed(err)
        }
        Step::Aborted(err) => {
            debug!(state = %PollState::from(err), "poll loop aborted");
            PollOutcome::Aborted(err)
        }
    }
}

async fn poll_loop<S>(
    source: &S,
    ctx: &Context,
    url: &str,
    owner: &str,
    pause: Duration,
) -> Step<S::Meta, S::Error>
where
    S: DocumentSource,
{
    let mut attempt: u64 = 0;
    loop {
        if let Some(err) = ctx.err() {
            return Step::Aborted(err);
        }

        attempt = attempt.saturating_add(1);
        match ctx.run(source.fetch_document(ctx, url, owner)).await {
            Err(err) => return Step::Aborted(err),
            Ok(Err(err)) => return Step::Failed(err),
            Ok(Ok((document, meta))) => {
                if document.is_ready() {
                    debug!(attempt, progress = %document.progress, "terminal progress");
                    return Step::Terminal(document, meta);
                }
                debug!(attempt, progress = %document.progress, "document not ready");
            }
        }

        if let Err(err) = ctx.sleep(pause).await {
            return Step::Aborted(err);
        }
    }
}
