//! Background import runs with progress events and cancellation.
//!
//! ```text
//!  caller                                  worker (spawn_blocking)
//!  ──────                                  ───────────────────────
//!  Importer::start(text, config) ───────▶  run_stages(text, config)
//!  handle.events()  ◀── ImportEvent ─────  one per stage boundary
//!  handle.cancel()  ─── watch(true) ─────▶ probed at every boundary
//!  handle.finish().await ◀── Result ─────  worker returns
//! ```
//!
//! The worker owns its input and every stage record; the caller only ever
//! sees messages. At most one run is active per [`Importer`]: starting a new
//! run cancels the previous one.
//!
//! Cancellation is cooperative at stage boundaries. [`ImportHandle::finish`]
//! resolves to [`ImportError::Cancelled`] as soon as the token fires; the
//! worker thread notices at its next boundary, emits nothing more, and exits.

use crate::config::ImportConfig;
use crate::document::ImportedDocument;
use crate::error::ImportError;
use crate::pipeline::run_stages;
use crate::progress::ImportEvent;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::Stream;
use tracing::debug;

// ── Cancellation token ───────────────────────────────────────────────────

/// Requests cancellation of one run. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ImportCanceller {
    tx: Arc<watch::Sender<bool>>,
}

impl ImportCanceller {
    fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Cancel the run. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so this only returns once the flag is set.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

// ── Event stream ─────────────────────────────────────────────────────────

/// Progress events of one run, in stage order.
///
/// Ends after the terminal event (`Done` / `Error`), or immediately once the
/// run is cancelled.
pub struct ImportEventStream {
    inner: UnboundedReceiverStream<ImportEvent>,
    canceller: ImportCanceller,
}

impl Stream for ImportEventStream {
    type Item = ImportEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<ImportEvent>> {
        if self.canceller.is_cancelled() {
            return Poll::Ready(None);
        }
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

// ── Handle ───────────────────────────────────────────────────────────────

/// One in-flight import. Dropping it before [`finish`](Self::finish)
/// completes cancels the run.
pub struct ImportHandle {
    events: Option<ImportEventStream>,
    worker: Option<JoinHandle<Result<ImportedDocument, ImportError>>>,
    canceller: ImportCanceller,
    settled: bool,
}

impl ImportHandle {
    /// Take the progress event stream. Returns `None` after the first call.
    pub fn events(&mut self) -> Option<ImportEventStream> {
        self.events.take()
    }

    /// A token that can cancel this run from elsewhere.
    pub fn canceller(&self) -> ImportCanceller {
        self.canceller.clone()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// Wait for the final document.
    ///
    /// Resolves to [`ImportError::Cancelled`] as soon as the run is cancelled,
    /// without waiting for the worker to reach its next stage boundary.
    pub async fn finish(mut self) -> Result<ImportedDocument, ImportError> {
        let Some(worker) = self.worker.take() else {
            return Err(ImportError::Internal("import already finished".into()));
        };
        let canceller = self.canceller.clone();

        let result = tokio::select! {
            biased;
            _ = canceller.cancelled() => Err(ImportError::Cancelled),
            joined = worker => match joined {
                Ok(result) => result,
                Err(e) => Err(ImportError::Internal(format!("Import worker panicked: {e}"))),
            },
        };
        self.settled = true;
        result
    }
}

impl Drop for ImportHandle {
    fn drop(&mut self) {
        if !self.settled {
            self.canceller.cancel();
        }
    }
}

// ── Importer ─────────────────────────────────────────────────────────────

/// Starts imports on a background worker, one active run at a time.
///
/// # Example
/// ```rust
/// use edgequake_svg2path::{ImportConfig, ImportEvent, Importer};
/// use futures::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let importer = Importer::new();
/// let mut handle = importer.start(
///     r#"<svg><path d="M0 0 L10 0"/></svg>"#,
///     ImportConfig::default(),
/// );
/// let events = handle.events().unwrap();
/// let doc = handle.finish().await.unwrap();
/// let seen: Vec<ImportEvent> = events.collect().await;
/// assert_eq!(seen.last(), Some(&ImportEvent::Done));
/// assert_eq!(doc.paths.len(), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Importer {
    current: Mutex<Option<ImportCanceller>>,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start importing `text`, cancelling any run this importer started
    /// before.
    ///
    /// # Panics
    /// Must be called from within a Tokio runtime.
    pub fn start(&self, text: impl Into<String>, config: ImportConfig) -> ImportHandle {
        let canceller = ImportCanceller::new();
        if let Some(previous) = self.swap_current(Some(canceller.clone())) {
            if !previous.is_cancelled() {
                debug!("Cancelling previous import run");
            }
            previous.cancel();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let text = text.into();
        let token = canceller.clone();

        let worker = tokio::task::spawn_blocking(move || {
            let callback = config.progress_callback.clone();
            run_stages(
                &text,
                &config,
                |event| {
                    if token.is_cancelled() {
                        return;
                    }
                    if let Some(cb) = &callback {
                        cb.on_event(&event);
                    }
                    // The caller may have dropped the stream; that is fine.
                    let _ = tx.send(event);
                },
                || token.is_cancelled(),
            )
        });

        ImportHandle {
            events: Some(ImportEventStream {
                inner: UnboundedReceiverStream::new(rx),
                canceller: canceller.clone(),
            }),
            worker: Some(worker),
            canceller,
            settled: false,
        }
    }

    /// Cancel the active run, if any.
    pub fn cancel(&self) {
        if let Some(current) = self.swap_current(None) {
            current.cancel();
        }
    }

    fn swap_current(&self, next: Option<ImportCanceller>) -> Option<ImportCanceller> {
        let mut guard = self
            .current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    const LINE: &str = r#"<svg><path d="M0 0 L10 0"/></svg>"#;

    #[tokio::test]
    async fn successful_run_streams_all_events() {
        let importer = Importer::new();
        let mut handle = importer.start(LINE, ImportConfig::default());
        let events = handle.events().unwrap();
        assert!(handle.events().is_none());

        let doc = handle.finish().await.unwrap();
        let labels: Vec<&str> = events.map(|e| e.label()).collect().await;
        assert_eq!(
            labels,
            vec!["sanitize", "parse", "extract", "flatten", "validate", "normalize", "done"]
        );
        assert_eq!(doc.paths[0].d, "M0 0 L10 0");
    }

    #[tokio::test]
    async fn failure_is_not_cancellation() {
        let importer = Importer::new();
        let mut handle = importer.start(r#"<svg width="1em"/>"#, ImportConfig::default());
        let events = handle.events().unwrap();
        let err = handle.finish().await.unwrap_err();
        assert!(!err.is_cancelled());
        let last = events.collect::<Vec<_>>().await.pop().unwrap();
        assert!(matches!(last, ImportEvent::Error { .. }));
    }

    #[tokio::test]
    async fn cancel_before_finish_rejects_with_cancelled() {
        let importer = Importer::new();
        let handle = importer.start(LINE, ImportConfig::default());
        handle.cancel();
        let err = handle.finish().await.unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn canceller_is_shared() {
        let c = ImportCanceller::new();
        let other = c.clone();
        assert!(!c.is_cancelled());
        other.cancel();
        assert!(c.is_cancelled());
    }
}
