//! Runs conversion requests on a tokio runtime and hands results back to the UI thread.

use std::io;

use cmconv_core::{ConversionClient, ConversionRequest, ConversionResult};
use tokio::runtime::Runtime;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

/// Bridge between the async runtime and egui's frame loop.
///
/// Holds at most one pending result; the controller never starts a second
/// request while one is outstanding.
pub struct AsyncBridge {
    /// Wrapped in Option so Drop can shut it down without blocking.
    runtime: Option<Runtime>,

    pending: Option<oneshot::Receiver<ConversionResult>>,
}

impl AsyncBridge {
    pub fn new() -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("cmconv-io")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime: Some(runtime),
            pending: None,
        })
    }

    /// Send `request` in the background and wake the UI when it finishes.
    pub fn spawn_conversion(
        &mut self,
        client: ConversionClient,
        request: ConversionRequest,
        repaint: egui::Context,
    ) {
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        let (tx, rx) = oneshot::channel();
        runtime.spawn(async move {
            let result = client.convert(&request).await;
            let _ = tx.send(result);
            repaint.request_repaint();
        });
        self.pending = Some(rx);
    }

    /// The finished result, if the background request is done.
    pub fn poll_result(&mut self) -> Option<ConversionResult> {
        let rx = self.pending.as_mut()?;
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => ConversionResult::Failure {
                message: "conversion task stopped before responding".to_string(),
            },
        };
        self.pending = None;
        Some(result)
    }
}

impl Drop for AsyncBridge {
    fn drop(&mut self) {
        // Dropping a runtime from inside another runtime's context panics.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}
