//! Document wrapper that runs monitor timers on tokio

use std::time::Duration;

use tokio::sync::mpsc;

use crate::document::{Document, FullscreenApi, Listener, TimerTask};
use crate::error::FullscreenError;

/// Delegates to the wrapped document, except that scheduled timers become
/// `tokio::time::sleep` tasks which report back through a channel
///
/// `schedule` must be called from inside a tokio runtime.
pub struct TimerBridge<D> {
    inner: D,
    timers: mpsc::UnboundedSender<TimerTask>,
}

impl<D> TimerBridge<D> {
    pub fn new(inner: D, timers: mpsc::UnboundedSender<TimerTask>) -> Self {
        Self { inner, timers }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Document> Document for TimerBridge<D> {
    fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }

    fn supports(&self, api: FullscreenApi) -> bool {
        self.inner.supports(api)
    }

    fn fullscreen_element_present(&self, api: FullscreenApi) -> bool {
        self.inner.fullscreen_element_present(api)
    }

    fn request_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        self.inner.request_fullscreen(api)
    }

    fn exit_fullscreen(&mut self, api: FullscreenApi) -> Result<(), FullscreenError> {
        self.inner.exit_fullscreen(api)
    }

    fn add_listener(&mut self, listener: Listener) {
        self.inner.add_listener(listener);
    }

    fn remove_listener(&mut self, listener: Listener) {
        self.inner.remove_listener(listener);
    }

    fn schedule(&mut self, delay: Duration, task: TimerTask) {
        let timers = self.timers.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver is gone once the driver has shut down
            let _ = timers.send(task);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::SimulatedDocument;

    #[tokio::test(start_paused = true)]
    async fn schedule_delivers_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut bridge = TimerBridge::new(SimulatedDocument::new(), tx);

        let start = tokio::time::Instant::now();
        bridge.schedule(Duration::from_millis(50), TimerTask::FullscreenRetry);

        assert_eq!(rx.recv().await, Some(TimerTask::FullscreenRetry));
        assert!(start.elapsed() >= Duration::from_millis(50));
        assert_eq!(bridge.inner().pending_timers(), 0);
    }

    #[test]
    fn delegates_listeners() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut bridge = TimerBridge::new(SimulatedDocument::new(), tx);
        bridge.add_listener(Listener::Blur);
        assert!(bridge.inner().has_listener(Listener::Blur));
        bridge.remove_listener(Listener::Blur);
        assert!(!bridge.inner().has_listener(Listener::Blur));
    }
}
