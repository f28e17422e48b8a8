//! Spinner primitives for the waiting indicator.
//!
//! The spinner runs as its own tokio task. The event consumer talks to it only
//! through [`SpinnerHandoff`]: a "stop" signal one way and a "cleared"
//! confirmation back, each a oneshot channel.

use crate::tui::settings;
use crate::ui::render::DisplaySurface;
use crossterm::style::Stylize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Two-signal handoff between the event consumer and the spinner task.
pub struct SpinnerHandoff {
    stop: Option<oneshot::Sender<()>>,
    cleared: oneshot::Receiver<()>,
    task: JoinHandle<()>,
}

impl SpinnerHandoff {
    /// Spawn the spinner tick loop on the current runtime.
    pub fn spawn<S>(surface: Arc<S>, label: impl Into<String>) -> Self
    where
        S: DisplaySurface + ?Sized + 'static,
    {
        let label = label.into();
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let (cleared_tx, cleared_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let start = Instant::now();
            let color = surface.color();
            let mut ticker = tokio::time::interval(Duration::from_millis(settings::PROGRESS_TICK_MS));
            let mut idx = 0usize;
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let frame = settings::PROGRESS_FRAMES[idx % settings::PROGRESS_FRAMES.len()];
                        surface.spinner_frame(&progress_line(frame, &label, start.elapsed(), color));
                        idx += 1;
                    }
                }
            }
            surface.clear_spinner();
            let _ = cleared_tx.send(());
        });

        Self {
            stop: Some(stop_tx),
            cleared: cleared_rx,
            task,
        }
    }

    /// Signal stop and wait (bounded) for the spinner to clear its line.
    ///
    /// Returns `false` when the confirmation did not arrive in time. The task
    /// is aborted either way and its cancellation is swallowed.
    pub async fn stop_and_await_cleared(mut self, wait: Duration) -> bool {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        let cleared = matches!(
            tokio::time::timeout(wait, &mut self.cleared).await,
            Ok(Ok(()))
        );
        self.task.abort();
        let _ = (&mut self.task).await;
        cleared
    }
}

impl Drop for SpinnerHandoff {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Format one spinner frame line.
pub fn progress_line(frame: char, label: &str, elapsed: Duration, color: bool) -> String {
    let elapsed_s = elapsed.as_millis() as f64 / 1000.0;
    if color {
        format!(
            "{}{} {} {}",
            settings::PROGRESS_CLEAR_LINE,
            label.with(settings::COLOR_PROGRESS_LABEL),
            format!("[{frame}]").with(settings::COLOR_PROGRESS_FRAME),
            format!("({elapsed_s:.1}s)").with(settings::COLOR_PROGRESS_ELAPSED),
        )
    } else {
        format!(
            "{}{label} [{frame}] ({elapsed_s:.1}s)",
            settings::PROGRESS_CLEAR_LINE
        )
    }
}
