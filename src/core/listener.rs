use crate::domain::model::ProgressEvent;
use crate::domain::ports::ProgressListener;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards at most one update per interval, plus the final `done` update.
///
/// The interval clock starts when the listener is created, so a small upload
/// that finishes quickly only reports completion.
pub struct ThrottledListener<L> {
    inner: L,
    interval: Duration,
    last_dispatch: Mutex<Instant>,
}

impl<L: ProgressListener> ThrottledListener<L> {
    pub fn new(inner: L, interval: Duration) -> Self {
        Self {
            inner,
            interval,
            last_dispatch: Mutex::new(Instant::now()),
        }
    }

    pub fn with_default_interval(inner: L) -> Self {
        Self::new(inner, DEFAULT_PROGRESS_INTERVAL)
    }
}

impl<L: ProgressListener> ProgressListener for ThrottledListener<L> {
    fn on_progress(&self, bytes_written: u64, content_length: Option<u64>, done: bool) {
        self.on_progress_at(Instant::now(), bytes_written, content_length, done);
    }
}

impl<L: ProgressListener> ThrottledListener<L> {
    fn on_progress_at(
        &self,
        now: Instant,
        bytes_written: u64,
        content_length: Option<u64>,
        done: bool,
    ) {
        let should_dispatch = {
            let mut last = match self.last_dispatch.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if done || now.duration_since(*last) > self.interval {
                *last = now;
                true
            } else {
                false
            }
        };

        if should_dispatch {
            self.inner.on_progress(bytes_written, content_length, done);
        }
    }
}

/// Turns progress callbacks into [`ProgressEvent`]s on a channel.
pub struct EventListener {
    request_id: u64,
    events: UnboundedSender<ProgressEvent>,
}

impl EventListener {
    pub fn new(request_id: u64, events: UnboundedSender<ProgressEvent>) -> Self {
        Self { request_id, events }
    }
}

impl ProgressListener for EventListener {
    fn on_progress(&self, bytes_written: u64, content_length: Option<u64>, _done: bool) {
        let event = ProgressEvent {
            request_id: self.request_id,
            progress: bytes_written,
            total: content_length,
        };
        if self.events.send(event).is_err() {
            tracing::trace!(
                "Progress receiver for request {} is gone, dropping event",
                self.request_id
            );
        }
    }
}
