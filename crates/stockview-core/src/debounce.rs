//! Debouncing for search input.
//!
//! [`DebounceCell`] is the synchronous core: one pending slot and a deadline
//! that every write pushes back. [`SearchDebouncer`] drives a cell from a
//! tokio task and emits each settled value on a channel.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Latest-value slot with a reset-on-write quiet period.
#[derive(Debug, Clone)]
pub struct DebounceCell<T> {
    quiet: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> DebounceCell<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            deadline: None,
        }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.quiet);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Take the pending value regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }
}

/// Background debouncer for search terms.
///
/// Dropping it stops the task and discards any pending term.
#[derive(Debug)]
pub struct SearchDebouncer {
    input: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Spawn the debouncer on the current runtime. Settled terms arrive on the
    /// returned receiver.
    pub fn spawn(quiet: Duration) -> (Self, mpsc::UnboundedReceiver<String>) {
        let (input, input_rx) = mpsc::unbounded_channel();
        let (output, output_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_debouncer(quiet, input_rx, output));
        (Self { input, task }, output_rx)
    }

    /// Offer a new term. Returns false once the debouncer has stopped.
    pub fn push(&self, term: impl Into<String>) -> bool {
        self.input.send(term.into()).is_ok()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_debouncer(
    quiet: Duration,
    mut input: mpsc::UnboundedReceiver<String>,
    output: mpsc::UnboundedSender<String>,
) {
    let mut cell = DebounceCell::new(quiet);

    loop {
        let received = match cell.deadline() {
            Some(deadline) => {
                tokio::select! {
                    received = input.recv() => received,
                    _ = tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)) => {
                        if let Some(term) = cell.flush() {
                            debug!(term = %term, "search term settled");
                            if output.send(term).is_err() {
                                return;
                            }
                        }
                        continue;
                    }
                }
            }
            None => input.recv().await,
        };

        match received {
            Some(term) => cell.push(term, Instant::now()),
            None => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_emits_only_after_quiet_period() {
        let start = Instant::now();
        let mut cell = DebounceCell::new(Duration::from_millis(500));

        cell.push("a", start);
        assert_eq!(cell.poll(start + Duration::from_millis(499)), None);
        assert_eq!(cell.poll(start + Duration::from_millis(500)), Some("a"));
        assert!(!cell.is_pending());
    }

    #[test]
    fn cell_keeps_only_the_latest_write() {
        let start = Instant::now();
        let mut cell = DebounceCell::new(Duration::from_millis(500));

        cell.push("a", start);
        cell.push("ap", start + Duration::from_millis(300));
        cell.push("app", start + Duration::from_millis(600));

        // The first deadline (500ms) was pushed back by each write.
        assert_eq!(cell.poll(start + Duration::from_millis(800)), None);
        assert_eq!(cell.poll(start + Duration::from_millis(1_100)), Some("app"));
        assert_eq!(cell.poll(start + Duration::from_millis(5_000)), None);
    }

    #[tokio::test]
    async fn debouncer_emits_last_term_of_a_burst_once() {
        let (debouncer, mut settled) = SearchDebouncer::spawn(Duration::from_millis(80));

        for term in ["a", "ap", "app", "appl"] {
            assert!(debouncer.push(term));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let first = tokio::time::timeout(Duration::from_secs(2), settled.recv())
            .await
            .expect("settled term should arrive");
        assert_eq!(first.as_deref(), Some("appl"));

        let second = tokio::time::timeout(Duration::from_millis(300), settled.recv()).await;
        assert!(second.is_err(), "burst must produce a single emission");
    }

    #[tokio::test]
    async fn dropping_the_debouncer_discards_pending_input() {
        let (debouncer, mut settled) = SearchDebouncer::spawn(Duration::from_millis(50));
        debouncer.push("pending");
        drop(debouncer);

        let received = tokio::time::timeout(Duration::from_millis(300), settled.recv())
            .await
            .expect("channel should close");
        assert_eq!(received, None);
    }
}
