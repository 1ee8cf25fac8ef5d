//! Change Detector
//!
//! Watches the content root (non-recursive) and turns raw filesystem events
//! into filtered [`ChangeEvent`]s.
//!
//! Architecture:
//! ```text
//! notify callback → raw channel → control loop (classify) → events()
//!                                       ↑
//!                                  cancel signal
//! ```
//!
//! The control loop owns the watcher. Watch errors are logged and absorbed;
//! only [`ChangeDetector::cancel`] (or dropping the detector) ends the loop.

use std::thread::{self, JoinHandle};

use crossbeam::channel::{self, Receiver, Sender, select};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use regex::Regex;

use crate::config::WatchSpec;

// Raw notify event -> ChangeEvent.
mod classify;
// Shared event types.
mod types;

#[cfg(test)]
mod tests;

use classify::classify;
pub use types::ChangeEvent;

type RawEvent = notify::Result<notify::Event>;

/// Handle to a running change detector.
pub struct ChangeDetector {
    events: Receiver<ChangeEvent>,
    cancel_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl ChangeDetector {
    /// Register a watch on `spec.root()` and start the control loop.
    ///
    /// The watch is active when this returns, so no change made afterwards
    /// is missed.
    pub fn spawn(spec: &WatchSpec) -> notify::Result<Self> {
        let (raw_tx, raw_rx) = channel::unbounded::<RawEvent>();

        let mut watcher = notify::recommended_watcher(move |res: RawEvent| {
            let _ = raw_tx.send(res);
        })?;
        watcher.watch(spec.root(), RecursiveMode::NonRecursive)?;

        let (event_tx, events) = channel::unbounded();
        let (cancel_tx, cancel_rx) = channel::bounded(1);
        let pattern = spec.pattern().clone();

        let handle = thread::spawn(move || {
            run_loop(watcher, &raw_rx, &cancel_rx, &event_tx, &pattern);
        });

        Ok(Self {
            events,
            cancel_tx,
            handle,
        })
    }

    /// Filtered change notifications. Disconnects after cancellation.
    pub fn events(&self) -> &Receiver<ChangeEvent> {
        &self.events
    }

    /// Stop watching and wait until the watch handle is released.
    pub fn cancel(self) {
        let _ = self.cancel_tx.send(());
        if self.handle.join().is_err() {
            crate::log!("watch"; "detector thread panicked");
        }
    }
}

fn run_loop(
    watcher: RecommendedWatcher,
    raw_rx: &Receiver<RawEvent>,
    cancel_rx: &Receiver<()>,
    event_tx: &Sender<ChangeEvent>,
    pattern: &Regex,
) {
    loop {
        select! {
            // Fires on explicit cancel and when the handle is dropped.
            recv(cancel_rx) -> _ => break,
            recv(raw_rx) -> res => match res {
                Ok(Ok(event)) => {
                    let Some(change) = classify(&event, pattern) else {
                        continue;
                    };
                    let path = change.path().display();
                    crate::debug!("watch"; "{} {}", change.kind().label(), path);
                    if event_tx.send(change).is_err() {
                        break; // Consumer gone
                    }
                }
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(_) => break,
            },
        }
    }

    // Release the OS watch before the event channel disconnects.
    drop(watcher);
}
