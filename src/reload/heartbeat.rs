//! Fixed-interval pacing signal.
//!
//! Ticks go through a zero-capacity channel with `try_send`: a tick is only
//! delivered if the consumer is blocked waiting for it at that moment,
//! otherwise it is dropped. There is never a backlog of ticks.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, Sender, select};

/// Interval used by reload sessions.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running heartbeat thread.
pub struct Heartbeat {
    ticks: Receiver<()>,
    cancel_tx: Sender<()>,
    handle: JoinHandle<()>,
}

impl Heartbeat {
    pub fn spawn(interval: Duration) -> Self {
        let (tick_tx, ticks) = channel::bounded(0);
        let (cancel_tx, cancel_rx) = channel::bounded(1);

        let handle = thread::spawn(move || run_loop(interval, &tick_tx, &cancel_rx));

        Self {
            ticks,
            cancel_tx,
            handle,
        }
    }

    /// Tick signal. Disconnects after cancellation.
    pub fn ticks(&self) -> &Receiver<()> {
        &self.ticks
    }

    /// Stop scheduling ticks and wait for the thread to exit.
    pub fn cancel(self) {
        let _ = self.cancel_tx.send(());
        if self.handle.join().is_err() {
            crate::log!("reload"; "heartbeat thread panicked");
        }
    }
}

fn run_loop(interval: Duration, tick_tx: &Sender<()>, cancel_rx: &Receiver<()>) {
    loop {
        select! {
            recv(cancel_rx) -> _ => break,
            default(interval) => {
                // Consumer not ready (or gone): drop the tick.
                let _ = tick_tx.try_send(());
            }
        }
    }
}
