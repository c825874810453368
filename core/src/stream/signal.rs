// ## 📂 File: `src/stream/signal.rs`

//! Counting signal over a crossbeam channel of unit tokens.
//!
//! - `post` = increment (one token in)
//! - `wait` = blocking decrement (one token out)
//!
//! Both channel ends live in the signal itself, so the channel can never
//! disconnect while a signal handle exists.

use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};

#[derive(Debug, Clone)]
pub struct CountingSignal {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl Default for CountingSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingSignal {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Increment. Never blocks.
    pub fn post(&self) {
        // rx is held by self; unbounded send cannot fail
        let _ = self.tx.send(());
    }

    /// Increment `n` times.
    pub fn post_n(&self, n: usize) {
        for _ in 0..n {
            self.post();
        }
    }

    /// Decrement, blocking until a token is available.
    pub fn wait(&self) {
        // tx is held by self; recv only returns once a token arrives
        let _ = self.rx.recv();
    }

    /// Decrement with a deadline. `false` if no token arrived in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(()) => true,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Decrement without blocking. `false` if the count is zero.
    pub fn try_wait(&self) -> bool {
        self.rx.try_recv().is_ok()
    }

    /// Current count.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
