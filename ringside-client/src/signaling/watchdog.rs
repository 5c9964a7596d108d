use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Raised by an expired watchdog timer. Only honoured if `generation`
/// still names the armed timer, see [`Watchdog::claim`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchdogFired {
    pub generation: u64,
}

struct Armed {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Single-flight connection deadline.
///
/// Arming replaces any previous timer. Each timer carries the generation it
/// was armed with, so a firing that raced with `cancel` or a re-arm is
/// rejected by `claim` instead of reaching the caller.
pub struct Watchdog {
    timeout: Duration,
    generation: u64,
    armed: Option<Armed>,
    fired_tx: mpsc::UnboundedSender<WatchdogFired>,
    fired_rx: mpsc::UnboundedReceiver<WatchdogFired>,
}

impl Watchdog {
    pub fn new(timeout: Duration) -> Self {
        let (fired_tx, fired_rx) = mpsc::unbounded_channel();
        Self {
            timeout,
            generation: 0,
            armed: None,
            fired_tx,
            fired_rx,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_armed(&self) -> bool {
        self.armed.is_some()
    }

    /// Starts a fresh timer, cancelling the current one. Returns its generation.
    pub fn arm(&mut self) -> u64 {
        self.cancel();
        self.generation += 1;

        let generation = self.generation;
        let timeout = self.timeout;
        let tx = self.fired_tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = tx.send(WatchdogFired { generation });
        });

        debug!("Watchdog armed (generation {}, {:?})", generation, timeout);
        self.armed = Some(Armed { generation, handle });
        generation
    }

    /// Returns `true` if a timer was armed.
    pub fn cancel(&mut self) -> bool {
        let Some(armed) = self.armed.take() else {
            return false;
        };
        armed.handle.abort();
        debug!("Watchdog cancelled (generation {})", armed.generation);
        true
    }

    /// Accepts `fired` if it belongs to the armed timer, disarming it.
    pub fn claim(&mut self, fired: WatchdogFired) -> bool {
        match &self.armed {
            Some(armed) if armed.generation == fired.generation => {
                self.armed = None;
                true
            }
            _ => {
                debug!("Ignoring stale watchdog firing (generation {})", fired.generation);
                false
            }
        }
    }

    /// Waits for the next firing, stale ones included.
    pub async fn fired(&mut self) -> WatchdogFired {
        match self.fired_rx.recv().await {
            Some(fired) => fired,
            // The sender half lives in `self`.
            None => std::future::pending().await,
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.cancel();
    }
}
