use log::debug;
use std::thread::sleep;
use std::time::{Duration, Instant};

use crate::{envelope::Envelope, resources::Resource};

pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(3);
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(600);
/// Shorter intervals, zero included, are rounded up to this.
pub const MIN_WAIT_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for polling a resource until it reaches a terminal status.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    /// Amount of time to sleep between two fetches.
    pub interval: Duration,
    /// Wall clock budget. The last fetch happens at most one `interval` after it is exhausted.
    pub timeout: Duration,
}

impl Default for WaitConfig {
    fn default() -> Self {
        WaitConfig {
            interval: DEFAULT_WAIT_INTERVAL,
            timeout: DEFAULT_WAIT_TIMEOUT,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Waiter<'a> {
    config: &'a WaitConfig,
}

impl<'a> Waiter<'a> {
    pub fn new(config: &'a WaitConfig) -> Self {
        Self { config }
    }

    fn is_terminal(envelope: &Envelope<Resource>) -> bool {
        envelope
            .object()
            .map_or(false, |resource| resource.status().is_terminal())
    }

    /// Fetch until the resource is finished or faulty, or the budget runs out, and return the
    /// last envelope. Failed fetches are retried like any non-terminal one.
    pub fn wait(&self, mut fetch: impl FnMut() -> Envelope<Resource>) -> Envelope<Resource> {
        let started = Instant::now();
        loop {
            let envelope = fetch();
            let elapsed = started.elapsed();
            if Self::is_terminal(&envelope) || elapsed >= self.config.timeout {
                return envelope;
            }

            let delay = self
                .config
                .interval
                .max(MIN_WAIT_INTERVAL)
                .min(self.config.timeout - elapsed);
            debug!(
                "Resource not ready ({}) - polling again after {:?}.",
                envelope
                    .object()
                    .map_or("unavailable", |resource| resource.status().name()),
                delay
            );
            sleep(delay);
        }
    }
}
