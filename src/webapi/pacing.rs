use std::time::Duration;

use log::debug;

/// Spaces out successive requests to the upstream host.
///
/// The first request goes out immediately; every later one waits `delay`.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    primed: bool,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            primed: false,
        }
    }

    /// Wait, if needed, before issuing the next request.
    pub async fn wait(&mut self) {
        if self.primed && !self.delay.is_zero() {
            debug!("Pacing for {:?} before next request", self.delay);
            tokio::time::sleep(self.delay).await;
        }
        self.primed = true;
    }
}
