//! Randomized pacing between page actions.
//!
//! Mimics human reading/thinking time and gives asynchronous page updates a
//! chance to settle.

use std::time::Duration;

use rand::Rng;
use tokio::time::sleep;

/// Suspend for a pseudo-random duration uniformly distributed in
/// `[min_ms, max_ms]` milliseconds.
pub async fn random_delay(min_ms: u64, max_ms: u64) {
    let ms = { rand::thread_rng().gen_range(min_ms..=max_ms) };
    sleep(Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn delay_stays_within_bounds() {
        let start = Instant::now();
        random_delay(10, 30).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
        // Generous upper bound; timers can overshoot under load
        assert!(elapsed < Duration::from_millis(500));
    }
}
