use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Spaces requests by a fixed delay to stay under API rate limits
pub struct RateLimiter {
    delay: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            last_request: None,
        }
    }

    pub async fn wait(&mut self) {
        if let Some(remaining) = self.remaining_delay() {
            sleep(remaining).await;
        }
        self.last_request = Some(Instant::now());
    }

    pub fn reset(&mut self) {
        self.last_request = None;
    }

    fn remaining_delay(&self) -> Option<Duration> {
        let last = self.last_request?;
        self.delay.checked_sub(last.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_not_delayed() {
        let limiter = RateLimiter::new(1000);
        assert!(limiter.remaining_delay().is_none());
    }

    #[test]
    fn back_to_back_requests_are_delayed() {
        let mut limiter = RateLimiter::new(60_000);
        limiter.last_request = Some(Instant::now());
        assert!(limiter.remaining_delay().is_some());
    }

    #[test]
    fn reset_clears_the_delay() {
        let mut limiter = RateLimiter::new(60_000);
        limiter.last_request = Some(Instant::now());
        limiter.reset();
        assert!(limiter.remaining_delay().is_none());
    }
}
