//! Bounded retry with a fixed delay between attempts.

use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

/// Returned when every attempt failed; carries the error from the final attempt.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    pub fn run<T, E>(
        &self,
        op: impl FnMut(u32) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, Exhausted<E>> {
        self.run_with_sleep(thread::sleep, op)
    }

    /// `op` receives the 1-based attempt number. `sleep` runs between attempts only,
    /// never after the final one.
    pub fn run_with_sleep<T, E>(
        &self,
        mut sleep: impl FnMut(Duration),
        mut op: impl FnMut(u32) -> std::result::Result<T, E>,
    ) -> std::result::Result<T, Exhausted<E>> {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= max_attempts => {
                    return Err(Exhausted {
                        attempts: attempt,
                        last: err,
                    });
                }
                Err(_) => {
                    if !self.delay.is_zero() {
                        sleep(self.delay);
                    }
                    attempt += 1;
                }
            }
        }
    }
}
