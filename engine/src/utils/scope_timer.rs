use std::time::{Duration, Instant};

/// Logs how long a physics pass took, at trace level, when dropped.
pub struct ScopeTimer<'a> {
    pass: &'a str,
    body_count: usize,
    start_time: Instant,
}

impl<'a> ScopeTimer<'a> {
    pub fn new(pass: &'a str, body_count: usize) -> Self {
        Self {
            pass,
            body_count,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Drop for ScopeTimer<'_> {
    fn drop(&mut self) {
        log::trace!(
            "{} over {} bodies took {:.2?}",
            self.pass,
            self.body_count,
            self.elapsed()
        );
    }
}
