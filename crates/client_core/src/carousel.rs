//! Cursor over a fetched, immutable list with a self-rescheduling auto-advance.
//!
//! The controller never reads a clock itself. Callers pass `now` on every
//! operation, which keeps the UI loop in charge of time and keeps the
//! controller deterministic under test.

use std::time::{Duration, Instant};

use thiserror::Error;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CarouselError {
    #[error("index {index} out of range for carousel of length {len}")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone)]
pub struct CarouselController {
    len: usize,
    index: usize,
    interval: Duration,
    deadline: Option<Instant>,
}

impl CarouselController {
    pub fn new(len: usize, interval: Duration, now: Instant) -> Self {
        let mut controller = Self {
            len,
            index: 0,
            interval,
            deadline: None,
        };
        controller.reschedule(now);
        controller
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `None` when there is nothing to show.
    pub fn current_index(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.index)
    }

    pub fn current<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        self.current_index().and_then(|i| items.get(i))
    }

    /// Arrows and indicator dots are only shown for more than one item.
    pub fn shows_controls(&self) -> bool {
        self.len > 1
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn next(&mut self, now: Instant) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.len;
        self.reschedule(now);
    }

    pub fn previous(&mut self, now: Instant) {
        if self.is_empty() {
            return;
        }
        self.index = (self.index + self.len - 1) % self.len;
        self.reschedule(now);
    }

    /// Out-of-range requests are rejected and leave both cursor and timer as they were.
    pub fn go_to(&mut self, index: usize, now: Instant) -> Result<(), CarouselError> {
        if index >= self.len {
            return Err(CarouselError::OutOfRange {
                index,
                len: self.len,
            });
        }
        self.index = index;
        self.reschedule(now);
        Ok(())
    }

    /// Advances when the deadline has passed. Returns whether it advanced.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.next(now);
                true
            }
            _ => false,
        }
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    fn reschedule(&mut self, now: Instant) {
        self.deadline = self.shows_controls().then(|| now + self.interval);
    }
}
