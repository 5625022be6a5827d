//! Progress reporting and cooperative cancellation

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Receives fractional progress increments
///
/// Increments are non-negative and, over one operation, sum to the weight
/// the operation was given. Implementations must return quickly.
pub trait ProgressSink {
    fn report(&mut self, increment: f64);
}

/// Sink that discards every report
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _increment: f64) {}
}

impl<F> ProgressSink for F
where
    F: FnMut(f64),
{
    fn report(&mut self, increment: f64) {
        self(increment)
    }
}

/// Forwards reports to an inner sink, multiplied by a fixed weight
pub struct ScaledProgress<'a> {
    inner: &'a mut dyn ProgressSink,
    weight: f64,
}

impl<'a> ScaledProgress<'a> {
    pub fn new(inner: &'a mut dyn ProgressSink, weight: f64) -> Self {
        Self { inner, weight }
    }
}

impl ProgressSink for ScaledProgress<'_> {
    fn report(&mut self, increment: f64) {
        self.inner.report(increment * self.weight);
    }
}

/// Shared flag for requesting that a long-running operation stop
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
