//! Aggregate request statistics.
//!
//! [`Statistics`] is a plain value with pure transitions; [`StatsTracker`]
//! owns the single mutable copy behind a mutex so that concurrent `ask`
//! calls on one client never lose an update. Each transition is applied as
//! one read-modify-write under the lock.
//!
//! A `reset` racing an in-flight request is resolved last-write-wins: the
//! request settles into whatever counters exist when it completes, even if
//! they were zeroed after it started.

use std::sync::Mutex;
use std::sync::PoisonError;
use std::time::Duration;
use std::time::Instant;

use serde::Deserialize;
use serde::Serialize;
use strum::Display;
use strum::EnumString;
use strum::IntoStaticStr;
use tracing::debug;

/// Counters and running mean latency across all requests of one client.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    /// Milliseconds.
    pub average_response_time: f64,
}

/// How a request settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    Failure,
}

/// Field names of [`Statistics`], as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, IntoStaticStr)]
#[strum(serialize_all = "camelCase")]
pub enum StatKey {
    TotalRequests,
    SuccessfulRequests,
    FailedRequests,
    AverageResponseTime,
}

impl Statistics {
    /// Count a new attempt.
    pub fn begin_request(self) -> Self {
        Self {
            total_requests: self.total_requests + 1,
            ..self
        }
    }

    /// Settle one attempt that took `elapsed_ms`.
    ///
    /// The mean is an exact streaming mean over settled requests: the first
    /// sample replaces the average, later samples are folded in as
    /// `(avg * (n - 1) + e) / n` where `n` counts this one. Requests still in
    /// flight are not part of `n`, so overlapping calls keep the mean exact.
    pub fn complete(self, outcome: RequestOutcome, elapsed_ms: f64) -> Self {
        let n = self.successful_requests + self.failed_requests + 1;
        let average_response_time = if n <= 1 {
            elapsed_ms
        } else {
            (self.average_response_time * (n - 1) as f64 + elapsed_ms) / n as f64
        };

        let (successful_requests, failed_requests) = match outcome {
            RequestOutcome::Success => (self.successful_requests + 1, self.failed_requests),
            RequestOutcome::Failure => (self.successful_requests, self.failed_requests + 1),
        };

        Self {
            total_requests: self.total_requests,
            successful_requests,
            failed_requests,
            average_response_time,
        }
    }

    /// Requests counted but not yet settled.
    pub fn in_flight(&self) -> u64 {
        self.total_requests
            .saturating_sub(self.successful_requests + self.failed_requests)
    }

    /// Read one field by key. Counters are widened to `f64`.
    pub fn get(&self, key: StatKey) -> f64 {
        match key {
            StatKey::TotalRequests => self.total_requests as f64,
            StatKey::SuccessfulRequests => self.successful_requests as f64,
            StatKey::FailedRequests => self.failed_requests as f64,
            StatKey::AverageResponseTime => self.average_response_time,
        }
    }
}

/// Owner of the mutable [`Statistics`] record of a client.
#[derive(Debug, Default)]
pub struct StatsTracker {
    stats: Mutex<Statistics>,
}

impl StatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current statistics.
    pub fn snapshot(&self) -> Statistics {
        *self.lock()
    }

    /// Zero every field.
    pub fn reset(&self) {
        *self.lock() = Statistics::default();
    }

    /// Count a new attempt and return the handle that will settle it.
    pub fn start(&self) -> InFlightRequest<'_> {
        self.update(Statistics::begin_request);
        InFlightRequest {
            tracker: self,
            started: Instant::now(),
            elapsed: None,
            settled: false,
        }
    }

    fn update(&self, transition: impl FnOnce(Statistics) -> Statistics) {
        let mut stats = self.lock();
        *stats = transition(*stats);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Statistics> {
        // Statistics is plain data; a panic mid-update cannot leave it torn.
        self.stats.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One counted attempt that has not settled yet.
///
/// Settles exactly once. Dropping it unsettled (for example when the `ask`
/// future is cancelled) records a failure.
#[derive(Debug)]
pub struct InFlightRequest<'a> {
    tracker: &'a StatsTracker,
    started: Instant,
    elapsed: Option<Duration>,
    settled: bool,
}

impl InFlightRequest<'_> {
    /// Freeze the elapsed time at the moment the transport answered.
    pub fn mark_response(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = Some(self.started.elapsed());
        }
    }

    /// Elapsed milliseconds, frozen by [`Self::mark_response`] if it was called.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed
            .unwrap_or_else(|| self.started.elapsed())
            .as_secs_f64()
            * 1000.0
    }

    pub fn succeed(mut self) {
        self.settle(RequestOutcome::Success);
    }

    pub fn fail(mut self) {
        self.settle(RequestOutcome::Failure);
    }

    fn settle(&mut self, outcome: RequestOutcome) {
        if self.settled {
            return;
        }
        self.settled = true;
        let elapsed_ms = self.elapsed_ms();
        self.tracker
            .update(|stats| stats.complete(outcome, elapsed_ms));
    }
}

impl Drop for InFlightRequest<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("request dropped before completion, counting it as failed");
            self.settle(RequestOutcome::Failure);
        }
    }
}

#[cfg(test)]
#[path = "stats.test.rs"]
mod tests;
