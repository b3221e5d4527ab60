//! Run-wide deadline threaded through every suspension point.

use std::future::Future;

use tokio::time::{timeout_at, Duration, Instant};

use crate::error::ReconcileError;

/// One wall-clock budget armed when a reconciliation starts.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    /// Arm a deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    pub fn remaining(&self) -> Duration {
        self.at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }

    /// Fail fast when the budget is already spent.
    pub fn check(&self) -> Result<(), ReconcileError> {
        if self.is_expired() {
            return Err(ReconcileError::Timeout(self.budget));
        }
        Ok(())
    }

    /// Drive `fut` until it completes or the deadline passes.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ReconcileError>
    where
        F: Future<Output = Result<T, ReconcileError>>,
    {
        match timeout_at(self.at, fut).await {
            Ok(result) => result,
            Err(_) => Err(ReconcileError::Timeout(self.budget)),
        }
    }
}
