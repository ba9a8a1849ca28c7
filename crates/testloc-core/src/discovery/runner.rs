//! # Bounded Discovery Runner
//!
//! Runs a [`DiscoveryStrategy`] on a dedicated thread and waits for it at
//! most `timeout`.
//!
//! ## Outcome
//!
//! - The strategy finishes in time: its test cases are returned. They were
//!   already reported one by one while it ran.
//! - The deadline passes first: the run is cancelled, an error naming the
//!   executable and a debug message naming its file are logged, and the
//!   result is empty. Whatever the strategy reports afterwards is dropped.
//!
//! Delivery to the reporter and the timeout share a lock: once `run` has
//! returned after a timeout, no delivery is in progress and none follows.
//!
//! The worker is never killed. It sees the cancellation token at its next
//! check and its late result is discarded; the caller is not held up by it.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, error};

use super::{CancellationToken, DiscoveryContext, DiscoveryStrategy, RunLatch, RunState, TestCaseReporter};
use crate::error::LocatorError;
use crate::settings::DiscoverySettings;
use crate::types::TestCase;

/// Runs discovery under a wall-clock deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedDiscoveryRunner
{
    timeout: Option<Duration>,
}

impl BoundedDiscoveryRunner
{
    /// `None` waits for the strategy however long it takes.
    pub fn new(timeout: Option<Duration>) -> Self
    {
        Self { timeout }
    }

    pub fn from_settings(settings: &DiscoverySettings) -> Self
    {
        Self::new(settings.discovery_timeout())
    }

    pub fn timeout(&self) -> Option<Duration>
    {
        self.timeout
    }

    /// Run `strategy`, forwarding reported test cases to `reporter` while it is running.
    pub async fn run(&self, strategy: Box<dyn DiscoveryStrategy>, reporter: TestCaseReporter) -> Vec<TestCase>
    {
        let executable = strategy.executable().to_path_buf();
        let latch = RunLatch::new();
        let token = CancellationToken::new();
        latch.start();

        let delivery = Arc::new(Mutex::new(()));
        let gate = latch.clone();
        let gate_delivery = Arc::clone(&delivery);
        let gated: TestCaseReporter = Arc::new(move |test_case: &TestCase| {
            let _delivering = hold(&gate_delivery);
            if gate.state() == RunState::Running {
                reporter(test_case);
            }
        });
        let ctx = DiscoveryContext::new(token.clone(), gated);

        let (tx, rx) = oneshot::channel();
        let spawned = thread::Builder::new()
            .name(format!("discovery:{}", file_name(&executable)))
            .spawn(move || {
                let mut strategy = strategy;
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| strategy.discover(&ctx)));
                // The receiver is gone when the watchdog already fired.
                let _ = tx.send(outcome);
            });
        if let Err(err) = spawned {
            error!(executable = %executable.display(), error = %err, "Failed to start discovery thread");
            return Vec::new();
        }

        let outcome = match self.timeout {
            None => rx.await,
            Some(timeout) => {
                tokio::select! {
                    biased;
                    () = tokio::time::sleep(timeout) => {
                        let _delivering = hold(&delivery);
                        abandon(&latch, &token, &executable, timeout);
                        return Vec::new();
                    }
                    outcome = rx => outcome,
                }
            }
        };

        if !latch.complete() {
            return Vec::new();
        }

        match outcome {
            Ok(Ok(Ok(test_cases))) => test_cases,
            Ok(Ok(Err(LocatorError::Cancelled))) => Vec::new(),
            Ok(Ok(Err(err))) => {
                error!(executable = %executable.display(), error = %err, "Test discovery failed");
                Vec::new()
            }
            Ok(Err(_)) => {
                error!(executable = %executable.display(), "Test discovery panicked");
                Vec::new()
            }
            Err(_) => {
                error!(executable = %executable.display(), "Discovery thread ended without a result");
                Vec::new()
            }
        }
    }

    /// [`run`](Self::run) on a private current-thread runtime.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn run_blocking(&self, strategy: Box<dyn DiscoveryStrategy>, reporter: TestCaseReporter) -> Vec<TestCase>
    {
        let runtime = match tokio::runtime::Builder::new_current_thread().enable_time().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                error!(executable = %strategy.executable().display(), error = %err, "Failed to create discovery runtime");
                return Vec::new();
            }
        };
        runtime.block_on(self.run(strategy, reporter))
    }
}

fn hold(delivery: &Mutex<()>) -> MutexGuard<'_, ()>
{
    delivery.lock().unwrap_or_else(PoisonError::into_inner)
}

fn abandon(latch: &RunLatch, token: &CancellationToken, executable: &Path, timeout: Duration)
{
    latch.time_out();
    token.cancel();

    let err = LocatorError::DiscoveryTimeout {
        executable: executable.to_path_buf(),
        timeout,
    };
    error!(error = %err, "Test discovery was cancelled for {}", executable.display());
    debug!("Discovery timeout reached for {}, results discarded", file_name(executable));
}

fn file_name(path: &Path) -> String
{
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
