//! Cooperative cancellation and the run-state latch shared by a discovery
//! worker and its watchdog.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Set once by the watchdog, polled by the worker.
///
/// Cancellation is advisory: a worker blocked in a long read only notices it
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken
{
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn cancel(&self)
    {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool
    {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Lifecycle of one bounded discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState
{
    Idle = 0,
    Running = 1,
    Completed = 2,
    TimedOut = 3,
}

impl RunState
{
    fn from_raw(raw: u8) -> Self
    {
        match raw {
            1 => RunState::Running,
            2 => RunState::Completed,
            3 => RunState::TimedOut,
            _ => RunState::Idle,
        }
    }
}

/// One-shot latch over [`RunState`].
///
/// `Running` can be left exactly once, either to `Completed` or to
/// `TimedOut`. Whichever side gets there first decides the outcome.
#[derive(Debug, Clone)]
pub struct RunLatch
{
    state: Arc<AtomicU8>,
}

impl Default for RunLatch
{
    fn default() -> Self
    {
        Self {
            state: Arc::new(AtomicU8::new(RunState::Idle as u8)),
        }
    }
}

impl RunLatch
{
    pub fn new() -> Self
    {
        Self::default()
    }

    pub fn state(&self) -> RunState
    {
        RunState::from_raw(self.state.load(Ordering::SeqCst))
    }

    /// `Idle -> Running`. False if the latch was already started.
    pub fn start(&self) -> bool
    {
        self.transition(RunState::Idle, RunState::Running)
    }

    /// `Running -> Completed`. False if the watchdog fired first.
    pub fn complete(&self) -> bool
    {
        self.transition(RunState::Running, RunState::Completed)
    }

    /// `Running -> TimedOut`. False if the worker completed first.
    pub fn time_out(&self) -> bool
    {
        self.transition(RunState::Running, RunState::TimedOut)
    }

    fn transition(&self, from: RunState, to: RunState) -> bool
    {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_token_is_shared()
    {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_latch_completes_once()
    {
        let latch = RunLatch::new();
        assert_eq!(latch.state(), RunState::Idle);
        assert!(!latch.complete());
        assert!(latch.start());
        assert!(!latch.start());
        assert!(latch.complete());
        assert!(!latch.time_out());
        assert_eq!(latch.state(), RunState::Completed);
    }

    #[test]
    fn test_timeout_beats_late_completion()
    {
        let latch = RunLatch::new();
        latch.start();
        assert!(latch.time_out());
        assert!(!latch.complete());
        assert_eq!(latch.state(), RunState::TimedOut);
    }
}
