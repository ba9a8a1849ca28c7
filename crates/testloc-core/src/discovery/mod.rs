//! # Test Discovery
//!
//! Enumerates the test cases of an executable and attaches source locations.
//!
//! ## Pieces
//!
//! - [`ListTestsCommand`]: runs the executable with `--gtest_list_tests`
//!   and parses what it prints.
//! - [`DiscoveryStrategy`]: one way of turning that listing into located
//!   [`TestCase`]s. [`BatchDiscovery`] resolves everything in one resolver
//!   pass after listing; [`StreamingDiscovery`] reports each test as soon as
//!   it is listed. [`NamedTestsDiscovery`] locates names known up front.
//! - [`BoundedDiscoveryRunner`]: runs a strategy on its own thread under a
//!   wall-clock deadline.
//! - [`TestCaseFactory`]: wires settings, strategy and runner together.
//!
//! Strategies report test cases through a [`TestCaseReporter`] while they
//! run and also return the full list at the end.

mod cancel;
mod factory;
mod runner;
mod strategies;

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::LocatorResult;
use crate::types::TestCase;

pub use self::cancel::{CancellationToken, RunLatch, RunState};
pub use self::factory::{create_test_cases, TestCaseFactory};
pub use self::list_tests::{parse_test_list, ListTestsCommand, ListTestsParser, TestLister, LIST_TESTS_FLAG};
pub use self::runner::BoundedDiscoveryRunner;
pub use self::strategies::{strategy_for, BatchDiscovery, LocationLookup, NamedTestsDiscovery, StreamingDiscovery};

/// Callback receiving each test case as soon as it is found.
pub type TestCaseReporter = Arc<dyn Fn(&TestCase) + Send + Sync>;

/// A reporter that drops everything.
pub fn silent_reporter() -> TestCaseReporter
{
    Arc::new(|_: &TestCase| {})
}

/// What a strategy gets from the runner.
#[derive(Clone)]
pub struct DiscoveryContext
{
    token: CancellationToken,
    reporter: TestCaseReporter,
}

impl DiscoveryContext
{
    pub fn new(token: CancellationToken, reporter: TestCaseReporter) -> Self
    {
        Self { token, reporter }
    }

    pub fn token(&self) -> &CancellationToken
    {
        &self.token
    }

    pub fn is_cancelled(&self) -> bool
    {
        self.token.is_cancelled()
    }

    pub fn report(&self, test_case: &TestCase)
    {
        (self.reporter)(test_case);
    }
}

impl fmt::Debug for DiscoveryContext
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("DiscoveryContext")
            .field("cancelled", &self.token.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// One way of discovering the test cases of an executable.
pub trait DiscoveryStrategy: Send
{
    /// Executable under discovery.
    fn executable(&self) -> &Path;

    /// Discover every test case, reporting each through `ctx` as it is found.
    ///
    /// Implementations poll [`DiscoveryContext::is_cancelled`] between units
    /// of work and give up with
    /// [`LocatorError::Cancelled`](crate::error::LocatorError::Cancelled).
    ///
    /// ## Errors
    ///
    /// Listing failures ([`LocatorError::ProcessFailed`](crate::error::LocatorError::ProcessFailed))
    /// and cancellation. Unresolvable locations are not errors.
    fn discover(&mut self, ctx: &DiscoveryContext) -> LocatorResult<Vec<TestCase>>;
}
