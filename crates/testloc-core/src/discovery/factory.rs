//! Settings-driven entry point for discovering one executable.

use std::path::{Path, PathBuf};

use tracing::{error, trace};

use super::{strategy_for, BoundedDiscoveryRunner, DiscoveryStrategy, TestCaseReporter};
use crate::error::LocatorResult;
use crate::settings::DiscoverySettings;
use crate::types::TestCase;

/// Discovers the test cases of one executable according to a [`DiscoverySettings`].
#[derive(Debug, Clone)]
pub struct TestCaseFactory
{
    executable: PathBuf,
    settings: DiscoverySettings,
}

impl TestCaseFactory
{
    pub fn new(executable: impl Into<PathBuf>, settings: DiscoverySettings) -> Self
    {
        Self {
            executable: executable.into(),
            settings,
        }
    }

    pub fn executable(&self) -> &Path
    {
        &self.executable
    }

    /// The strategy the settings select.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`](crate::error::LocatorError::InvalidFilter)
    /// for invalid filters in the settings.
    pub fn strategy(&self) -> LocatorResult<Box<dyn DiscoveryStrategy>>
    {
        strategy_for(&self.executable, &self.settings)
    }

    /// Discover under the configured deadline.
    ///
    /// Never fails: invalid settings, listing failures and timeouts are
    /// logged and give an empty result.
    pub async fn discover(&self, reporter: TestCaseReporter) -> Vec<TestCase>
    {
        let strategy = match self.strategy() {
            Ok(strategy) => strategy,
            Err(err) => {
                error!(executable = %self.executable.display(), error = %err, "Invalid discovery settings");
                return Vec::new();
            }
        };
        trace!(
            new_framework = self.settings.use_new_test_execution_framework,
            parse_symbols = self.settings.parse_symbol_information,
            "Starting discovery"
        );
        BoundedDiscoveryRunner::from_settings(&self.settings)
            .run(strategy, reporter)
            .await
    }

    /// Blocking form of [`discover`](Self::discover).
    pub fn create_test_cases(&self, reporter: TestCaseReporter) -> Vec<TestCase>
    {
        let strategy = match self.strategy() {
            Ok(strategy) => strategy,
            Err(err) => {
                error!(executable = %self.executable.display(), error = %err, "Invalid discovery settings");
                return Vec::new();
            }
        };
        BoundedDiscoveryRunner::from_settings(&self.settings).run_blocking(strategy, reporter)
    }
}

/// Discover the test cases of `executable`, reporting each as it is found.
pub fn create_test_cases(executable: &Path, settings: &DiscoverySettings, reporter: TestCaseReporter) -> Vec<TestCase>
{
    TestCaseFactory::new(executable, settings.clone()).create_test_cases(reporter)
}
