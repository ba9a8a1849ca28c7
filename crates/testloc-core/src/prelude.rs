//! Common module for library exports

pub use crate::discovery::{
    create_test_cases, silent_reporter, BoundedDiscoveryRunner, DiscoveryStrategy, TestCaseFactory, TestCaseReporter,
};
pub use crate::error::{LocatorError, LocatorResult};
pub use crate::matcher::matches;
pub use crate::resolver::{ModuleFilter, NameFilter, ResolutionRequest, TestCaseResolver};
pub use crate::settings::DiscoverySettings;
pub use crate::types::{SourceLocation, TestCase, TestTrait};
