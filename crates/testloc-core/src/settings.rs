//! Discovery settings.
//!
//! The in-process view of the options a host exposes for test discovery.
//! Hosts own loading and persistence; this crate only reads the values.

use std::path::Path;
use std::time::Duration;

use crate::error::LocatorResult;
use crate::patterns::expand_placeholders;
use crate::resolver::{ModuleFilter, NameFilter};

/// Default discovery deadline in seconds.
pub const DEFAULT_DISCOVERY_TIMEOUT_SECS: u64 = 30;

/// Options consumed by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoverySettings
{
    /// Deadline for discovering one executable, in seconds. `0` disables the watchdog.
    pub discovery_timeout: u64,
    /// Resolve source locations at all. When off every test is reported without one.
    pub parse_symbol_information: bool,
    /// Streaming discovery when set, batch (legacy) discovery otherwise.
    pub use_new_test_execution_framework: bool,
    /// `;`-separated glob patterns of additional debug-info files.
    pub additional_debug_info: String,
    /// Glob, or `/regex/`, over test names.
    pub test_name_filter: String,
    /// Glob over symbol modules. Empty selects every module.
    pub module_filter: String,
}

impl Default for DiscoverySettings
{
    fn default() -> Self
    {
        Self {
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT_SECS,
            parse_symbol_information: true,
            use_new_test_execution_framework: true,
            additional_debug_info: String::new(),
            test_name_filter: "*".to_string(),
            module_filter: String::new(),
        }
    }
}

impl DiscoverySettings
{
    /// The watchdog deadline, `None` when disabled.
    pub fn discovery_timeout(&self) -> Option<Duration>
    {
        (self.discovery_timeout > 0).then(|| Duration::from_secs(self.discovery_timeout))
    }

    /// Additional debug-info patterns with placeholders expanded for `executable`.
    pub fn additional_debug_info_patterns(&self, executable: &Path) -> Vec<String>
    {
        expand_placeholders(&self.additional_debug_info, executable)
    }

    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`](crate::error::LocatorError::InvalidFilter)
    /// for an invalid glob or regex.
    pub fn name_filter(&self) -> LocatorResult<NameFilter>
    {
        NameFilter::parse(&self.test_name_filter)
    }

    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`](crate::error::LocatorError::InvalidFilter)
    /// for an invalid glob.
    pub fn module_filter(&self) -> LocatorResult<ModuleFilter>
    {
        ModuleFilter::parse(&self.module_filter)
    }
}
