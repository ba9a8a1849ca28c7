//! # Error Types
//!
//! General error handling for test case discovery and location resolution.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Most of these errors never reach the caller of
//! [`TestCaseResolver::resolve_all`](crate::resolver::TestCaseResolver::resolve_all):
//! they are logged and absorbed at the boundary that owns them. A debug-info
//! file that cannot be read is skipped, a malformed pattern is dropped, and a
//! discovery that runs past its deadline yields an empty result.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Main error type for symbol and discovery operations
///
/// ## Error Categories
///
/// 1. **Per-file errors**: UnreadableDebugInfo (recovered by skipping the file)
/// 2. **Per-executable errors**: DiscoveryTimeout (recovered by discarding results)
/// 3. **Per-pattern errors**: MalformedPattern (recovered by skipping the pattern)
/// 4. **Caller errors**: InvalidFilter
/// 5. **Process errors**: ProcessFailed, Cancelled
/// 6. **I/O errors**: Io
#[derive(Error, Debug)]
pub enum LocatorError
{
    /// A debug-info file is absent, corrupt, or of an unsupported format
    ///
    /// The resolver logs this at warning level and continues with the next
    /// candidate file.
    #[error("Unreadable debug info {}: {reason}", path.display())]
    UnreadableDebugInfo
    {
        /// File that could not be read
        path: PathBuf,
        /// What went wrong while opening or scanning it
        reason: String,
    },

    /// Discovery of an executable did not finish before its deadline
    #[error("Discovery of {} timed out after {}s", executable.display(), timeout.as_secs())]
    DiscoveryTimeout
    {
        /// Executable whose discovery was abandoned
        executable: PathBuf,
        /// Deadline that elapsed
        timeout: Duration,
    },

    /// An additional debug-info glob pattern could not be compiled
    #[error("Malformed debug info pattern '{pattern}': {reason}")]
    MalformedPattern
    {
        /// Pattern after placeholder expansion
        pattern: String,
        /// Parser message
        reason: String,
    },

    /// A test name or module filter could not be compiled
    #[error("Invalid filter '{filter}': {reason}")]
    InvalidFilter
    {
        /// Filter as given by the caller
        filter: String,
        /// Parser message
        reason: String,
    },

    /// The test executable could not be run or exited abnormally while listing tests
    #[error("Failed to list tests of {}: {reason}", executable.display())]
    ProcessFailed
    {
        /// Executable that was launched
        executable: PathBuf,
        /// Exit status or spawn failure
        reason: String,
    },

    /// The operation observed its cancellation token and stopped early
    #[error("Operation cancelled")]
    Cancelled,

    /// I/O error (for file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LocatorError
{
    /// Build an [`LocatorError::UnreadableDebugInfo`] for `path`.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl ToString) -> Self
    {
        LocatorError::UnreadableDebugInfo {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience type alias for `Result<T, LocatorError>`
///
/// ```rust
/// use testloc_core::error::LocatorResult;
/// fn foo() -> LocatorResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type LocatorResult<T> = std::result::Result<T, LocatorError>;
