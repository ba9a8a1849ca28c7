//! # testloc-core
//!
//! Finds where in source each test of a compiled gtest executable lives.
//!
//! This crate provides:
//! - Symbol reading from PDB files and DWARF-carrying object files
//! - Matching of gtest test names against mangled symbol names
//! - Resolution of test names to `file:line`, merged over several debug-info files
//! - Test enumeration and bounded, cancellable discovery
//!
//! ## Best effort
//!
//! Location lookup never fails a discovery. Unreadable debug info, malformed
//! patterns and unmatched names all end up as test cases without a
//! location; a discovery that runs past its deadline ends up empty.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use testloc_core::prelude::*;
//!
//! let settings = DiscoverySettings::default();
//! let tests = create_test_cases(Path::new("build/unit_tests"), &settings, silent_reporter());
//! for test in &tests {
//!     println!("{test}");
//! }
//! ```

pub mod discovery;
pub mod error;
pub mod matcher;
pub mod patterns;
pub mod prelude;
pub mod resolver;
pub mod settings;
pub mod symbols;
pub mod types;

// Re-export commonly used types
pub use error::{LocatorError, LocatorResult};
pub use resolver::{ResolutionRequest, TestCaseResolver};
pub use settings::DiscoverySettings;
pub use types::{SourceLocation, SymbolRecord, TestCase, TestTrait};
