//! # Types
//!
//! Data types shared by the symbol readers, the resolver and discovery.
//!
//! Everything here is request-scoped: built during one discovery invocation
//! and dropped afterwards.

pub mod symbols;
pub mod test_case;

// Re-export all public types
pub use symbols::{SourceLocation, SymbolRecord};
pub use test_case::{TestCase, TestTrait};
