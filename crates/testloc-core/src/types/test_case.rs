//! Discovered test cases.

use std::fmt;

use super::symbols::SourceLocation;

/// A name/value tag attached to a test case, e.g. `TypeParam = int`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTrait
{
    pub name: String,
    pub value: String,
}

impl TestTrait
{
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self
    {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A test case as reported by discovery.
///
/// The fully qualified name (`Suite.Case`, `Prefix/Suite.Case/0`, ...) is
/// unique within one run. A test case without a location is a valid,
/// complete result: it simply has no navigable source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase
{
    name: String,
    location: Option<SourceLocation>,
    traits: Vec<TestTrait>,
}

impl TestCase
{
    /// Create a test case with an unknown location.
    pub fn new(name: impl Into<String>) -> Self
    {
        Self {
            name: name.into(),
            location: None,
            traits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<SourceLocation>) -> Self
    {
        self.location = location.filter(SourceLocation::is_known);
        self
    }

    #[must_use]
    pub fn with_traits(mut self, traits: Vec<TestTrait>) -> Self
    {
        self.traits = traits;
        self
    }

    /// Fully qualified test name.
    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn location(&self) -> Option<&SourceLocation>
    {
        self.location.as_ref()
    }

    /// Source file, empty when the location is unknown.
    pub fn code_file_path(&self) -> &str
    {
        self.location.as_ref().map_or("", |loc| loc.file.as_str())
    }

    /// 1-based line, 0 when the location is unknown.
    pub fn line_number(&self) -> u32
    {
        self.location.as_ref().map_or(0, |loc| loc.line)
    }

    pub fn traits(&self) -> &[TestTrait]
    {
        &self.traits
    }

    pub fn has_source_location(&self) -> bool
    {
        self.location.is_some()
    }
}

impl fmt::Display for TestCase
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match &self.location {
            Some(location) => write!(f, "{} ({location})", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}
