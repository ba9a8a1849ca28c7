//! Symbol and source location types.

use std::fmt;

/// Source file and 1-based line of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceLocation
{
    /// Path as recorded in the debug information.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
}

impl SourceLocation
{
    pub fn new(file: impl Into<String>, line: u32) -> Self
    {
        Self {
            file: file.into(),
            line,
        }
    }

    /// A location is navigable only with a file name and a non-zero line.
    pub fn is_known(&self) -> bool
    {
        !self.file.is_empty() && self.line != 0
    }
}

impl fmt::Display for SourceLocation
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// One function symbol read from a debug-info file.
///
/// Records are produced lazily while a file is scanned and are never stored
/// beyond the scan. A `line` of 0 means the symbol carries no line data
/// (partially stripped debug info); the resolver never matches such records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord
{
    /// Name as stored in the file: mangled, decorated, or already demangled.
    pub name: String,
    /// Compilation unit / module the symbol belongs to, if the format has one.
    pub module: Option<String>,
    /// Source file, empty when unknown.
    pub file: String,
    /// 1-based line, 0 when unknown.
    pub line: u32,
}

impl SymbolRecord
{
    pub fn new(name: impl Into<String>, file: impl Into<String>, line: u32) -> Self
    {
        Self {
            name: name.into(),
            module: None,
            file: file.into(),
            line,
        }
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self
    {
        self.module = Some(module.into());
        self
    }

    /// Location of this record, or `None` when it has no usable line data.
    pub fn location(&self) -> Option<SourceLocation>
    {
        let location = SourceLocation::new(self.file.clone(), self.line);
        location.is_known().then_some(location)
    }
}
