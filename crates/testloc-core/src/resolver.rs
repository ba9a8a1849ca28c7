//! # Test Case Resolver
//!
//! Maps test names to the source location of their `TestBody`.
//!
//! ## Algorithm
//!
//! 1. Build the candidate debug-info files: the executable's own debug info
//!    (`<name>.pdb` next to it if present, the executable itself otherwise)
//!    followed by every file matched by the additional patterns, in pattern
//!    order. Duplicates are dropped, first occurrence wins.
//! 2. Scan each candidate once. Every record with a non-zero line that passes
//!    the module filter is normalised and looked up among the still
//!    unresolved test names. The first match resolves a test for good.
//! 3. Requested tests that pass the name filter but were never matched are
//!    returned without a location.
//!
//! An unreadable candidate or a malformed pattern is logged and skipped.
//! Nothing short of a panic makes the resolver fail as a whole.

use std::collections::{HashMap, HashSet};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{LocatorError, LocatorResult};
use crate::matcher::{symbol_keys, TestSignature};
use crate::patterns::{default_debug_info_path, executable_dir, find_matching_files};
use crate::symbols::demangle::scope_components;
use crate::symbols::{DefaultSymbolSource, SymbolSource};
use crate::types::{SourceLocation, SymbolRecord, TestCase};

/// Selects which test names take part in resolution.
#[derive(Debug, Clone, Default)]
pub enum NameFilter
{
    /// Every test.
    #[default]
    Any,
    /// Shell-style wildcard, e.g. `Suite.*`.
    Glob(glob::Pattern),
    /// Regular expression, written as `/expr/`.
    Regex(Regex),
}

impl NameFilter
{
    /// Parse a filter string. Empty and `*` select everything.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`] for an invalid glob or regex.
    pub fn parse(filter: &str) -> LocatorResult<Self>
    {
        let filter = filter.trim();
        if filter.is_empty() || filter == "*" {
            return Ok(NameFilter::Any);
        }

        let invalid = |reason: String| LocatorError::InvalidFilter {
            filter: filter.to_string(),
            reason,
        };

        match filter.strip_prefix('/').and_then(|rest| rest.strip_suffix('/')) {
            Some(expr) => Regex::new(expr)
                .map(NameFilter::Regex)
                .map_err(|err| invalid(err.to_string())),
            None => glob::Pattern::new(filter)
                .map(NameFilter::Glob)
                .map_err(|err| invalid(err.to_string())),
        }
    }

    pub fn matches(&self, test_name: &str) -> bool
    {
        match self {
            NameFilter::Any => true,
            NameFilter::Glob(pattern) => pattern.matches(test_name),
            NameFilter::Regex(regex) => regex.is_match(test_name),
        }
    }
}

/// Selects which modules symbols are taken from.
///
/// A module is a PDB module (usually an object file path) or, for object
/// files, the debug-info file name. The pattern is tried against the full
/// module name and against its last path component.
#[derive(Debug, Clone, Default)]
pub struct ModuleFilter(Option<glob::Pattern>);

impl ModuleFilter
{
    /// Parse a glob. Empty selects every module.
    ///
    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`] for an invalid glob.
    pub fn parse(filter: &str) -> LocatorResult<Self>
    {
        let filter = filter.trim();
        if filter.is_empty() {
            return Ok(Self(None));
        }
        glob::Pattern::new(filter)
            .map(|pattern| Self(Some(pattern)))
            .map_err(|err| LocatorError::InvalidFilter {
                filter: filter.to_string(),
                reason: err.to_string(),
            })
    }

    pub fn matches(&self, module: Option<&str>) -> bool
    {
        let Some(pattern) = &self.0 else {
            return true;
        };
        let Some(module) = module else {
            return false;
        };
        let base_name = module.rsplit(['/', '\\']).next().unwrap_or(module);
        pattern.matches(module) || pattern.matches(base_name)
    }
}

/// Everything one resolution needs.
#[derive(Debug, Clone)]
pub struct ResolutionRequest
{
    pub executable: PathBuf,
    /// Test names to locate, in reporting order.
    pub test_names: Vec<String>,
    /// Names located elsewhere already; skipped and not reported.
    pub already_covered: HashSet<String>,
    pub name_filter: NameFilter,
    pub module_filter: ModuleFilter,
    /// Additional debug-info glob patterns, placeholders already expanded.
    pub additional_debug_info: Vec<String>,
}

impl ResolutionRequest
{
    pub fn new(executable: impl Into<PathBuf>, test_names: impl IntoIterator<Item = impl Into<String>>) -> Self
    {
        Self {
            executable: executable.into(),
            test_names: test_names.into_iter().map(Into::into).collect(),
            already_covered: HashSet::new(),
            name_filter: NameFilter::Any,
            module_filter: ModuleFilter::default(),
            additional_debug_info: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_already_covered(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self
    {
        self.already_covered = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_name_filter(mut self, filter: NameFilter) -> Self
    {
        self.name_filter = filter;
        self
    }

    #[must_use]
    pub fn with_module_filter(mut self, filter: ModuleFilter) -> Self
    {
        self.module_filter = filter;
        self
    }

    #[must_use]
    pub fn with_additional_debug_info(mut self, patterns: Vec<String>) -> Self
    {
        self.additional_debug_info = patterns;
        self
    }

    /// Names that take part in this resolution, in request order, without duplicates.
    pub fn selected_names(&self) -> Vec<&str>
    {
        let mut seen = HashSet::new();
        self.test_names
            .iter()
            .map(String::as_str)
            .filter(|name| !self.already_covered.contains(*name) && self.name_filter.matches(name))
            .filter(|name| seen.insert(*name))
            .collect()
    }
}

/// Locations of every `TestBody` in an executable's debug info.
///
/// Built by one full scan; afterwards any number of test names can be looked
/// up without touching the files again.
#[derive(Debug, Clone, Default)]
pub struct LocationIndex
{
    by_key: HashMap<String, SourceLocation>,
}

impl LocationIndex
{
    /// Location of `test_name`, if any symbol defines it.
    pub fn locate(&self, test_name: &str) -> Option<SourceLocation>
    {
        let signature = TestSignature::parse(test_name)?;
        signature.keys().iter().find_map(|key| self.by_key.get(key).cloned())
    }

    pub fn len(&self) -> usize
    {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.by_key.is_empty()
    }
}

/// Resolves test names against the debug info of an executable.
#[derive(Clone)]
pub struct TestCaseResolver
{
    source: Arc<dyn SymbolSource>,
}

impl Default for TestCaseResolver
{
    fn default() -> Self
    {
        Self::new(Arc::new(DefaultSymbolSource))
    }
}

impl TestCaseResolver
{
    pub fn new(source: Arc<dyn SymbolSource>) -> Self
    {
        Self { source }
    }

    /// Resolve every selected test name of `request`.
    ///
    /// The result holds one [`TestCase`] per selected name, in request order.
    /// Names that no symbol defines have no location.
    pub fn resolve_all(&self, request: &ResolutionRequest) -> Vec<TestCase>
    {
        let names = request.selected_names();
        let mut resolved: Vec<Option<SourceLocation>> = vec![None; names.len()];

        let mut pending: HashMap<String, Vec<usize>> = HashMap::new();
        for (index, name) in names.iter().enumerate() {
            let Some(signature) = TestSignature::parse(name) else {
                debug!(test = %name, "Test name has no gtest shape, leaving it unresolved");
                continue;
            };
            for key in signature.keys() {
                pending.entry(key).or_default().push(index);
            }
        }

        let mut remaining = pending.values().flatten().collect::<HashSet<_>>().len();
        if remaining == 0 {
            return into_test_cases(&names, resolved);
        }

        for file in self.debug_info_files(&request.executable, &request.additional_debug_info) {
            self.scan(&file, &request.module_filter, &mut |record, keys| {
                for key in keys {
                    let Some(indices) = pending.remove(key) else {
                        continue;
                    };
                    for index in indices {
                        if resolved[index].is_none() {
                            resolved[index] = record.location();
                            remaining -= 1;
                        }
                    }
                }
                if remaining == 0 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            });

            if remaining == 0 {
                break;
            }
        }

        into_test_cases(&names, resolved)
    }

    /// Scan every candidate file of `executable` and index all test bodies.
    pub fn build_index(&self, executable: &Path, additional_debug_info: &[String], module_filter: &ModuleFilter)
        -> LocationIndex
    {
        let mut index = LocationIndex::default();
        for file in self.debug_info_files(executable, additional_debug_info) {
            self.scan(&file, module_filter, &mut |record, keys| {
                if let Some(location) = record.location() {
                    for key in keys {
                        index.by_key.entry(key.clone()).or_insert_with(|| location.clone());
                    }
                }
                ControlFlow::Continue(())
            });
        }
        debug!(executable = %executable.display(), entries = index.len(), "Built test location index");
        index
    }

    /// Candidate debug-info files of `executable`, in lookup order.
    ///
    /// Malformed patterns are logged and skipped.
    pub fn debug_info_files(&self, executable: &Path, additional_debug_info: &[String]) -> Vec<PathBuf>
    {
        let base_dir = executable_dir(executable);

        let own = default_debug_info_path(executable);
        let mut candidates = vec![if own.is_file() { own } else { executable.to_path_buf() }];

        for pattern in additional_debug_info {
            match find_matching_files(pattern, base_dir) {
                Ok(files) => {
                    if files.is_empty() {
                        debug!(pattern = %pattern, "Debug info pattern matched no files");
                    }
                    candidates.extend(files);
                }
                Err(err) => warn!(pattern = %pattern, error = %err, "Ignoring malformed debug info pattern"),
            }
        }

        let mut seen = HashSet::new();
        candidates.retain(|path| seen.insert(path.canonicalize().unwrap_or_else(|_| path.clone())));
        candidates
    }

    /// Feed every test-body record of `file` with a known location to
    /// `on_match`, together with its lookup keys.
    fn scan(
        &self,
        file: &Path,
        module_filter: &ModuleFilter,
        on_match: &mut dyn FnMut(&SymbolRecord, &[String]) -> ControlFlow<()>,
    )
    {
        let mut session = match self.source.open(file) {
            Ok(session) => session,
            Err(err) => {
                warn!(path = %file.display(), error = %err, "Skipping unreadable debug info");
                return;
            }
        };

        let result = session.for_each_symbol(&mut |record| {
            if record.location().is_none() || !module_filter.matches(record.module.as_deref()) {
                return ControlFlow::Continue(());
            }
            let Some(path) = scope_components(&record.name) else {
                return ControlFlow::Continue(());
            };
            let keys = symbol_keys(&path);
            if keys.is_empty() {
                return ControlFlow::Continue(());
            }
            on_match(&record, keys.as_slice())
        });

        if let Err(err) = result {
            warn!(path = %file.display(), error = %err, "Stopped reading corrupt debug info");
        }
    }
}

fn into_test_cases(names: &[&str], resolved: Vec<Option<SourceLocation>>) -> Vec<TestCase>
{
    names
        .iter()
        .zip(resolved)
        .map(|(name, location)| TestCase::new(*name).with_location(location))
        .collect()
}

#[cfg(test)]
mod tests
{
    use std::fs;
    use std::sync::Mutex;

    use super::*;
    use crate::symbols::{DebugInfoFormat, SymbolSession};

    /// Serves canned records keyed by file name; files it does not know are unreadable.
    #[derive(Default)]
    struct FakeSource
    {
        files: HashMap<String, Vec<SymbolRecord>>,
        opened: Mutex<Vec<String>>,
    }

    impl FakeSource
    {
        fn with_file(mut self, name: &str, records: Vec<SymbolRecord>) -> Self
        {
            self.files.insert(name.to_string(), records);
            self
        }
    }

    struct FakeSession
    {
        path: PathBuf,
        records: Vec<SymbolRecord>,
    }

    impl SymbolSession for FakeSession
    {
        fn path(&self) -> &Path
        {
            &self.path
        }

        fn format(&self) -> DebugInfoFormat
        {
            DebugInfoFormat::Pdb
        }

        fn for_each_symbol(&mut self, visitor: &mut dyn FnMut(SymbolRecord) -> ControlFlow<()>) -> LocatorResult<()>
        {
            for record in self.records.drain(..) {
                if visitor(record).is_break() {
                    break;
                }
            }
            Ok(())
        }
    }

    impl SymbolSource for FakeSource
    {
        fn open(&self, path: &Path) -> LocatorResult<Box<dyn SymbolSession>>
        {
            let name = path.file_name().unwrap().to_string_lossy().into_owned();
            self.opened.lock().unwrap().push(name.clone());
            if !path.exists() {
                return Err(LocatorError::unreadable(path, "missing"));
            }
            let records = self
                .files
                .get(&name)
                .cloned()
                .ok_or_else(|| LocatorError::unreadable(path, "unknown format"))?;
            Ok(Box::new(FakeSession {
                path: path.to_path_buf(),
                records,
            }))
        }
    }

    fn body(class: &str, file: &str, line: u32) -> SymbolRecord
    {
        SymbolRecord::new(format!("{class}::TestBody"), file, line).with_module("tests.obj")
    }

    fn setup(files: &[&str]) -> (tempfile::TempDir, PathBuf)
    {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(dir.path().join(file), b"").unwrap();
        }
        let executable = dir.path().join("LoadTests.exe");
        (dir, executable)
    }

    fn location_of<'a>(cases: &'a [TestCase], name: &str) -> Option<&'a SourceLocation>
    {
        cases.iter().find(|case| case.name() == name).and_then(TestCase::location)
    }

    #[test]
    fn test_name_filter_parse()
    {
        assert!(NameFilter::parse("").unwrap().matches("A.B"));
        assert!(NameFilter::parse("*").unwrap().matches("A.B"));
        let glob = NameFilter::parse("Suite.*").unwrap();
        assert!(glob.matches("Suite.Case"));
        assert!(!glob.matches("Other.Case"));
        let regex = NameFilter::parse("/^Suite\\.(A|B)$/").unwrap();
        assert!(regex.matches("Suite.A"));
        assert!(!regex.matches("Suite.C"));
        assert!(NameFilter::parse("/(unclosed/").is_err());
        assert!(NameFilter::parse("[oops").is_err());
    }

    #[test]
    fn test_module_filter()
    {
        let any = ModuleFilter::parse("").unwrap();
        assert!(any.matches(None));
        assert!(any.matches(Some("x.obj")));

        let filter = ModuleFilter::parse("*Tests*.obj").unwrap();
        assert!(filter.matches(Some("C:\\build\\LoadTests.obj")));
        assert!(filter.matches(Some("/build/LoadTests.obj")));
        assert!(!filter.matches(Some("/build/main.obj")));
        assert!(!filter.matches(None));
    }

    #[test]
    fn test_resolves_from_own_debug_info()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file(
            "LoadTests.pdb",
            vec![body("Suite_A_Test", "a.cpp", 10), body("Suite_B_Test", "b.cpp", 20)],
        );
        let resolver = TestCaseResolver::new(Arc::new(source));

        let cases = resolver.resolve_all(&ResolutionRequest::new(&executable, ["Suite.A", "Suite.B"]));

        assert_eq!(cases.len(), 2);
        assert_eq!(location_of(&cases, "Suite.A"), Some(&SourceLocation::new("a.cpp", 10)));
        assert_eq!(location_of(&cases, "Suite.B"), Some(&SourceLocation::new("b.cpp", 20)));
    }

    #[test]
    fn test_merges_additional_debug_info()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb", "extra.pdb.bak"]);
        let source = FakeSource::default()
            .with_file("LoadTests.pdb", vec![body("Suite_A_Test", "a.cpp", 10)])
            .with_file("extra.pdb.bak", vec![body("Suite_B_Test", "b.cpp", 20)]);
        let resolver = TestCaseResolver::new(Arc::new(source));

        let request = ResolutionRequest::new(&executable, ["Suite.A", "Suite.B"])
            .with_additional_debug_info(vec!["*.pdb.bak".to_string()]);
        let cases = resolver.resolve_all(&request);

        assert!(cases.iter().all(|case| !case.code_file_path().is_empty() && case.line_number() != 0));
    }

    #[test]
    fn test_hidden_debug_info_leaves_its_tests_unresolved()
    {
        // The primary pdb is gone; the executable itself has no test bodies.
        let (_dir, executable) = setup(&["LoadTests.exe", "extra.pdb.bak"]);
        let source = FakeSource::default()
            .with_file("LoadTests.exe", vec![])
            .with_file("extra.pdb.bak", vec![body("Suite_B_Test", "b.cpp", 20)]);
        let resolver = TestCaseResolver::new(Arc::new(source));

        let request = ResolutionRequest::new(&executable, ["Suite.A", "Suite.B"])
            .with_additional_debug_info(vec!["*.pdb.bak".to_string()]);
        let cases = resolver.resolve_all(&request);

        assert_eq!(cases.len(), 2);
        assert_eq!(location_of(&cases, "Suite.A"), None);
        assert_eq!(location_of(&cases, "Suite.B"), Some(&SourceLocation::new("b.cpp", 20)));
    }

    #[test]
    fn test_first_match_wins_in_pattern_order()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb", "a.extra", "b.extra"]);
        let source = FakeSource::default()
            .with_file("LoadTests.pdb", vec![])
            .with_file("a.extra", vec![body("Suite_A_Test", "first.cpp", 1)])
            .with_file("b.extra", vec![body("Suite_A_Test", "second.cpp", 2)]);
        let resolver = TestCaseResolver::new(Arc::new(source));

        let request = ResolutionRequest::new(&executable, ["Suite.A"])
            .with_additional_debug_info(vec!["b.extra".to_string(), "a.extra".to_string()]);
        let cases = resolver.resolve_all(&request);

        assert_eq!(location_of(&cases, "Suite.A"), Some(&SourceLocation::new("second.cpp", 2)));
    }

    #[test]
    fn test_stops_scanning_once_everything_is_resolved()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb", "late.extra"]);
        let source = Arc::new(
            FakeSource::default()
                .with_file("LoadTests.pdb", vec![body("Suite_A_Test", "a.cpp", 1)])
                .with_file("late.extra", vec![]),
        );
        let resolver = TestCaseResolver::new(source.clone());

        let request = ResolutionRequest::new(&executable, ["Suite.A"])
            .with_additional_debug_info(vec!["*.extra".to_string()]);
        resolver.resolve_all(&request);

        assert_eq!(*source.opened.lock().unwrap(), ["LoadTests.pdb"]);
    }

    #[test]
    fn test_zero_line_records_never_match()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file(
            "LoadTests.pdb",
            vec![body("Suite_A_Test", "stripped.cpp", 0), body("Suite_A_Test", "a.cpp", 7)],
        );
        let resolver = TestCaseResolver::new(Arc::new(source));

        let cases = resolver.resolve_all(&ResolutionRequest::new(&executable, ["Suite.A"]));
        assert_eq!(location_of(&cases, "Suite.A"), Some(&SourceLocation::new("a.cpp", 7)));
    }

    #[test]
    fn test_filters_and_already_covered()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file(
            "LoadTests.pdb",
            vec![body("Suite_A_Test", "a.cpp", 1), body("Suite_B_Test", "b.cpp", 2)],
        );
        let resolver = TestCaseResolver::new(Arc::new(source));

        let request = ResolutionRequest::new(&executable, ["Suite.A", "Suite.B", "Other.C", "Suite.Missing"])
            .with_already_covered(["Suite.B"])
            .with_name_filter(NameFilter::parse("Suite.*").unwrap());
        let cases = resolver.resolve_all(&request);

        let names: Vec<&str> = cases.iter().map(TestCase::name).collect();
        assert_eq!(names, ["Suite.A", "Suite.Missing"]);
        assert!(cases[0].has_source_location());
        assert!(!cases[1].has_source_location());
    }

    #[test]
    fn test_module_filter_excludes_records()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file("LoadTests.pdb", vec![body("Suite_A_Test", "a.cpp", 1)]);
        let resolver = TestCaseResolver::new(Arc::new(source));

        let request = ResolutionRequest::new(&executable, ["Suite.A"])
            .with_module_filter(ModuleFilter::parse("other.obj").unwrap());
        let cases = resolver.resolve_all(&request);
        assert!(!cases[0].has_source_location());
    }

    #[test]
    fn test_no_debug_info_at_all()
    {
        let dir = tempfile::tempdir().unwrap();
        let executable = dir.path().join("missing.exe");
        let resolver = TestCaseResolver::new(Arc::new(FakeSource::default()));

        let request = ResolutionRequest::new(&executable, ["Suite.A"])
            .with_additional_debug_info(vec!["*.nothing".to_string(), "[bad".to_string()]);
        let cases = resolver.resolve_all(&request);

        assert_eq!(cases.len(), 1);
        assert!(!cases[0].has_source_location());
    }

    #[test]
    fn test_resolution_is_deterministic()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file(
            "LoadTests.pdb",
            vec![
                body("Suite_A_Test<int>", "int.cpp", 3),
                body("Suite_A_Test<float>", "float.cpp", 4),
            ],
        );
        let resolver = TestCaseResolver::new(Arc::new(source));
        let request = ResolutionRequest::new(&executable, ["Suite/0.A", "Suite/1.A"]);

        let first = resolver.resolve_all(&request);
        let second = resolver.resolve_all(&request);
        assert_eq!(first, second);
        assert_eq!(location_of(&first, "Suite/1.A"), Some(&SourceLocation::new("int.cpp", 3)));
    }

    #[test]
    fn test_debug_info_files_deduplicated()
    {
        let (dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let resolver = TestCaseResolver::new(Arc::new(FakeSource::default()));

        let files = resolver.debug_info_files(&executable, &["*.pdb".to_string(), "LoadTests.pdb".to_string()]);
        assert_eq!(files, [dir.path().join("LoadTests.pdb")]);
    }

    #[test]
    fn test_debug_info_files_in_directory_with_glob_characters()
    {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("build [x64]");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("LoadTests.exe"), b"").unwrap();
        fs::write(dir.join("LoadTests.pdb.bak"), b"").unwrap();
        let executable = dir.join("LoadTests.exe");
        let resolver = TestCaseResolver::new(Arc::new(FakeSource::default()));

        let expanded = crate::patterns::expand_placeholders("$(ExecutableDir)/*.pdb.bak", &executable);
        for patterns in [expanded, vec!["*.pdb.bak".to_string()]] {
            let files = resolver.debug_info_files(&executable, &patterns);
            assert_eq!(files, [executable.clone(), dir.join("LoadTests.pdb.bak")]);
        }
    }

    #[test]
    fn test_build_index()
    {
        let (_dir, executable) = setup(&["LoadTests.exe", "LoadTests.pdb"]);
        let source = FakeSource::default().with_file(
            "LoadTests.pdb",
            vec![
                body("Suite_A_Test", "a.cpp", 1),
                body("gtest_case_Typed_::Case<int>", "typed.cpp", 9),
                SymbolRecord::new("Suite_A_Test::SetUp", "a.cpp", 2),
            ],
        );
        let resolver = TestCaseResolver::new(Arc::new(source));

        let index = resolver.build_index(&executable, &[], &ModuleFilter::default());
        assert_eq!(index.locate("Suite.A"), Some(SourceLocation::new("a.cpp", 1)));
        assert_eq!(index.locate("Inst/Typed/0.Case"), Some(SourceLocation::new("typed.cpp", 9)));
        assert_eq!(index.locate("Suite.B"), None);
    }
}
