//! Batch and streaming discovery, and resolution of known test names.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::list_tests::{ListTestsCommand, TestLister};
use super::{DiscoveryContext, DiscoveryStrategy};
use crate::error::{LocatorError, LocatorResult};
use crate::resolver::{LocationIndex, ModuleFilter, NameFilter, ResolutionRequest, TestCaseResolver};
use crate::settings::DiscoverySettings;
use crate::types::TestCase;

/// How discovery attaches source locations to listed tests.
#[derive(Clone)]
pub struct LocationLookup
{
    executable: PathBuf,
    resolver: TestCaseResolver,
    enabled: bool,
    name_filter: NameFilter,
    module_filter: ModuleFilter,
    additional_debug_info: Vec<String>,
}

impl LocationLookup
{
    pub fn new(executable: impl Into<PathBuf>, resolver: TestCaseResolver) -> Self
    {
        Self {
            executable: executable.into(),
            resolver,
            enabled: true,
            name_filter: NameFilter::Any,
            module_filter: ModuleFilter::default(),
            additional_debug_info: Vec::new(),
        }
    }

    /// A lookup that never reads symbols; every test stays unresolved.
    pub fn disabled(executable: impl Into<PathBuf>) -> Self
    {
        Self {
            enabled: false,
            ..Self::new(executable, TestCaseResolver::default())
        }
    }

    /// ## Errors
    ///
    /// [`LocatorError::InvalidFilter`] for invalid name or module filters.
    pub fn from_settings(executable: &Path, settings: &DiscoverySettings, resolver: TestCaseResolver) -> LocatorResult<Self>
    {
        Ok(Self {
            executable: executable.to_path_buf(),
            resolver,
            enabled: settings.parse_symbol_information,
            name_filter: settings.name_filter()?,
            module_filter: settings.module_filter()?,
            additional_debug_info: settings.additional_debug_info_patterns(executable),
        })
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

    pub fn executable(&self) -> &Path
    {
        &self.executable
    }

    pub fn is_enabled(&self) -> bool
    {
        self.enabled
    }

    fn wants(&self, test_name: &str) -> bool
    {
        self.enabled && self.name_filter.matches(test_name)
    }

    /// Attach locations to `cases` with one resolver pass.
    fn locate_all(&self, cases: Vec<TestCase>) -> Vec<TestCase>
    {
        if !self.enabled {
            debug!(executable = %self.executable.display(), "Symbol parsing disabled, skipping locations");
            return cases;
        }

        let request = ResolutionRequest::new(&self.executable, cases.iter().map(TestCase::name))
            .with_name_filter(self.name_filter.clone())
            .with_module_filter(self.module_filter.clone())
            .with_additional_debug_info(self.additional_debug_info.clone());

        let mut locations: HashMap<String, _> = self
            .resolver
            .resolve_all(&request)
            .into_iter()
            .filter_map(|case| case.location().cloned().map(|location| (case.name().to_string(), location)))
            .collect();

        cases
            .into_iter()
            .map(|case| {
                let location = locations.remove(case.name());
                case.with_location(location)
            })
            .collect()
    }

    fn build_index(&self) -> LocationIndex
    {
        self.resolver
            .build_index(&self.executable, &self.additional_debug_info, &self.module_filter)
    }
}

/// Legacy discovery: list everything, resolve in one pass, then report.
pub struct BatchDiscovery
{
    lister: Box<dyn TestLister>,
    lookup: LocationLookup,
}

impl BatchDiscovery
{
    pub fn new(lister: Box<dyn TestLister>, lookup: LocationLookup) -> Self
    {
        Self { lister, lookup }
    }
}

impl DiscoveryStrategy for BatchDiscovery
{
    fn executable(&self) -> &Path
    {
        self.lookup.executable()
    }

    fn discover(&mut self, ctx: &DiscoveryContext) -> LocatorResult<Vec<TestCase>>
    {
        let mut listed = Vec::new();
        self.lister.list(ctx.token(), &mut |case| listed.push(case))?;

        let located = self.lookup.locate_all(listed);
        for case in &located {
            if ctx.is_cancelled() {
                return Err(LocatorError::Cancelled);
            }
            ctx.report(case);
        }
        Ok(located)
    }
}

/// Current discovery: locate and report each test as soon as it is listed.
///
/// The debug info is scanned once, into a [`LocationIndex`], when the first
/// test that needs a location shows up.
pub struct StreamingDiscovery
{
    lister: Box<dyn TestLister>,
    lookup: LocationLookup,
    index: Option<LocationIndex>,
}

impl StreamingDiscovery
{
    pub fn new(lister: Box<dyn TestLister>, lookup: LocationLookup) -> Self
    {
        Self {
            lister,
            lookup,
            index: None,
        }
    }
}

impl DiscoveryStrategy for StreamingDiscovery
{
    fn executable(&self) -> &Path
    {
        self.lookup.executable()
    }

    fn discover(&mut self, ctx: &DiscoveryContext) -> LocatorResult<Vec<TestCase>>
    {
        let lookup = &self.lookup;
        let index = &mut self.index;
        let mut found = Vec::new();

        self.lister.list(ctx.token(), &mut |case| {
            let location = if lookup.wants(case.name()) {
                index
                    .get_or_insert_with(|| lookup.build_index())
                    .locate(case.name())
            } else {
                None
            };
            let case = case.with_location(location);
            ctx.report(&case);
            found.push(case);
        })?;

        Ok(found)
    }
}

/// Locates test names known up front; the executable is never run.
///
/// Tests are reported in request order once the single resolver pass is done.
pub struct NamedTestsDiscovery
{
    names: Vec<String>,
    lookup: LocationLookup,
}

impl NamedTestsDiscovery
{
    pub fn new(names: impl IntoIterator<Item = impl Into<String>>, lookup: LocationLookup) -> Self
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            lookup,
        }
    }
}

impl DiscoveryStrategy for NamedTestsDiscovery
{
    fn executable(&self) -> &Path
    {
        self.lookup.executable()
    }

    fn discover(&mut self, ctx: &DiscoveryContext) -> LocatorResult<Vec<TestCase>>
    {
        let cases = self.names.iter().map(TestCase::new).collect();
        let located = self.lookup.locate_all(cases);
        for case in &located {
            if ctx.is_cancelled() {
                return Err(LocatorError::Cancelled);
            }
            ctx.report(case);
        }
        Ok(located)
    }
}

/// The strategy `settings` select for `executable`.
///
/// ## Errors
///
/// [`LocatorError::InvalidFilter`] for invalid name or module filters.
pub fn strategy_for(executable: &Path, settings: &DiscoverySettings) -> LocatorResult<Box<dyn DiscoveryStrategy>>
{
    let lookup = LocationLookup::from_settings(executable, settings, TestCaseResolver::default())?;
    let lister = Box::new(ListTestsCommand::new(executable));

    if settings.use_new_test_execution_framework {
        Ok(Box::new(StreamingDiscovery::new(lister, lookup)))
    } else {
        Ok(Box::new(BatchDiscovery::new(lister, lookup)))
    }
}
