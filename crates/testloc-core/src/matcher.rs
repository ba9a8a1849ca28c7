//! # Name Matcher
//!
//! Decides whether a gtest test name and a function symbol denote the same
//! test body.
//!
//! gtest turns every `TEST`/`TEST_F`/`TEST_P`/`TYPED_TEST` into a class whose
//! `TestBody` member holds the user's code, so the source location of a test
//! is the location of that member. The class name follows from the test name:
//!
//! | Test name shape             | Kind                 | Function                                      |
//! |-----------------------------|----------------------|-----------------------------------------------|
//! | `Suite.Case`                | plain / fixture      | `Suite_Case_Test::TestBody`                   |
//! | `Prefix/Suite.Case/Param`   | value-parameterised  | `Suite_Case_Test::TestBody`                   |
//! | `Suite/N.Case`              | typed                | `Suite_Case_Test<T>::TestBody`                |
//! | `Prefix/Suite/N.Case`       | type-parameterised   | `gtest_case_Suite_::Case<T>::TestBody`        |
//!
//! (newer gtest spells the last one `gtest_suite_Suite_`.)
//!
//! A symbol matches when the tail of its normalised scope path equals one of
//! the expected paths component by component. Enclosing namespaces are
//! allowed in front; anything else is a mismatch, so `OtherSuite_Case_Test`
//! never matches `Suite.Case`.

use smallvec::{smallvec, SmallVec};

use crate::symbols::demangle::{scope_components, ScopePath};

/// Member function that holds the body of every gtest test.
pub const TEST_BODY: &str = "TestBody";

/// How a test was declared, as far as it can be told from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestShape
{
    Simple,
    ValueParameterized,
    Typed,
    TypeParameterized,
}

/// The functions a test name can be defined by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSignature
{
    shape: TestShape,
    suite: String,
    case: String,
}

impl TestSignature
{
    /// Parse a fully qualified test name.
    ///
    /// Returns `None` for names that do not follow any gtest shape; such tests
    /// are simply never resolved.
    pub fn parse(test_name: &str) -> Option<Self>
    {
        let (suite_part, case_part) = test_name.split_once('.')?;
        let suite_parts: SmallVec<[&str; 3]> = suite_part.split('/').collect();
        let case_parts: SmallVec<[&str; 2]> = case_part.split('/').collect();

        let (shape, suite) = match (suite_parts.as_slice(), case_parts.len()) {
            ([suite], 1) => (TestShape::Simple, *suite),
            ([suite] | [_, suite], 2) => (TestShape::ValueParameterized, *suite),
            ([suite, _], 1) => (TestShape::Typed, *suite),
            ([_, suite, _], 1) => (TestShape::TypeParameterized, *suite),
            _ => return None,
        };
        let case = case_parts[0];

        if !is_identifier(suite) || !is_identifier(case) {
            return None;
        }

        Some(Self {
            shape,
            suite: suite.to_string(),
            case: case.to_string(),
        })
    }

    pub fn shape(&self) -> TestShape
    {
        self.shape
    }

    /// Scope paths (outermost first) the defining function may end with.
    pub fn expected_paths(&self) -> SmallVec<[ScopePath; 2]>
    {
        match self.shape {
            TestShape::Simple | TestShape::ValueParameterized | TestShape::Typed => {
                smallvec![smallvec![format!("{}_{}_Test", self.suite, self.case), TEST_BODY.to_string()]]
            }
            TestShape::TypeParameterized => smallvec![
                smallvec![
                    format!("gtest_case_{}_", self.suite),
                    self.case.clone(),
                    TEST_BODY.to_string()
                ],
                smallvec![
                    format!("gtest_suite_{}_", self.suite),
                    self.case.clone(),
                    TEST_BODY.to_string()
                ],
            ],
        }
    }

    /// Lookup keys for [`symbol_keys`]-based indexing.
    pub fn keys(&self) -> SmallVec<[String; 2]>
    {
        self.expected_paths().iter().map(|path| path.join("::")).collect()
    }

    /// Does a normalised symbol path define this test?
    pub fn matches_path(&self, path: &[String]) -> bool
    {
        self.expected_paths().iter().any(|expected| path.ends_with(expected))
    }
}

/// Keys under which a normalised symbol path can satisfy a [`TestSignature`].
///
/// Only `TestBody` members produce keys; every other symbol is irrelevant to
/// test discovery and yields an empty list.
pub fn symbol_keys(path: &[String]) -> SmallVec<[String; 2]>
{
    if path.last().map(String::as_str) != Some(TEST_BODY) {
        return SmallVec::new();
    }
    [2, 3]
        .into_iter()
        .filter(|&len| path.len() >= len)
        .map(|len| path[path.len() - len..].join("::"))
        .collect()
}

/// Does `symbol_name` (raw, as stored in debug info) define the test `test_name`?
///
/// ## Example
///
/// ```rust
/// use testloc_core::matcher::matches;
///
/// assert!(matches("Suite.Case", "_ZN15Suite_Case_Test8TestBodyEv"));
/// assert!(matches("Inst/Suite.Case/3", "?TestBody@Suite_Case_Test@@UAEXXZ"));
/// assert!(!matches("Suite.Case", "_ZN20OtherSuite_Case_Test8TestBodyEv"));
/// ```
pub fn matches(test_name: &str, symbol_name: &str) -> bool
{
    let Some(signature) = TestSignature::parse(test_name) else {
        return false;
    };
    scope_components(symbol_name).is_some_and(|path| signature.matches_path(&path))
}

fn is_identifier(name: &str) -> bool
{
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
