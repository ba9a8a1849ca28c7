//! Subprocess enumeration against small shell scripts posing as gtest executables.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use testloc_core::discovery::{
    create_test_cases, silent_reporter, CancellationToken, ListTestsCommand, TestCaseReporter, TestLister,
};
use testloc_core::error::LocatorError;
use testloc_core::settings::DiscoverySettings;
use testloc_core::types::{TestCase, TestTrait};

/// Writing a script while another test forks can leave it busy (ETXTBSY).
static PROCESS_LOCK: Mutex<()> = Mutex::new(());

fn serialize() -> MutexGuard<'static, ()>
{
    PROCESS_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn script(dir: &Path, name: &str, body: &str) -> PathBuf
{
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

const LISTING: &str = r"
echo 'Running main() from gtest_main.cc'
echo 'Suite.'
echo '  A'
echo '  B'
echo 'Typed/0.  # TypeParam = int'
echo '  Case'
echo 'Inst/Param.'
echo '  Case/0  # GetParam() = 4'
";

fn list(command: &mut ListTestsCommand, token: &CancellationToken) -> Result<Vec<TestCase>, LocatorError>
{
    let mut found = Vec::new();
    command.list(token, &mut |test_case| found.push(test_case))?;
    Ok(found)
}

#[test]
fn test_list_tests_parses_output()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(dir.path(), "listing", LISTING);

    let found = list(&mut ListTestsCommand::new(&executable), &CancellationToken::new()).unwrap();

    let names: Vec<&str> = found.iter().map(TestCase::name).collect();
    assert_eq!(names, ["Suite.A", "Suite.B", "Typed/0.Case", "Inst/Param.Case/0"]);
    assert_eq!(found[2].traits(), [TestTrait::new("TypeParam", "int")]);
    assert_eq!(found[3].traits(), [TestTrait::new("GetParam", "4")]);
}

#[test]
fn test_list_tests_passes_flag()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(
        dir.path(),
        "flagged",
        r#"[ "$1" = "--gtest_list_tests" ] || exit 3
echo 'Suite.'
echo "  $2""#,
    );

    let mut command = ListTestsCommand::new(&executable).with_args(["Extra"]);
    let found = list(&mut command, &CancellationToken::new()).unwrap();
    assert_eq!(found, [TestCase::new("Suite.Extra")]);
}

#[test]
fn test_list_tests_reports_failing_exit()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(dir.path(), "crashing", "echo 'Suite.'\nexit 1");

    let err = list(&mut ListTestsCommand::new(&executable), &CancellationToken::new()).unwrap_err();
    assert!(matches!(err, LocatorError::ProcessFailed { .. }));
}

#[test]
fn test_list_tests_missing_executable()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let err = list(
        &mut ListTestsCommand::new(dir.path().join("absent")),
        &CancellationToken::new(),
    )
    .unwrap_err();
    assert!(matches!(err, LocatorError::ProcessFailed { .. }));
}

#[test]
fn test_list_tests_cancellation_kills_child()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(dir.path(), "hanging", "echo 'Suite.'\necho '  A'\nexec sleep 10");

    let token = CancellationToken::new();
    let canceller = token.clone();
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(300));
        canceller.cancel();
    });

    let start = Instant::now();
    let err = list(&mut ListTestsCommand::new(&executable), &token).unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, LocatorError::Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn test_create_test_cases_without_symbols()
{
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(dir.path(), "listing", LISTING);

    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let reporter: TestCaseReporter =
        Arc::new(move |test_case: &TestCase| sink.lock().unwrap().push(test_case.name().to_string()));

    for use_new_test_execution_framework in [true, false] {
        reported.lock().unwrap().clear();
        let settings = DiscoverySettings {
            parse_symbol_information: false,
            use_new_test_execution_framework,
            ..DiscoverySettings::default()
        };

        let returned = create_test_cases(&executable, &settings, reporter.clone());

        assert_eq!(returned.len(), 4);
        assert!(returned.iter().all(|test_case| !test_case.has_source_location()));
        assert_eq!(*reported.lock().unwrap(), ["Suite.A", "Suite.B", "Typed/0.Case", "Inst/Param.Case/0"]);
    }
}

#[test]
fn test_create_test_cases_on_unlocatable_executable()
{
    // A shell script has no debug info: every test is still reported.
    let _guard = serialize();
    let dir = tempfile::tempdir().unwrap();
    let executable = script(dir.path(), "listing", LISTING);

    let returned = create_test_cases(&executable, &DiscoverySettings::default(), silent_reporter());
    assert_eq!(returned.len(), 4);
    assert!(returned.iter().all(|test_case| !test_case.has_source_location()));
}
