//! Tests for error handling

use std::path::PathBuf;
use std::time::Duration;

use testloc_core::error::{LocatorError, LocatorResult};

#[test]
fn test_unreadable_debug_info_display()
{
    let error = LocatorError::unreadable("/build/LoadTests.pdb", "bad MSF header");
    let message = error.to_string();
    assert!(message.contains("/build/LoadTests.pdb"));
    assert!(message.contains("bad MSF header"));
}

#[test]
fn test_discovery_timeout_display()
{
    let error = LocatorError::DiscoveryTimeout {
        executable: PathBuf::from("/build/LoadTests"),
        timeout: Duration::from_secs(30),
    };
    let message = error.to_string();
    assert!(message.contains("/build/LoadTests"));
    assert!(message.contains("30s"));
}

#[test]
fn test_pattern_and_filter_display()
{
    let pattern = LocatorError::MalformedPattern {
        pattern: "[oops".to_string(),
        reason: "invalid range pattern".to_string(),
    };
    assert!(pattern.to_string().contains("[oops"));

    let filter = LocatorError::InvalidFilter {
        filter: "/(/".to_string(),
        reason: "unclosed group".to_string(),
    };
    assert!(filter.to_string().contains("unclosed group"));
}

#[test]
fn test_io_error_conversion()
{
    fn read_missing() -> LocatorResult<Vec<u8>>
    {
        Ok(std::fs::read("/definitely/not/here")?)
    }

    match read_missing() {
        Err(LocatorError::Io(_)) => {}
        other => panic!("Expected Io variant, got {other:?}"),
    }
}

#[test]
fn test_cancelled_display()
{
    assert_eq!(LocatorError::Cancelled.to_string(), "Operation cancelled");
}
