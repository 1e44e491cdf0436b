//! Integration Test: No Panics in Production Code
//!
//! **Policy**: Connector code reports every failure through `ConnectorError`
//! or `ConfigError`. `unwrap()`, `expect()` and explicit panics are only
//! allowed in test modules.

use architectural_enforcement::{connector_src, find_violations};

const FORBIDDEN: &[&str] = &[
    ".unwrap()",
    ".expect(",
    "panic!(",
    "unreachable!(",
    "todo!(",
    "unimplemented!(",
];

#[test]
fn test_no_panics_in_connector() {
    let violations = find_violations(&connector_src(), FORBIDDEN);

    if !violations.is_empty() {
        eprintln!("\n❌ Panicking calls found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED: propagate with `?` into ConnectorError / ConfigError");

        panic!(
            "\nFound {} panic violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_no_unsafe_in_connector() {
    let violations = find_violations(&connector_src(), &["unsafe "]);
    assert!(
        violations.is_empty(),
        "unsafe code in connector:\n{}",
        violations.join("\n")
    );
}
