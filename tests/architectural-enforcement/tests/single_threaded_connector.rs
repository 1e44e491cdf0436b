//! Integration Test: Single-Threaded Connector
//!
//! **Policy**: The connector performs no internal threading, locking or
//! asynchronous scheduling. It relies on OS socket buffering and runs every
//! operation on the caller's thread.
//!
//! A shared `AtomicBool` for the connected flag is allowed; it is how a
//! shutdown handle marks the connector before closing the socket.

use architectural_enforcement::{connector_src, find_violations};

const FORBIDDEN: &[&str] = &[
    "thread::spawn",
    "std::thread",
    "Mutex",
    "RwLock",
    "Condvar",
    "tokio::",
    "async fn",
    ".await",
];

#[test]
fn test_no_threads_or_locks_in_connector() {
    let violations = find_violations(&connector_src(), FORBIDDEN);

    if !violations.is_empty() {
        eprintln!("\n❌ Threading or locking found in connector code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED: blocking calls on the caller's thread, OS buffering only");

        panic!(
            "\nFound {} threading violation(s) in connector code.\nFix these before merging!",
            violations.len()
        );
    }
}
