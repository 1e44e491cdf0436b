//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles
//! of the connector crate:
//! - The connector is single-threaded (no spawned threads, no locks)
//! - Production code propagates errors instead of panicking
//!
//! These tests are designed to catch violations early in the development cycle.
//! The helpers below walk a source tree and hand back production lines only,
//! i.e. everything before the first `#[cfg(test)]` in each file.

use std::fs;
use std::path::{Path, PathBuf};

/// Root of the connector crate's sources
#[must_use]
pub fn connector_src() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../connector/core/src")
}

/// A single production source line
#[derive(Debug, Clone)]
pub struct SourceLine {
    /// File the line comes from
    pub path: PathBuf,
    /// 1-based line number
    pub number: usize,
    /// Line text with any `//` comment stripped
    pub code: String,
}

/// Collect production lines of every `.rs` file under `dir`
#[must_use]
pub fn production_lines(dir: &Path) -> Vec<SourceLine> {
    let mut lines = Vec::new();

    for entry in walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("rs") {
            continue;
        }

        let Ok(content) = fs::read_to_string(entry.path()) else {
            continue;
        };

        for (idx, line) in content.lines().enumerate() {
            if line.trim_start().starts_with("#[cfg(test)]") {
                break;
            }

            let code = line.split("//").next().unwrap_or(line).trim();
            if code.is_empty() {
                continue;
            }

            lines.push(SourceLine {
                path: entry.path().to_path_buf(),
                number: idx + 1,
                code: code.to_string(),
            });
        }
    }

    lines
}

/// Report every production line containing one of `patterns`
#[must_use]
pub fn find_violations(dir: &Path, patterns: &[&str]) -> Vec<String> {
    production_lines(dir)
        .into_iter()
        .filter_map(|line| {
            patterns
                .iter()
                .find(|pattern| line.code.contains(*pattern))
                .map(|pattern| {
                    format!(
                        "{}:{} - `{}`: {}",
                        line.path.display(),
                        line.number,
                        pattern,
                        line.code
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_src_exists() {
        assert!(connector_src().join("lib.rs").exists());
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let lines = production_lines(&connector_src());
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| !l.code.contains("mod tests")));
    }
}
