//! Pass/fail/skip counts scraped from verbose test output.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub packages_ok: usize,
    pub packages_failed: usize,
}

impl RunSummary {
    /// Count result lines in verbose output.
    ///
    /// Subtest results are indented, so lines are trimmed before matching.
    pub fn scan(output: &str) -> Self {
        let mut s = Self::default();
        for line in output.lines() {
            let t = line.trim_start();
            if t.starts_with("--- PASS:") {
                s.passed += 1;
            } else if t.starts_with("--- FAIL:") {
                s.failed += 1;
            } else if t.starts_with("--- SKIP:") {
                s.skipped += 1;
            } else if line.starts_with("ok ") || line.starts_with("ok\t") {
                s.packages_ok += 1;
            } else if line.starts_with("FAIL\t") || line.starts_with("FAIL ") {
                s.packages_failed += 1;
            }
        }
        s
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped
    }

    pub fn render(&self) -> String {
        format!(
            "tests: {} passed, {} failed, {} skipped ({} total); packages: {} ok, {} failed",
            self.passed,
            self.failed,
            self.skipped,
            self.total(),
            self.packages_ok,
            self.packages_failed
        )
    }
}
