//! Shared error type across testwrap crates.

use thiserror::Error;

/// Stable error codes (printed in diagnostics and asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid or contradictory configuration.
    BadConfig,
    /// Both structured-report and coverage mode requested.
    ModeConflict,
    /// A required external tool is not installed.
    MissingTool,
    /// Policy manifest failed to parse or validate.
    BadPolicy,
    /// Coverage profile could not be merged.
    BadProfile,
    /// The test tool exited non-zero.
    TestFailed,
    /// Filesystem or process plumbing failed.
    Io,
}

impl ErrorCode {
    /// String representation used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::ModeConflict => "MODE_CONFLICT",
            ErrorCode::MissingTool => "MISSING_TOOL",
            ErrorCode::BadPolicy => "BAD_POLICY",
            ErrorCode::BadProfile => "BAD_PROFILE",
            ErrorCode::TestFailed => "TEST_FAILED",
            ErrorCode::Io => "IO",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TestwrapError>;

/// Unified error type used by core and runner.
#[derive(Debug, Error)]
pub enum TestwrapError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("structured-report mode and coverage mode cannot be combined")]
    ModeConflict,
    #[error("missing tool `{tool}`: {hint}")]
    MissingTool { tool: String, hint: String },
    #[error("bad policy: {0}")]
    BadPolicy(String),
    #[error("bad coverage profile: {0}")]
    BadProfile(String),
    #[error("tests failed with exit code {0}")]
    TestFailed(i32),
    #[error("io: {0}")]
    Io(String),
}

impl TestwrapError {
    /// Map the error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TestwrapError::BadConfig(_) => ErrorCode::BadConfig,
            TestwrapError::ModeConflict => ErrorCode::ModeConflict,
            TestwrapError::MissingTool { .. } => ErrorCode::MissingTool,
            TestwrapError::BadPolicy(_) => ErrorCode::BadPolicy,
            TestwrapError::BadProfile(_) => ErrorCode::BadProfile,
            TestwrapError::TestFailed(_) => ErrorCode::TestFailed,
            TestwrapError::Io(_) => ErrorCode::Io,
        }
    }

    /// Process exit status for this error.
    ///
    /// A failed test run keeps the tool's own code; every other failure is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            TestwrapError::TestFailed(code) if *code != 0 => *code,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for TestwrapError {
    fn from(e: std::io::Error) -> Self {
        TestwrapError::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_keeps_tool_code() {
        assert_eq!(TestwrapError::TestFailed(2).exit_code(), 2);
        assert_eq!(TestwrapError::TestFailed(0).exit_code(), 1);
    }

    #[test]
    fn config_errors_exit_one() {
        assert_eq!(TestwrapError::ModeConflict.exit_code(), 1);
        let e = TestwrapError::MissingTool { tool: "go-junit-report".into(), hint: "install it".into() };
        assert_eq!(e.exit_code(), 1);
        assert_eq!(e.code().as_str(), "MISSING_TOOL");
    }
}
