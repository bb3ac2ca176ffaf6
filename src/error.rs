//! Exit codes for the dupescan binary.

/// Exit codes for the dupescan application.
///
/// - 0: Success (run completed, every input was readable)
/// - 1: General error (configuration, input or output failure)
/// - 3: Partial success (run completed but some paths were skipped on errors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: every cluster was reported and no path failed.
    Success = 0,
    /// General error: an unexpected or fatal error occurred.
    GeneralError = 1,
    /// Partial success: clusters were reported but some paths could not be read.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::PartialSuccess => "DS003",
        }
    }

    /// Pick the exit code for a completed run from its error count.
    #[must_use]
    pub fn from_error_count(errors: usize) -> Self {
        if errors == 0 {
            Self::Success
        } else {
            Self::PartialSuccess
        }
    }
}
