//! Exit codes for the lintrun binary.
//!
//! | Code | Constant | Description |
//! |------|----------|-------------|
//! | 0 | `SUCCESS` | Operation completed successfully |
//! | 1 | `NOT_FOUND` | Lookup found nothing (`which`) |
//! | 2 | `CLI_ARGS` | Invalid CLI arguments or settings |
//! | 70 | `EXECUTION_FAILURE` | Command could not be launched or collected |

/// Process exit code.
///
/// # Example
///
/// ```rust
/// use lintrun_utils::ExitCode;
///
/// assert_eq!(ExitCode::SUCCESS.as_i32(), 0);
/// assert_eq!(ExitCode::from_i32(70), ExitCode::EXECUTION_FAILURE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);

    /// Nothing matched the query
    pub const NOT_FOUND: ExitCode = ExitCode(1);

    /// Invalid or missing command-line arguments, or unusable settings
    pub const CLI_ARGS: ExitCode = ExitCode(2);

    /// The external command could not be run to completion
    pub const EXECUTION_FAILURE: ExitCode = ExitCode(70);

    /// Numeric value for `std::process::exit()`.
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn from_i32(code: i32) -> Self {
        ExitCode(code)
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.0
    }
}
