//! ExecResult — the structured result of every command execution.
//!
//! Every builtin returns one of these: an exit code, the output block, and
//! an error message. The terminal renders `out` on success and `err` with
//! the error flag set on failure — no exceptions cross this boundary.

/// The result of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i64,
    /// Standard output as a string.
    pub out: String,
    /// Standard error as a string.
    pub err: String,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i64, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
        }
    }

    /// Create a result from both output streams.
    pub fn from_output(code: i64, out: impl Into<String>, err: impl Into<String>) -> Self {
        Self {
            code,
            out: out.into(),
            err: err.into(),
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }

    /// The text a terminal should render: `out` on success, `err` otherwise.
    pub fn display_text(&self) -> &str {
        if self.ok() || self.err.is_empty() {
            &self.out
        } else {
            &self.err
        }
    }
}

impl Default for ExecResult {
    fn default() -> Self {
        Self::success("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_creates_ok_result() {
        let result = ExecResult::success("hello world");
        assert!(result.ok());
        assert_eq!(result.code, 0);
        assert_eq!(result.out, "hello world");
        assert!(result.err.is_empty());
    }

    #[test]
    fn failure_creates_non_ok_result() {
        let result = ExecResult::failure(127, "command not found");
        assert!(!result.ok());
        assert_eq!(result.code, 127);
        assert_eq!(result.err, "command not found");
    }

    #[test]
    fn display_text_picks_the_right_stream() {
        assert_eq!(ExecResult::success("out").display_text(), "out");
        assert_eq!(ExecResult::failure(1, "err").display_text(), "err");
    }

    #[test]
    fn partial_failure_keeps_output() {
        let result = ExecResult::from_output(1, "some output", "one file failed");
        assert!(!result.ok());
        assert_eq!(result.out, "some output");
    }
}
