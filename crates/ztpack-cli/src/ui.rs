//! Console output helpers.
//!
//! The pipeline is strictly sequential, so plain line output suffices; no
//! progress redraw machinery.

/// Handle for user-facing console messages. Diagnostic detail goes through
/// `tracing` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output;

impl Output {
    /// Create a new output handle.
    pub fn new() -> Self {
        Self
    }

    /// Prints an informational message to the console.
    pub fn info(&self, msg: &str) {
        println!("   {msg}");
    }

    /// Prints a success message to the console.
    pub fn success(&self, msg: &str) {
        println!("ok {msg}");
    }

    /// Prints a warning message to the console.
    pub fn warning(&self, msg: &str) {
        eprintln!("!  {msg}");
    }

    /// Prints an error message to the console.
    pub fn error(&self, msg: &str) {
        eprintln!("error: {msg}");
    }
}
