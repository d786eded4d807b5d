//! Tracing infrastructure for step-by-step inspection of a solve.
//!
//! When the `trace` feature is enabled, the solver writes one tagged line per
//! event to an attached `TraceWriter`:
//! ```text
//! TRACE POP box=<n> f=[lo,hi] w=<diam> fw=<width>
//! TRACE RETIRE box=<n> reason=<tag> upper=<val> f_best_high=<val>
//! TRACE SPLIT box=<n> iter=<n> dim=<d>
//! TRACE PROBE child=<k> e_lower=<val> f_best_low=<val>
//! TRACE DONE f_best_high=<val> f_best_low=<val> nit=<n> nbox=<n> nfev=<n>
//! ```

use std::fmt::Write as FmtWrite;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// A thread-safe buffer that collects trace lines.
pub struct TraceWriter {
    buffer: Mutex<String>,
}

impl TraceWriter {
    pub fn new() -> Self {
        Self {
            buffer: Mutex::new(String::with_capacity(64 * 1024)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Write a trace line.
    pub fn write_line(&self, line: &str) {
        let mut buf = self.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    /// Write a formatted trace line using format args.
    pub fn write_fmt(&self, args: std::fmt::Arguments<'_>) {
        let mut buf = self.lock();
        let _ = buf.write_fmt(args);
        buf.push('\n');
    }

    /// Get all collected trace output.
    pub fn get_output(&self) -> String {
        self.lock().clone()
    }

    /// Get trace output as a vector of lines.
    pub fn get_lines(&self) -> Vec<String> {
        self.lock().lines().map(|s| s.to_string()).collect()
    }

    /// Count lines starting with `TRACE <tag>`.
    pub fn count_tag(&self, tag: &str) -> usize {
        let prefix = format!("TRACE {} ", tag);
        self.lock().lines().filter(|l| l.starts_with(&prefix)).count()
    }

    /// Also write trace output to stderr for debugging.
    pub fn dump_to_stderr(&self) {
        let buf = self.lock();
        let _ = std::io::stderr().write_all(buf.as_bytes());
    }
}

impl Default for TraceWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro for conditional trace output (only active with `trace` feature).
#[cfg(feature = "trace")]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if let Some(ref tw) = $tracer {
            tw.write_fmt(format_args!($($arg)*));
        }
    };
}

/// No-op when trace feature is disabled. Arguments are still type-checked
/// so that values computed only for tracing do not trigger unused warnings.
#[cfg(not(feature = "trace"))]
#[macro_export]
macro_rules! trace_write {
    ($tracer:expr, $($arg:tt)*) => {
        if false {
            let _ = &$tracer;
            ::std::mem::drop(::std::format!($($arg)*));
        }
    };
}
