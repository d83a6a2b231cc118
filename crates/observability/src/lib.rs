//! Tracing and logging setup shared by every binary in the workspace.

/// Initialize process-wide observability (structured logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, output format).
pub mod tracing;
