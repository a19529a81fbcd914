//! Tracing/logging setup shared by pantry processes and tests.

/// Initialize process-wide tracing with the default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with_default(tracing::DEFAULT_FILTER);
}

/// Tracing configuration (filters, formatter).
pub mod tracing;
