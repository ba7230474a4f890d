//! Process-wide logging setup shared by the binaries.

/// Tracing subscriber installation.
pub mod tracing;

pub use self::tracing::LogFormat;

/// Initialize logging from the environment.
///
/// Safe to call multiple times; subsequent calls are no-ops.
pub fn init() {
    self::tracing::init(LogFormat::from_env());
}
