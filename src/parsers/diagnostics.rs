use std::path::Path;

/// Receiver for parse warnings as they are recorded.
///
/// The parsers always return their warnings as data; a sink only observes
/// them. The library never installs one itself.
pub trait Diagnostics: Sync {
    fn warning(&self, path: &Path, message: &str);
}

/// Sink that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn warning(&self, _path: &Path, _message: &str) {}
}

/// Sink forwarding warnings to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn warning(&self, path: &Path, message: &str) {
        tracing::warn!(file = %path.display(), "{message}");
    }
}
