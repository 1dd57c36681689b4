/// Receives human-readable progress lines while a dispatch runs.
pub trait DispatchProgressSink: Send + Sync {
    fn info(&self, message: &str);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgressSink;

impl DispatchProgressSink for NoopProgressSink {
    fn info(&self, _message: &str) {}
}

#[derive(Debug, Clone, Copy, Default)]
/// Forwards progress lines to `tracing` at info level.
pub struct TracingProgressSink;

impl DispatchProgressSink for TracingProgressSink {
    fn info(&self, message: &str) {
        tracing::info!(target: "relay::progress", "{message}");
    }
}
