use std::fmt;
use std::sync::Arc;

use crate::progress::{DispatchProgressSink, NoopProgressSink};

#[derive(Clone)]
/// Caller-omittable dispatch parameters.
///
/// `instance: None` selects the configured default instance, an interval of
/// zero disables pacing, and the default sink drops progress lines.
pub struct DispatchOptions {
    pub instance: Option<String>,
    pub interval_seconds: u64,
    pub progress: Arc<dyn DispatchProgressSink>,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            instance: None,
            interval_seconds: 0,
            progress: Arc::new(NoopProgressSink),
        }
    }
}

impl fmt::Debug for DispatchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchOptions")
            .field("instance", &self.instance)
            .field("interval_seconds", &self.interval_seconds)
            .finish_non_exhaustive()
    }
}

impl DispatchOptions {
    pub fn with_instance(mut self, instance: Option<String>) -> Self {
        self.instance = instance;
        self
    }

    pub fn with_interval_seconds(mut self, interval_seconds: u64) -> Self {
        self.interval_seconds = interval_seconds;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn DispatchProgressSink>) -> Self {
        self.progress = progress;
        self
    }
}
