use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use scripter::exec::{HostError, ScriptHost};

/// One recorded host invocation.
#[derive(Debug, Clone)]
pub struct HostCall {
    pub source: String,
    pub entered: Instant,
    pub exited: Instant,
}

/// A fake script host that:
/// - records every invocation with enter/exit timestamps
/// - optionally sleeps inside the call (to make overlap observable)
/// - answers with a fixed, scripted result.
pub struct RecordingHost {
    delay: Duration,
    result: Result<Option<String>, HostError>,
    calls: Arc<Mutex<Vec<HostCall>>>,
}

impl RecordingHost {
    pub fn new(result: Result<Option<String>, HostError>) -> Self {
        Self {
            delay: Duration::ZERO,
            result,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(value: &str) -> Self {
        Self::new(Ok(Some(value.to_string())))
    }

    pub fn failing(message: &str, code: Option<i32>) -> Self {
        Self::new(Err(HostError {
            message: message.to_string(),
            code,
        }))
    }

    /// Sleep this long inside every `run` call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ScriptHost for RecordingHost {
    fn run(&self, source: &str) -> Result<Option<String>, HostError> {
        let entered = Instant::now();
        std::thread::sleep(self.delay);
        let exited = Instant::now();

        self.calls.lock().unwrap().push(HostCall {
            source: source.to_string(),
            entered,
            exited,
        });

        self.result.clone()
    }
}
