#![allow(dead_code)]

use rask_log_dispatcher::{Completion, Destination, DestinationError, LogLevel, Metadata};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub level: LogLevel,
    pub message: String,
    pub metadata: Metadata,
}

/// Remembers every call it receives.
pub struct RecordingDestination {
    name: String,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingDestination {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Destination for RecordingDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn log<'a>(
        &'a self,
        level: LogLevel,
        message: &'a str,
        metadata: &'a Metadata,
    ) -> Completion<'a> {
        self.calls.lock().unwrap().push(RecordedCall {
            level,
            message: message.to_string(),
            metadata: metadata.clone(),
        });
        Box::pin(async { Ok(()) })
    }
}

/// Fails every call with an I/O error.
pub struct FailingDestination {
    name: String,
}

impl FailingDestination {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl Destination for FailingDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn log<'a>(&'a self, _: LogLevel, _: &'a str, _: &'a Metadata) -> Completion<'a> {
        Box::pin(async {
            Err(DestinationError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "sink closed",
            )))
        })
    }
}

/// Completes only once every sibling sharing the barrier has been started.
pub struct BarrierDestination {
    name: String,
    barrier: Arc<Barrier>,
}

impl BarrierDestination {
    pub fn new(name: &str, barrier: Arc<Barrier>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            barrier,
        })
    }
}

impl Destination for BarrierDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn log<'a>(&'a self, _: LogLevel, _: &'a str, _: &'a Metadata) -> Completion<'a> {
        Box::pin(async move {
            self.barrier.wait().await;
            Ok(())
        })
    }
}

/// Takes `delay` to complete.
pub struct SlowDestination {
    name: String,
    delay: Duration,
}

impl SlowDestination {
    pub fn new(name: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay,
        })
    }
}

impl Destination for SlowDestination {
    fn name(&self) -> &str {
        &self.name
    }

    fn log<'a>(&'a self, _: LogLevel, _: &'a str, _: &'a Metadata) -> Completion<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;
            Ok(())
        })
    }
}

/// Cloneable in-memory writer for capturing console output.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
