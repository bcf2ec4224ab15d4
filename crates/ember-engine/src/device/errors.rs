use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Classification of asynchronously reported device errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DeviceErrorKind {
    Validation,
    OutOfMemory,
    Internal,
}

/// One queued uncaptured device error.
#[derive(Debug, Clone)]
pub struct DeviceError {
    pub kind: DeviceErrorKind,
    pub message: String,
}

impl DeviceError {
    pub fn new(kind: DeviceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "uncaptured device error ({:?}): {}", self.kind, self.message)
    }
}

impl From<wgpu::Error> for DeviceError {
    fn from(err: wgpu::Error) -> Self {
        let kind = match &err {
            wgpu::Error::OutOfMemory { .. } => DeviceErrorKind::OutOfMemory,
            wgpu::Error::Validation { .. } => DeviceErrorKind::Validation,
            _ => DeviceErrorKind::Internal,
        };
        Self::new(kind, err.to_string())
    }
}

/// Ordered queue of device errors crossing the async callback boundary.
///
/// The uncaptured-error callback may fire on a driver thread while the main
/// thread is draining, so all access goes through a mutex. Clones share the
/// same queue.
#[derive(Clone, Default)]
pub struct ErrorSink {
    queue: Arc<Mutex<VecDeque<DeviceError>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<DeviceError>> {
        // A panicking callback must not wedge the drain path.
        match self.queue.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn push(&self, error: DeviceError) {
        self.lock().push_back(error);
    }

    /// Drains queued errors in arrival order into `f`.
    ///
    /// Returns `true` if at least one error was drained.
    pub fn drain_with(&self, mut f: impl FnMut(&DeviceError)) -> bool {
        let mut queue = self.lock();
        let had_errors = !queue.is_empty();
        while let Some(error) = queue.pop_front() {
            f(&error);
        }
        had_errors
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(kind: DeviceErrorKind, msg: &str) -> DeviceError {
        DeviceError::new(kind, msg)
    }

    #[test]
    fn drain_preserves_arrival_order() {
        let sink = ErrorSink::new();
        sink.push(err(DeviceErrorKind::Validation, "first"));
        sink.push(err(DeviceErrorKind::Internal, "second"));

        let mut seen = Vec::new();
        let had = sink.drain_with(|e| seen.push(e.message.clone()));

        assert!(had);
        assert_eq!(seen, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn drain_empties_the_queue() {
        let sink = ErrorSink::new();
        sink.push(err(DeviceErrorKind::Validation, "boom"));

        assert!(sink.drain_with(|_| {}));
        assert!(sink.is_empty());
        assert!(!sink.drain_with(|_| panic!("queue should be empty")));
    }

    #[test]
    fn clones_share_one_queue() {
        let sink = ErrorSink::new();
        let callback_handle = sink.clone();

        let worker = std::thread::spawn(move || {
            callback_handle.push(err(DeviceErrorKind::OutOfMemory, "from callback thread"));
        });
        worker.join().expect("worker panicked");

        let mut count = 0;
        sink.drain_with(|e| {
            assert_eq!(e.kind, DeviceErrorKind::OutOfMemory);
            count += 1;
        });
        assert_eq!(count, 1);
    }

    #[test]
    fn display_includes_kind_and_message() {
        let e = err(DeviceErrorKind::Validation, "bad bind group");
        assert_eq!(
            e.to_string(),
            "uncaptured device error (Validation): bad bind group"
        );
    }
}
