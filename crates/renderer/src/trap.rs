//! Scoped capture of asynchronous host errors.
//!
//! Some hosts accept a creation call and only later report that the request was
//! rejected. [`ErrorTrap`] installs a fresh [`ErrorSink`] as the host's error hook,
//! and on release flushes the host and puts the previous hook back. Release also
//! runs from `Drop`, so an early return or a panic inside the trapped action still
//! restores the hook.

use crate::error::CreationFailure;
use crate::host::{ErrorHook, ErrorSink};

pub struct ErrorTrap<'h, H: ErrorHook> {
    host: &'h mut H,
    sink: ErrorSink,
    saved: Option<H::Saved>,
}

impl<'h, H: ErrorHook> ErrorTrap<'h, H> {
    pub fn install(host: &'h mut H) -> Self {
        let sink = ErrorSink::new();
        let saved = host.install_error_hook(sink.clone());
        Self {
            host,
            sink,
            saved: Some(saved),
        }
    }

    /// The host, for running the trapped action.
    pub fn host(&mut self) -> &mut H {
        &mut *self.host
    }

    /// Flushes pending host errors, restores the previous hook and returns what
    /// was captured.
    pub fn finish(mut self) -> Vec<String> {
        self.host.flush_errors();
        self.release();
        self.sink.take()
    }

    fn release(&mut self) {
        if let Some(saved) = self.saved.take() {
            self.host.restore_error_hook(saved);
        }
    }
}

impl<H: ErrorHook> Drop for ErrorTrap<'_, H> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Result of an action run under an [`ErrorTrap`].
#[derive(Debug)]
pub struct Trapped<T> {
    pub value: Option<T>,
    pub errors: Vec<String>,
}

impl<T> Trapped<T> {
    pub fn succeeded(&self) -> bool {
        self.value.is_some() && self.errors.is_empty()
    }

    /// Splits into the usable value or the failure, plus any value the host
    /// produced that must still be released because errors were reported.
    pub fn into_parts(self) -> (Result<T, CreationFailure>, Option<T>) {
        match (self.value, self.errors.is_empty()) {
            (Some(value), true) => (Ok(value), None),
            (value, false) => (Err(CreationFailure::Rejected(self.errors)), value),
            (None, true) => (Err(CreationFailure::NullHandle), None),
        }
    }
}

/// Runs `action` with the trap active only for its duration.
pub fn attempt_with_trap<H, T, F>(host: &mut H, action: F) -> Trapped<T>
where
    H: ErrorHook,
    F: FnOnce(&mut H) -> Option<T>,
{
    let mut trap = ErrorTrap::install(host);
    let value = action(trap.host());
    let errors = trap.finish();
    Trapped { value, errors }
}
