//! Diagnostic sinks for header decoding and encoding.
//!
//! The codec reports recoverable problems
//! (unknown keys, unparseable values)
//! to a [`Logger`] instead of failing.
//! By default these go to [`tracing`].
use tracing::{debug, error};

/// A sink for informational messages and recoverable errors.
pub trait Logger {
    /// Record an informational message.
    fn log(&self, text: &str);

    /// Record a recoverable error.
    fn error(&self, title: &str, text: &str);
}

impl<L: ?Sized> Logger for &L
where
    L: Logger,
{
    fn log(&self, text: &str) {
        (**self).log(text)
    }

    fn error(&self, title: &str, text: &str) {
        (**self).error(title, text)
    }
}

impl<L: ?Sized> Logger for Box<L>
where
    L: Logger,
{
    fn log(&self, text: &str) {
        (**self).log(text)
    }

    fn error(&self, title: &str, text: &str) {
        (**self).error(title, text)
    }
}

/// The default logger, which forwards every message to `tracing`.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, text: &str) {
        debug!("{}", text);
    }

    fn error(&self, title: &str, text: &str) {
        error!("{}: {}", title, text);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Logger;
    use std::cell::RefCell;

    /// Keeps all messages for inspection.
    #[derive(Debug, Default)]
    pub struct RecordingLogger {
        pub messages: RefCell<Vec<String>>,
        pub errors: RefCell<Vec<(String, String)>>,
    }

    impl Logger for RecordingLogger {
        fn log(&self, text: &str) {
            self.messages.borrow_mut().push(text.to_string());
        }

        fn error(&self, title: &str, text: &str) {
            self.errors
                .borrow_mut()
                .push((title.to_string(), text.to_string()));
        }
    }
}
