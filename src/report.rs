/// Diagnostic sink handed to every aggregation component.
///
/// The entry point builds one [`TracingReporter`] after the subscriber is
/// installed and passes it down by reference.
pub trait Reporter {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn debug(&self, msg: &str);
}

/// Forwards diagnostics to the installed `tracing` subscriber.
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

#[cfg(test)]
pub mod testing {
    use super::Reporter;
    use std::cell::RefCell;
    use tracing::Level;

    /// Keeps every message in memory so tests can assert on severity.
    #[derive(Default)]
    pub struct RecordingReporter {
        entries: RefCell<Vec<(Level, String)>>,
    }

    impl RecordingReporter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn messages_at(&self, level: Level) -> Vec<String> {
            self.entries
                .borrow()
                .iter()
                .filter(|(l, _)| *l == level)
                .map(|(_, m)| m.clone())
                .collect()
        }
    }

    impl Reporter for RecordingReporter {
        fn info(&self, msg: &str) {
            self.entries.borrow_mut().push((Level::INFO, msg.to_string()));
        }

        fn warn(&self, msg: &str) {
            self.entries.borrow_mut().push((Level::WARN, msg.to_string()));
        }

        fn debug(&self, msg: &str) {
            self.entries.borrow_mut().push((Level::DEBUG, msg.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;
    use tracing::Level;

    #[test]
    fn recording_reporter_separates_levels() {
        let r = RecordingReporter::new();
        r.info("a");
        r.warn("b");
        r.debug("c");
        assert_eq!(r.messages_at(Level::INFO), vec!["a"]);
        assert_eq!(r.messages_at(Level::WARN), vec!["b"]);
        assert_eq!(r.messages_at(Level::DEBUG), vec!["c"]);
    }

    #[test]
    fn tracing_reporter_works_without_subscriber() {
        let r = TracingReporter;
        r.info("no subscriber installed");
        r.warn("still fine");
        r.debug("dropped");
    }
}
