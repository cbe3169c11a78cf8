//! Progress notifications emitted while a file runs.

use std::path::Path;

use crate::model::TestResult;

/// Receives progress events. Reporting only, never affects classification.
///
/// `index` is 1-based.
pub trait ProgressObserver {
    /// Called before the first test of a file.
    fn file_started(&mut self, _path: &Path, _total: usize) {}

    fn test_started(&mut self, index: usize, total: usize, qualified_name: &str);

    fn test_finished(&mut self, index: usize, total: usize, result: &TestResult);
}

/// Logs progress through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ProgressObserver for TracingObserver {
    fn file_started(&mut self, path: &Path, total: usize) {
        tracing::info!("Running {} test(s) from {}", total, path.display());
    }

    fn test_started(&mut self, index: usize, total: usize, qualified_name: &str) {
        tracing::info!("Executing test {}/{}: {}...", index, total, qualified_name);
    }

    fn test_finished(&mut self, _index: usize, _total: usize, result: &TestResult) {
        match result.failure_detail() {
            None => tracing::info!("=> Success"),
            Some(detail) => tracing::error!("=> Failed: {}", detail),
        }
    }
}

/// Discards all events.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ProgressObserver for NoopObserver {
    fn test_started(&mut self, _index: usize, _total: usize, _qualified_name: &str) {}

    fn test_finished(&mut self, _index: usize, _total: usize, _result: &TestResult) {}
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    /// Buffer the subscriber writes formatted events into
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_tracing_observer_logs_progress() {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_target(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut observer = TracingObserver;
            observer.file_started(Path::new("inventory.json"), 2);
            observer.test_started(1, 2, "dbo.A");
            observer.test_finished(1, 2, &TestResult::passed("dbo.A"));
            observer.test_started(2, 2, "dbo.B");
            observer.test_finished(2, 2, &TestResult::failed("dbo.B", "boom"));
        });

        let output = captured.contents();
        assert!(output.contains("Running 2 test(s) from inventory.json"));
        assert!(output.contains("Executing test 1/2: dbo.A..."));
        assert!(output.contains("Executing test 2/2: dbo.B..."));
        assert!(output.contains("=> Success"));
        assert!(output.contains("ERROR"));
        assert!(output.contains("=> Failed: boom"));
    }

    #[test]
    fn test_noop_observer_accepts_events() {
        let mut observer = NoopObserver;
        observer.file_started(Path::new("inventory.json"), 1);
        observer.test_started(1, 1, "dbo.A");
        observer.test_finished(1, 1, &TestResult::passed("dbo.A"));
    }
}
