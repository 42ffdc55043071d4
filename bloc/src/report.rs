//! Operator facing progress output.

use std::io::Write;

/// Receives progress notifications from the driver.
///
/// Reporting never fails a run, so implementations should swallow their own output errors.
pub trait Reporter {
    /// Called once the time step is installed.
    fn time_step(&mut self, _time_step: f64) {}
    /// Called after every dump with the step index the dump belongs to.
    fn checkpoint(&mut self, phase: &str, step: u64);
    /// Called after the last step of a phase.
    fn phase_complete(&mut self, message: &str);
}

/// Discards all progress output.
#[derive(Copy, Clone, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn checkpoint(&mut self, _: &str, _: u64) {}
    fn phase_complete(&mut self, _: &str) {}
}

/// Writes a single self-overwriting progress line followed by phase completion lines.
#[derive(Debug)]
pub struct ConsoleReporter<W> {
    out: W,
}

impl ConsoleReporter<std::io::Stdout> {
    pub fn stdout() -> Self {
        ConsoleReporter {
            out: std::io::stdout(),
        }
    }
}

impl<W: Write> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        ConsoleReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, args: std::fmt::Arguments) {
        let res = self.out.write_fmt(args).and_then(|_| self.out.flush());
        if let Err(err) = res {
            log::warn!("Failed to write progress: {}", err);
        }
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn time_step(&mut self, time_step: f64) {
        self.emit(format_args!("Time step: {}\n", time_step));
    }
    fn checkpoint(&mut self, phase: &str, step: u64) {
        self.emit(format_args!("{} step {}\t\r", phase, step));
    }
    fn phase_complete(&mut self, message: &str) {
        self.emit(format_args!("{}\n", message));
    }
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn time_step(&mut self, time_step: f64) {
        (**self).time_step(time_step)
    }
    fn checkpoint(&mut self, phase: &str, step: u64) {
        (**self).checkpoint(phase, step)
    }
    fn phase_complete(&mut self, message: &str) {
        (**self).phase_complete(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_line_is_overwritten() {
        let mut reporter = ConsoleReporter::new(Vec::new());
        reporter.time_step(0.5);
        reporter.checkpoint("compression", 0);
        reporter.checkpoint("compression", 100);
        reporter.phase_complete("Compression done !");
        let out = String::from_utf8(reporter.into_inner()).unwrap();
        assert_eq!(
            out,
            "Time step: 0.5\ncompression step 0\t\rcompression step 100\t\rCompression done !\n"
        );
    }
}
