//! Progress monitor: a read-only observer of SharedProgress.
//!
//! Runs on its own thread and sleeps a fixed interval between polls, so it
//! never competes with workers for CPU. It exits once the counter reaches
//! the total (which the engine guarantees by forcing the counter after
//! every worker has returned) or once the run is cancelled.
//!
//! Rendering problems are never fatal: the first error is logged and
//! rendering is switched off, but polling carries on until termination.

use crate::{progress::SharedProgress, types::TrialCount};
use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use std::time::Duration;

const BAR_WIDTH: usize = 40;

/// Something that can display cumulative progress.
pub trait ProgressRender: Send {
    /// `delta` trials finished since the previous update.
    fn update(
        &mut self,
        delta: TrialCount,
        completed: TrialCount,
        total: TrialCount,
    ) -> io::Result<()>;

    /// Called once, after the final update.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A single in-place line: `[#####     ]  50.00% 500/1000`.
pub struct TermRender<W: Write + Send> {
    out: W,
}

impl TermRender<io::Stderr> {
    pub fn stderr() -> Self {
        Self { out: io::stderr() }
    }
}

impl<W: Write + Send> TermRender<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ProgressRender for TermRender<W> {
    fn update(
        &mut self,
        _delta: TrialCount,
        completed: TrialCount,
        total: TrialCount,
    ) -> io::Result<()> {
        let fraction = if total == 0 {
            1.0
        } else {
            (completed as f64 / total as f64).min(1.0)
        };
        let filled = (fraction * BAR_WIDTH as f64).round() as usize;
        write!(
            self.out,
            "\r[{}{}] {:>6.2}% {completed}/{total}",
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            fraction * 100.0,
        )?;
        self.out.flush()
    }

    fn finish(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

/// One `info` line per poll. For non-interactive runs.
pub struct LogRender;

impl ProgressRender for LogRender {
    fn update(
        &mut self,
        delta: TrialCount,
        completed: TrialCount,
        total: TrialCount,
    ) -> io::Result<()> {
        log::info!("progress: {completed}/{total} trials (+{delta})");
        Ok(())
    }
}

/// Discards everything.
pub struct NullRender;

impl ProgressRender for NullRender {
    fn update(&mut self, _: TrialCount, _: TrialCount, _: TrialCount) -> io::Result<()> {
        Ok(())
    }
}

pub struct ProgressMonitor {
    progress: SharedProgress,
    total: TrialCount,
    interval: Duration,
    render: Box<dyn ProgressRender>,
    render_enabled: bool,
}

impl ProgressMonitor {
    pub fn new(
        progress: SharedProgress,
        total: TrialCount,
        interval: Duration,
        render: Box<dyn ProgressRender>,
    ) -> Self {
        Self {
            progress,
            total,
            interval,
            render,
            render_enabled: true,
        }
    }

    /// Start polling on a dedicated thread. The handle yields the last
    /// value the monitor observed.
    pub fn spawn(self) -> io::Result<JoinHandle<TrialCount>> {
        thread::Builder::new()
            .name("progress-monitor".into())
            .spawn(move || self.run())
    }

    /// Poll until the counter reaches the total or the run is cancelled.
    pub fn run(mut self) -> TrialCount {
        let mut last: TrialCount = 0;
        loop {
            let current = self.progress.completed();
            if current >= self.total {
                self.emit(self.total.saturating_sub(last), self.total);
                last = current;
                break;
            }
            if self.progress.is_cancelled() {
                last = self.progress.completed();
                log::debug!("monitor: run cancelled at {last}/{}", self.total);
                break;
            }
            if current > last {
                self.emit(current - last, current);
                last = current;
            }
            thread::sleep(self.interval);
        }
        if self.render_enabled {
            if let Err(e) = self.render.finish() {
                log::warn!("monitor: progress rendering failed: {e}");
            }
        }
        last
    }

    fn emit(&mut self, delta: TrialCount, completed: TrialCount) {
        if !self.render_enabled {
            return;
        }
        if let Err(e) = self.render.update(delta, completed, self.total) {
            log::warn!("monitor: progress rendering failed, disabling: {e}");
            self.render_enabled = false;
        }
    }
}
