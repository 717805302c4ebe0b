//! Progress reporting for artifact transfers.

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::OnceLock;

/// Counter state of a single transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferProgress {
    pub bytes_transferred: u64,
    /// `None` when the server did not announce a size.
    pub total_bytes: Option<u64>,
}

impl TransferProgress {
    pub fn new(total_bytes: Option<u64>) -> Self {
        Self {
            bytes_transferred: 0,
            total_bytes,
        }
    }

    pub fn record(&mut self, chunk_len: u64) {
        self.bytes_transferred += chunk_len;
    }
}

/// Receives transfer events from the fetcher.
pub trait Progress {
    fn begin(&mut self, label: &str, total: Option<u64>);

    /// Called once per chunk with that chunk's length.
    fn advance(&mut self, bytes: u64);

    fn finish(&mut self);

    fn abandon(&mut self) {
        self.finish();
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn begin(&mut self, _label: &str, _total: Option<u64>) {}
    fn advance(&mut self, _bytes: u64) {}
    fn finish(&mut self) {}
}

/// Returns the process-wide [`MultiProgress`].
///
/// Log output is routed through it as well so that log lines do not tear
/// running progress bars.
pub fn global_multi_progress() -> MultiProgress {
    static GLOBAL_MP: OnceLock<MultiProgress> = OnceLock::new();
    GLOBAL_MP
        .get_or_init(|| {
            let mp = MultiProgress::new();
            mp.set_draw_target(ProgressDrawTarget::stderr_with_hz(20));
            mp
        })
        .clone()
}

pub fn bytes_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{prefix:30!} [{elapsed_precise}] [{bar:30.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("━━╾─")
}

/// Style for transfers whose size is unknown: spinner plus byte counter.
pub fn unknown_size_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {prefix:30!} [{elapsed_precise}] {bytes} ({bytes_per_sec})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Terminal progress bars, one per artifact.
pub struct BarProgress {
    multi: MultiProgress,
    current: Option<ProgressBar>,
}

impl Default for BarProgress {
    fn default() -> Self {
        Self::new(global_multi_progress())
    }
}

impl BarProgress {
    pub fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            current: None,
        }
    }
}

impl Progress for BarProgress {
    fn begin(&mut self, label: &str, total: Option<u64>) {
        let bar = match total {
            Some(len) => ProgressBar::new(len).with_style(bytes_style()),
            None => ProgressBar::no_length().with_style(unknown_size_style()),
        };
        let bar = self.multi.add(bar.with_prefix(format!("Installing {label}")));
        self.current = Some(bar);
    }

    fn advance(&mut self, bytes: u64) {
        if let Some(bar) = &self.current {
            bar.inc(bytes);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.finish();
        }
    }

    fn abandon(&mut self) {
        if let Some(bar) = self.current.take() {
            bar.abandon();
        }
    }
}
