/// Index-build progress reporting: lightweight messages sent from the
/// thread running `init` to whoever renders progress, via a crossbeam channel.
use crate::contracts::ProgressSink;
use crossbeam_channel::{Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Maximum number of progress messages that may queue up in the channel.
///
/// Reports are sent with `try_send`, so a slow consumer drops intermediate
/// fractions instead of stalling the index build.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 256;

/// Progress updates sent while the backlink index is being built.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexProgress {
    /// Fraction of candidate assets inserted so far (`0.0..=1.0`).
    Update { fraction: f32 },
    /// The cancel flag was observed. The build keeps running; this is sent once.
    CancelRequested,
}

/// [`ProgressSink`] that forwards reports over a bounded channel and reads
/// cancellation from a shared flag.
pub struct ChannelProgress {
    tx: Sender<IndexProgress>,
    cancel_flag: Arc<AtomicBool>,
    cancel_sent: bool,
}

impl ChannelProgress {
    /// Create the sink together with the receiving end of its channel.
    pub fn new() -> (Self, Receiver<IndexProgress>) {
        let (tx, rx) = crossbeam_channel::bounded(PROGRESS_CHANNEL_CAPACITY);
        let sink = Self {
            tx,
            cancel_flag: Arc::new(AtomicBool::new(false)),
            cancel_sent: false,
        };
        (sink, rx)
    }

    /// Handle other threads can use to request cancellation.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel_flag.clone()
    }
}

impl ProgressSink for ChannelProgress {
    fn report(&mut self, fraction: f32) -> bool {
        let _ = self.tx.try_send(IndexProgress::Update { fraction });
        let cancelled = self.cancel_flag.load(Ordering::Relaxed);
        if cancelled && !self.cancel_sent {
            let _ = self.tx.try_send(IndexProgress::CancelRequested);
            self.cancel_sent = true;
        }
        cancelled
    }
}
