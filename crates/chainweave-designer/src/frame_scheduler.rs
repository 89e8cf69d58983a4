//! Per-frame coalescing of redraw and selection work.
//!
//! Pointer events can arrive many times between two animation frames. Work
//! they trigger is only flagged here; the host drains the flags once per frame
//! so at most one recomputation of each kind happens per frame.

/// Kinds of deferred work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameWork {
    /// Hit circles / ring render list need to be redrawn.
    Redraw,
    /// The live selection must be recomputed from the drag endpoints.
    SelectionRecompute,
}

/// Work taken for the current frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameBatch {
    pub redraw: bool,
    pub selection: bool,
}

impl FrameBatch {
    pub fn is_empty(&self) -> bool {
        !self.redraw && !self.selection
    }
}

#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    pending: FrameBatch,
    requests: u64,
    frames: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags `work` for the next frame. Returns `false` when it was already
    /// pending, meaning the request was absorbed.
    pub fn request(&mut self, work: FrameWork) -> bool {
        self.requests += 1;
        let flag = match work {
            FrameWork::Redraw => &mut self.pending.redraw,
            FrameWork::SelectionRecompute => &mut self.pending.selection,
        };
        let newly = !*flag;
        *flag = true;
        newly
    }

    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Clears and returns everything flagged since the last frame.
    pub fn take_pending(&mut self) -> FrameBatch {
        let batch = std::mem::take(&mut self.pending);
        if !batch.is_empty() {
            self.frames += 1;
        }
        batch
    }

    /// Drops pending work without running it.
    pub fn cancel(&mut self) {
        self.pending = FrameBatch::default();
    }

    /// Total requests seen and frames that actually ran work.
    pub fn stats(&self) -> (u64, u64) {
        (self.requests, self.frames)
    }
}
