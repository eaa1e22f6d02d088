use crate::assets::store::{DecodedFrame, FrameStore};
use crate::lifecycle::{AnimationKind, DecodeStatus, Snapshot};

/// Floor applied to decoder-reported frame delays.
///
/// A reported delay of zero would make a frame's display window empty and the
/// catch-up arithmetic degenerate, so every delay is clamped to at least one
/// 10ms tick.
pub const MIN_FRAME_DELAY_MS: u32 = 10;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
/// Playback mode for the current assignment.
pub enum PlaybackState {
    /// Not playing; the frame index is pinned to zero on entry.
    #[default]
    Stopped,
    /// Not advancing; the current frame is retained.
    Paused,
    /// Advancing against wall-clock time.
    Playing,
}

#[derive(Clone, Debug, Default)]
/// Maps wall-clock time to a frame index using per-frame delays.
///
/// `anchor_ms` is the time at which the current frame's delay window began.
/// The scheduler tolerates arbitrarily irregular render ticks: whole animation
/// cycles are skipped with modulo arithmetic and the per-frame catch-up loop
/// is bounded by the frame count.
pub struct FramePlayback {
    state: PlaybackState,
    index: usize,
    anchor_ms: i64,
    seen_revision: u64,
}

impl FramePlayback {
    /// Fresh playback state: stopped at frame zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current playback mode.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Index of the frame currently selected.
    pub fn current_index(&self) -> usize {
        self.index
    }

    /// Begin advancing frames, anchoring the current window at `now_ms`.
    pub fn play(&mut self, now_ms: i64) {
        self.state = PlaybackState::Playing;
        self.anchor_ms = now_ms;
    }

    /// Stop advancing, retaining the current frame.
    pub fn pause(&mut self) {
        self.state = PlaybackState::Paused;
    }

    /// Stop advancing and rewind to frame zero.
    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.index = 0;
    }

    /// Reset to the initial stopped state, as on a new source assignment.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance or retreat one frame, wrapping in both directions.
    ///
    /// Only effective once the assignment is decoded; a no-op on an empty
    /// store. The anchor is left untouched.
    pub fn step(&mut self, forward: bool, snap: &Snapshot) {
        if snap.status != DecodeStatus::Decoded {
            return;
        }
        self.adopt_revision(snap, None);
        let count = snap.store.as_deref().map_or(0, FrameStore::frame_count);
        if count == 0 {
            return;
        }
        self.index = if forward {
            (self.index + 1) % count
        } else {
            (self.index + count - 1) % count
        };
    }

    /// Select the frame visible at `now_ms`.
    ///
    /// Returns `None` unless the snapshot holds a decoded, dynamic, non-empty
    /// store; the caller falls back to its placeholder still.
    pub fn current_frame<'a>(
        &mut self,
        snap: &'a Snapshot,
        now_ms: i64,
    ) -> Option<&'a DecodedFrame> {
        self.adopt_revision(snap, Some(now_ms));
        if snap.status != DecodeStatus::Decoded || snap.kind != AnimationKind::Dynamic {
            return None;
        }
        let store = snap.store.as_deref()?;
        if store.is_empty() {
            return None;
        }
        if self.state == PlaybackState::Playing {
            self.advance(store, now_ms);
        }
        store.get(self.index)
    }

    /// Re-anchor at frame zero the first time a new snapshot revision is seen.
    fn adopt_revision(&mut self, snap: &Snapshot, now_ms: Option<i64>) {
        if snap.revision == self.seen_revision {
            return;
        }
        self.seen_revision = snap.revision;
        self.index = 0;
        if let Some(now_ms) = now_ms {
            self.anchor_ms = now_ms;
        }
    }

    fn advance(&mut self, store: &FrameStore, now_ms: i64) {
        let count = store.frame_count();
        if count == 0 {
            return;
        }

        let total: i64 = (0..count).map(|i| i64::from(effective_delay_ms(store, i))).sum();
        let mut behind = now_ms.saturating_sub(self.anchor_ms);
        if behind <= 0 {
            return;
        }

        // Skip whole cycles so the per-frame loop below never runs more than
        // one cycle, no matter how long the host was away between ticks. The
        // reduction keeps `behind` in (0, total], preserving the strict
        // `anchor + delay < now` boundary rule.
        if behind > total {
            let cycles = (behind - 1) / total;
            self.anchor_ms += cycles * total;
            behind -= cycles * total;
        }

        for _ in 0..count {
            let delay = i64::from(effective_delay_ms(store, self.index));
            if behind <= delay {
                break;
            }
            self.anchor_ms += delay;
            behind -= delay;
            self.index = (self.index + 1) % count;
        }
    }
}

fn effective_delay_ms(store: &FrameStore, index: usize) -> u32 {
    store.delay_ms(index).max(MIN_FRAME_DELAY_MS)
}

#[cfg(test)]
#[path = "../tests/unit/playback.rs"]
mod tests;
