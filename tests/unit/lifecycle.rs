use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use super::*;
use crate::assets::store::{Bitmap, DecodedFrame};
use crate::foundation::core::PixelDims;

struct CountingHost {
    redraws: AtomicUsize,
}

impl CountingHost {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            redraws: AtomicUsize::new(0),
        })
    }
}

impl Host for CountingHost {
    fn request_redraw(&self) {
        self.redraws.fetch_add(1, Ordering::SeqCst);
    }

    fn request_layout(&self) {}
}

fn frame_of_size(side: u32) -> DecodedFrame {
    DecodedFrame {
        bitmap: Bitmap {
            width: side,
            height: side,
            rgba8_premul: Arc::new(vec![0; (side * side * 4) as usize]),
        },
        delay_ms: 100,
    }
}

/// Decodes instantly; the first source byte dictates the square frame size.
struct InstantDecoder {
    calls: AtomicUsize,
}

impl InstantDecoder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
        })
    }
}

impl FrameDecoder for InstantDecoder {
    fn decode(&self, bytes: &[u8]) -> FlipbookResult<DecodedAnimation> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let side = u32::from(bytes[0]);
        Ok(DecodedAnimation {
            frames: vec![frame_of_size(side)],
            dims: PixelDims::new(side, side),
        })
    }
}

/// Blocks every decode until the test grants a permit.
struct GateDecoder {
    permits: Mutex<usize>,
    released: Condvar,
    completed: AtomicUsize,
}

impl GateDecoder {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            permits: Mutex::new(0),
            released: Condvar::new(),
            completed: AtomicUsize::new(0),
        })
    }

    fn grant(&self) {
        *self.permits.lock() += 1;
        self.released.notify_all();
    }
}

impl FrameDecoder for GateDecoder {
    fn decode(&self, bytes: &[u8]) -> FlipbookResult<DecodedAnimation> {
        let mut permits = self.permits.lock();
        while *permits == 0 {
            self.released.wait(&mut permits);
        }
        *permits -= 1;
        drop(permits);

        self.completed.fetch_add(1, Ordering::SeqCst);
        let side = u32::from(bytes[0]);
        Ok(DecodedAnimation {
            frames: vec![frame_of_size(side)],
            dims: PixelDims::new(side, side),
        })
    }
}

struct FailingDecoder;

impl FrameDecoder for FailingDecoder {
    fn decode(&self, _bytes: &[u8]) -> FlipbookResult<DecodedAnimation> {
        Err(FlipbookError::decode("synthetic failure"))
    }
}

fn wait_until(mut ready: impl FnMut() -> bool) {
    for _ in 0..400 {
        if ready() {
            return;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    panic!("condition not reached within 2s");
}

fn settle() {
    std::thread::sleep(Duration::from_millis(50));
}

#[test]
fn status_is_monotonic_through_publish() {
    let host = CountingHost::new();
    let decoder = InstantDecoder::new();
    let mut lc = DecodeLifecycle::new(decoder.clone(), None, host.clone());

    assert_eq!(lc.status(), DecodeStatus::Undecoded);
    assert_eq!(lc.kind(), AnimationKind::Unknown);

    lc.assign(ImageSource::from_bytes(vec![3u8]));
    assert_eq!(lc.status(), DecodeStatus::Undecoded);

    lc.start_decode_if_needed();
    // Each observation is Decoding or Decoded, never back to Undecoded.
    wait_until(|| lc.status() == DecodeStatus::Decoded);
    settle();

    let snap = lc.snapshot();
    assert_eq!(snap.status, DecodeStatus::Decoded);
    assert_eq!(snap.kind, AnimationKind::Dynamic);
    assert_eq!(snap.store.as_deref().map(FrameStore::dims), Some(PixelDims::new(3, 3)));
    assert!(host.redraws.load(Ordering::SeqCst) >= 1);
}

#[test]
fn start_decode_is_idempotent() {
    let host = CountingHost::new();
    let decoder = InstantDecoder::new();
    let mut lc = DecodeLifecycle::new(decoder.clone(), None, host);

    lc.assign(ImageSource::from_bytes(vec![2u8]));
    lc.start_decode_if_needed();
    lc.start_decode_if_needed();
    lc.start_decode_if_needed();

    wait_until(|| lc.status() == DecodeStatus::Decoded);
    settle();
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn stale_decode_result_is_discarded() {
    let host = CountingHost::new();
    let decoder = GateDecoder::new();
    let mut lc = DecodeLifecycle::new(decoder.clone(), None, host);

    // Source A starts decoding, then B supersedes it mid-flight.
    lc.assign(ImageSource::from_bytes(vec![2u8]));
    lc.start_decode_if_needed();
    lc.assign(ImageSource::from_bytes(vec![4u8]));
    lc.start_decode_if_needed();

    decoder.grant();
    decoder.grant();
    wait_until(|| decoder.completed.load(Ordering::SeqCst) == 2);
    wait_until(|| lc.status() == DecodeStatus::Decoded);
    settle();

    // Only B's result is ever visible, regardless of completion order.
    let snap = lc.snapshot();
    assert_eq!(snap.store.as_deref().map(FrameStore::dims), Some(PixelDims::new(4, 4)));
}

#[test]
fn release_discards_inflight_results() {
    let host = CountingHost::new();
    let decoder = GateDecoder::new();
    let mut lc = DecodeLifecycle::new(decoder.clone(), None, host);

    lc.assign(ImageSource::from_bytes(vec![2u8]));
    lc.start_decode_if_needed();
    lc.release();

    decoder.grant();
    wait_until(|| decoder.completed.load(Ordering::SeqCst) == 1);
    settle();

    let snap = lc.snapshot();
    assert_eq!(snap.status, DecodeStatus::Undecoded);
    assert_eq!(snap.kind, AnimationKind::Unknown);
    assert!(snap.store.is_none());
}

#[test]
fn decode_failure_publishes_empty_static_store() {
    let host = CountingHost::new();
    let mut lc = DecodeLifecycle::new(Arc::new(FailingDecoder), None, host);

    lc.assign(ImageSource::from_bytes(vec![1u8]));
    lc.start_decode_if_needed();
    wait_until(|| lc.status() == DecodeStatus::Decoded);

    let snap = lc.snapshot();
    assert_eq!(snap.kind, AnimationKind::Static);
    assert!(snap.store.as_deref().is_some_and(FrameStore::is_empty));
}

#[test]
fn missing_source_degrades_to_empty_static_store() {
    let host = CountingHost::new();
    let decoder = InstantDecoder::new();
    let lc = DecodeLifecycle::new(decoder.clone(), None, host);

    lc.start_decode_if_needed();
    wait_until(|| lc.status() == DecodeStatus::Decoded);

    let snap = lc.snapshot();
    assert_eq!(snap.kind, AnimationKind::Static);
    assert!(snap.store.as_deref().is_some_and(FrameStore::is_empty));
    // The decoder never ran; the source could not even be opened.
    assert_eq!(decoder.calls.load(Ordering::SeqCst), 0);
}
