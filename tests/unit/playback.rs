use std::sync::Arc;

use super::*;
use crate::assets::store::Bitmap;
use crate::foundation::core::PixelDims;

fn bitmap_1x1() -> Bitmap {
    Bitmap {
        width: 1,
        height: 1,
        rgba8_premul: Arc::new(vec![0, 0, 0, 0]),
    }
}

fn decoded_snapshot(delays: &[u32], revision: u64) -> Snapshot {
    let frames = delays
        .iter()
        .map(|&delay_ms| DecodedFrame {
            bitmap: bitmap_1x1(),
            delay_ms,
        })
        .collect();
    Snapshot {
        generation: 1,
        revision,
        status: DecodeStatus::Decoded,
        kind: AnimationKind::Dynamic,
        store: Some(Arc::new(FrameStore::new(frames, PixelDims::new(4, 4)))),
    }
}

#[test]
fn step_wraps_in_both_directions() {
    let snap = decoded_snapshot(&[10, 10, 10, 10], 1);
    let mut pb = FramePlayback::new();

    for _ in 0..4 {
        pb.step(true, &snap);
    }
    assert_eq!(pb.current_index(), 0);

    pb.step(false, &snap);
    assert_eq!(pb.current_index(), 3);
}

#[test]
fn step_ignores_undecoded_and_empty_stores() {
    let mut pb = FramePlayback::new();

    let undecoded = Snapshot {
        generation: 1,
        revision: 1,
        status: DecodeStatus::Decoding,
        kind: AnimationKind::Unknown,
        store: None,
    };
    pb.step(true, &undecoded);
    assert_eq!(pb.current_index(), 0);

    let empty = Snapshot {
        generation: 1,
        revision: 2,
        status: DecodeStatus::Decoded,
        kind: AnimationKind::Dynamic,
        store: Some(Arc::new(FrameStore::empty())),
    };
    pb.step(true, &empty);
    assert_eq!(pb.current_index(), 0);
}

#[test]
fn time_driven_advance_follows_cumulative_delays() {
    let snap = decoded_snapshot(&[100, 200, 50], 1);
    let mut pb = FramePlayback::new();
    let t0 = 1_000;

    pb.current_frame(&snap, t0);
    pb.play(t0);

    pb.current_frame(&snap, t0 + 99);
    assert_eq!(pb.current_index(), 0);

    pb.current_frame(&snap, t0 + 150);
    assert_eq!(pb.current_index(), 1);

    // 5000 = 14 * 350 + 100: lands exactly on the frame-0/frame-1 boundary,
    // which under the strict `anchor + delay < now` rule belongs to frame 0.
    pb.current_frame(&snap, t0 + 5_000);
    assert_eq!(pb.current_index(), 0);

    pb.current_frame(&snap, t0 + 5_001);
    assert_eq!(pb.current_index(), 1);
}

#[test]
fn long_gap_fast_forwards_in_one_tick() {
    let snap = decoded_snapshot(&[100, 200, 50], 1);
    let mut pb = FramePlayback::new();
    pb.current_frame(&snap, 0);
    pb.play(0);

    // Equivalent of stepping through ~2857 cycles one tick at a time.
    // 1_000_000 mod 350 = 50, inside frame 0's window.
    pb.current_frame(&snap, 1_000_000);
    assert_eq!(pb.current_index(), 0);

    // 1_000_150 mod 350 = 200, strictly past frame 0's 100ms window.
    pb.current_frame(&snap, 1_000_150);
    assert_eq!(pb.current_index(), 1);
}

#[test]
fn zero_delays_are_floored() {
    let snap = decoded_snapshot(&[0, 0], 1);
    let mut pb = FramePlayback::new();
    pb.current_frame(&snap, 0);
    pb.play(0);

    pb.current_frame(&snap, 5);
    assert_eq!(pb.current_index(), 0);

    pb.current_frame(&snap, i64::from(MIN_FRAME_DELAY_MS) + 5);
    assert_eq!(pb.current_index(), 1);
}

#[test]
fn pause_freezes_the_current_frame() {
    let snap = decoded_snapshot(&[100, 100], 1);
    let mut pb = FramePlayback::new();
    pb.current_frame(&snap, 0);
    pb.play(0);

    pb.current_frame(&snap, 150);
    assert_eq!(pb.current_index(), 1);

    pb.pause();
    pb.current_frame(&snap, 100_000);
    assert_eq!(pb.current_index(), 1);
    assert_eq!(pb.state(), PlaybackState::Paused);
}

#[test]
fn stop_rewinds_to_frame_zero() {
    let snap = decoded_snapshot(&[100, 100], 1);
    let mut pb = FramePlayback::new();
    pb.current_frame(&snap, 0);
    pb.play(0);
    pb.current_frame(&snap, 150);
    assert_eq!(pb.current_index(), 1);

    pb.stop();
    assert_eq!(pb.current_index(), 0);
    assert_eq!(pb.state(), PlaybackState::Stopped);

    // Stopped ticks return the pinned frame without advancing.
    pb.current_frame(&snap, 100_000);
    assert_eq!(pb.current_index(), 0);
}

#[test]
fn non_dynamic_snapshots_yield_no_frame() {
    let mut pb = FramePlayback::new();

    let decoding = Snapshot {
        generation: 1,
        revision: 1,
        status: DecodeStatus::Decoding,
        kind: AnimationKind::Unknown,
        store: None,
    };
    assert!(pb.current_frame(&decoding, 0).is_none());

    let static_still = Snapshot {
        generation: 1,
        revision: 2,
        status: DecodeStatus::Decoded,
        kind: AnimationKind::Static,
        store: Some(Arc::new(FrameStore::empty())),
    };
    assert!(pb.current_frame(&static_still, 0).is_none());

    let empty_dynamic = Snapshot {
        generation: 1,
        revision: 3,
        status: DecodeStatus::Decoded,
        kind: AnimationKind::Dynamic,
        store: Some(Arc::new(FrameStore::empty())),
    };
    assert!(pb.current_frame(&empty_dynamic, 0).is_none());
}

#[test]
fn new_revision_re_anchors_at_frame_zero() {
    let snap = decoded_snapshot(&[100, 100], 1);
    let mut pb = FramePlayback::new();
    pb.current_frame(&snap, 0);
    pb.play(0);
    pb.current_frame(&snap, 150);
    assert_eq!(pb.current_index(), 1);

    // A republished store (new generation's decode landed) restarts playback
    // from its first frame, anchored at the tick that observed it.
    let replaced = decoded_snapshot(&[100, 100], 2);
    pb.current_frame(&replaced, 1_000);
    assert_eq!(pb.current_index(), 0);
    pb.current_frame(&replaced, 1_050);
    assert_eq!(pb.current_index(), 0);
    pb.current_frame(&replaced, 1_150);
    assert_eq!(pb.current_index(), 1);
}
