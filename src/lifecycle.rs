use std::sync::Arc;

use parking_lot::Mutex;

use crate::assets::decode::{DecodedAnimation, FrameDecoder};
use crate::assets::source::{ImageSource, ResourceLoader, open_bytes};
use crate::assets::store::FrameStore;
use crate::foundation::error::{FlipbookError, FlipbookResult};
use crate::view::Host;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Decode progress for the current source assignment.
///
/// Monotonic per assignment: `Undecoded -> Decoding -> Decoded`. Only a new
/// assignment or a release resets it.
pub enum DecodeStatus {
    /// No decode has been requested for this assignment.
    Undecoded,
    /// A decode worker is in flight.
    Decoding,
    /// The frame store has been published (possibly empty).
    Decoded,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Content classification, determined once immediately after decode.
pub enum AnimationKind {
    /// Not yet known; the decode has not completed.
    Unknown,
    /// The decoder reported no frame geometry; only a still can be shown.
    Static,
    /// A multi-frame sequence with nonzero dimensions.
    Dynamic,
}

#[derive(Clone, Debug)]
/// Immutable published view of the decode state, read once per render tick.
///
/// The snapshot is replaced wholesale under a mutex, so a tick never observes
/// a store mid-construction.
pub struct Snapshot {
    /// Source-assignment generation this snapshot belongs to.
    pub generation: u64,
    /// Bumped on every snapshot replacement; playback re-anchors when it
    /// observes a new revision.
    pub revision: u64,
    /// Decode progress.
    pub status: DecodeStatus,
    /// Content classification.
    pub kind: AnimationKind,
    /// Published frame store, present once `status` is [`DecodeStatus::Decoded`].
    pub store: Option<Arc<FrameStore>>,
}

impl Snapshot {
    fn reset(generation: u64, revision: u64) -> Self {
        Self {
            generation,
            revision,
            status: DecodeStatus::Undecoded,
            kind: AnimationKind::Unknown,
            store: None,
        }
    }
}

/// Orchestrates one asynchronous decode per source assignment.
///
/// Every assignment and release bumps a generation counter; the decode worker
/// re-checks the published generation before publishing, so a superseded
/// worker's result is discarded rather than overwriting newer state. At most
/// one published frame store is ever visible per generation.
pub struct DecodeLifecycle {
    decoder: Arc<dyn FrameDecoder>,
    loader: Option<Arc<dyn ResourceLoader>>,
    host: Arc<dyn Host>,
    shared: Arc<Mutex<Snapshot>>,
    source: Option<ImageSource>,
    generation: u64,
}

impl DecodeLifecycle {
    /// Build a lifecycle around the decoder and resource-loader collaborators.
    pub fn new(
        decoder: Arc<dyn FrameDecoder>,
        loader: Option<Arc<dyn ResourceLoader>>,
        host: Arc<dyn Host>,
    ) -> Self {
        Self {
            decoder,
            loader,
            host,
            shared: Arc::new(Mutex::new(Snapshot::reset(0, 0))),
            source: None,
            generation: 0,
        }
    }

    /// Assign a new byte source, invalidating any in-flight decode.
    pub fn assign(&mut self, source: ImageSource) {
        self.source = Some(source);
        self.bump_and_reset();
    }

    /// Drop the published store and reset to undecoded.
    ///
    /// Safe to call while a decode worker is in flight; the worker detects the
    /// generation change and discards its result.
    pub fn release(&mut self) {
        self.source = None;
        self.bump_and_reset();
    }

    fn bump_and_reset(&mut self) {
        self.generation += 1;
        let mut shared = self.shared.lock();
        let revision = shared.revision + 1;
        *shared = Snapshot::reset(self.generation, revision);
    }

    /// Clone the currently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.lock().clone()
    }

    /// Decode progress of the current assignment.
    pub fn status(&self) -> DecodeStatus {
        self.shared.lock().status
    }

    /// Content classification of the current assignment.
    pub fn kind(&self) -> AnimationKind {
        self.shared.lock().kind
    }

    /// Start the asynchronous decode for the current assignment.
    ///
    /// Idempotent: a no-op unless the status is [`DecodeStatus::Undecoded`].
    pub fn start_decode_if_needed(&self) {
        let generation = {
            let mut shared = self.shared.lock();
            if shared.status != DecodeStatus::Undecoded {
                return;
            }
            shared.status = DecodeStatus::Decoding;
            shared.revision += 1;
            shared.generation
        };

        let source = self.source.clone();
        let decoder = Arc::clone(&self.decoder);
        let loader = self.loader.clone();
        let host = Arc::clone(&self.host);
        let shared = Arc::clone(&self.shared);

        std::thread::spawn(move || {
            let outcome = run_decode(source.as_ref(), loader.as_deref(), decoder.as_ref());
            let (store, kind) = match outcome {
                Ok(anim) => classify(anim),
                Err(err) => {
                    tracing::warn!(%err, "decode failed; publishing empty store");
                    (FrameStore::empty(), AnimationKind::Static)
                }
            };

            let mut shared = shared.lock();
            if shared.generation != generation {
                tracing::debug!(
                    stale = generation,
                    current = shared.generation,
                    "discarding superseded decode result"
                );
                return;
            }
            shared.status = DecodeStatus::Decoded;
            shared.kind = kind;
            shared.store = Some(Arc::new(store));
            shared.revision += 1;
            drop(shared);

            host.request_redraw();
        });
    }
}

#[tracing::instrument(skip(loader, decoder))]
fn run_decode(
    source: Option<&ImageSource>,
    loader: Option<&dyn ResourceLoader>,
    decoder: &dyn FrameDecoder,
) -> FlipbookResult<DecodedAnimation> {
    let source =
        source.ok_or_else(|| FlipbookError::source_unavailable("no source assigned"))?;
    let bytes = open_bytes(source, loader)?;
    decoder.decode(&bytes)
}

fn classify(anim: DecodedAnimation) -> (FrameStore, AnimationKind) {
    if anim.dims.is_degenerate() {
        (FrameStore::empty(), AnimationKind::Static)
    } else {
        (FrameStore::new(anim.frames, anim.dims), AnimationKind::Dynamic)
    }
}

#[cfg(test)]
#[path = "../tests/unit/lifecycle.rs"]
mod tests;
