//! Flipbook is the playback core of an animated raster image widget.
//!
//! It turns a byte source (a GIF file, a resource id, in-memory bytes) into a
//! frame shown inside an arbitrary rectangular viewport, decoding frames
//! asynchronously and advancing playback against wall-clock time.
//!
//! # Pipeline overview
//!
//! 1. **Assign**: `ImageSource -> DecodeLifecycle` (resets state, bumps the generation)
//! 2. **Decode**: a worker thread runs the [`FrameDecoder`] and publishes an
//!    immutable [`FrameStore`] snapshot, unless it has been superseded
//! 3. **Schedule**: `FramePlayback` maps `now` to a frame index using per-frame delays
//! 4. **Fit**: [`place`] computes offset and scale for the configured [`FitPolicy`]
//! 5. **Draw**: the host's [`DrawSurface`] is asked to blit `(bitmap, placement)`
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Stale results never publish**: every assignment increments a generation
//!   counter; a decode worker that finds itself superseded discards its work.
//! - **Fail-safe degradation**: decode failures are logged and collapse to
//!   "show the placeholder", never to a host-visible panic.
//! - **Host-agnostic**: measurement, redraw scheduling, and blitting happen
//!   behind the [`Host`] and [`DrawSurface`] traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod density;
mod foundation;
mod lifecycle;
mod playback;
mod view;
mod viewport;

pub use assets::decode::{DecodedAnimation, FrameDecoder, RasterDecoder, decode_still};
pub use assets::source::{ImageSource, ResourceId, ResourceLoader, open_bytes};
pub use assets::store::{Bitmap, DecodedFrame, FrameStore};
pub use density::{ProcessConfig, effective_scale, resolve_density};
pub use foundation::core::{PixelDims, Vec2, Viewport};
pub use foundation::error::{FlipbookError, FlipbookResult};
pub use lifecycle::{AnimationKind, DecodeLifecycle, DecodeStatus, Snapshot};
pub use playback::{FramePlayback, MIN_FRAME_DELAY_MS, PlaybackState};
pub use view::{AnimatedImage, DrawSurface, Host};
pub use viewport::{Constraint, FitPolicy, Placement, measure, place};
