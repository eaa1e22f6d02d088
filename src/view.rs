use std::sync::Arc;

use crate::assets::decode::{FrameDecoder, RasterDecoder};
use crate::assets::source::{ImageSource, ResourceLoader};
use crate::assets::store::{Bitmap, FrameStore};
use crate::density::{self, ProcessConfig};
use crate::foundation::core::Viewport;
use crate::lifecycle::{AnimationKind, DecodeLifecycle, DecodeStatus};
use crate::playback::{FramePlayback, PlaybackState};
use crate::viewport::{Constraint, FitPolicy, Placement, measure, place};

/// Host UI collaborator driving redraw scheduling and layout.
///
/// `request_redraw` must eventually produce another [`AnimatedImage::draw`]
/// call; the view relies on it as its only timer while a decode is in flight
/// or an animation is playing.
pub trait Host: Send + Sync {
    /// Schedule another render tick.
    fn request_redraw(&self);
    /// Content size may have changed; remeasure the view.
    fn request_layout(&self);
}

/// Render-target collaborator the view blits into each tick.
pub trait DrawSurface {
    /// Draw `bitmap` under the given placement transform.
    fn draw_frame(&mut self, bitmap: &Bitmap, placement: &Placement);
}

/// Playback core of an animated image widget.
///
/// Owns the decode lifecycle, playback state, placeholder still, fit policy,
/// and density configuration; talks to the host through the [`Host`] and
/// [`DrawSurface`] traits. All methods are intended for the host's render/UI
/// context; only the decode worker runs elsewhere.
pub struct AnimatedImage {
    lifecycle: DecodeLifecycle,
    playback: FramePlayback,
    placeholder: Option<Bitmap>,
    policy: FitPolicy,
    density_override: Option<f64>,
    process: ProcessConfig,
    display_density: f64,
    host: Arc<dyn Host>,
}

impl AnimatedImage {
    /// Build a view around explicit decoder and resource-loader collaborators.
    ///
    /// `display_density` is the platform-reported density, used both as the
    /// scaling target and as the fallback when no override is set.
    pub fn new(
        host: Arc<dyn Host>,
        decoder: Arc<dyn FrameDecoder>,
        loader: Option<Arc<dyn ResourceLoader>>,
        process: ProcessConfig,
        display_density: f64,
    ) -> Self {
        let lifecycle = DecodeLifecycle::new(decoder, loader, Arc::clone(&host));
        Self {
            lifecycle,
            playback: FramePlayback::new(),
            placeholder: None,
            policy: FitPolicy::default(),
            density_override: None,
            process,
            display_density,
            host,
        }
    }

    /// Build a view using the built-in [`RasterDecoder`] and no resource loader.
    pub fn with_default_decoder(
        host: Arc<dyn Host>,
        process: ProcessConfig,
        display_density: f64,
    ) -> Self {
        Self::new(host, Arc::new(RasterDecoder), None, process, display_density)
    }

    /// Assign a new source, resetting decode and playback state.
    ///
    /// `placeholder` is shown until the decode publishes usable frames, and
    /// indefinitely for static or failed sources.
    pub fn set_source(&mut self, source: ImageSource, placeholder: Option<Bitmap>) {
        self.lifecycle.assign(source);
        self.playback.reset();
        self.placeholder = placeholder;
        self.host.request_layout();
    }

    /// Change the fit policy used for subsequent draws.
    pub fn set_fit_policy(&mut self, policy: FitPolicy) {
        self.policy = policy;
    }

    /// Fit policy currently in effect.
    pub fn fit_policy(&self) -> FitPolicy {
        self.policy
    }

    /// Set or clear the per-instance density override.
    pub fn set_density_override(&mut self, density: Option<f64>) {
        self.density_override = density.filter(|d| *d > 0.0);
    }

    /// Decode progress of the current assignment.
    pub fn status(&self) -> DecodeStatus {
        self.lifecycle.status()
    }

    /// Content classification of the current assignment.
    pub fn animation_kind(&self) -> AnimationKind {
        self.lifecycle.kind()
    }

    /// Current playback mode.
    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Begin playback, anchoring frame timing at `now_ms`.
    pub fn play(&mut self, now_ms: i64) {
        self.playback.play(now_ms);
        self.host.request_redraw();
    }

    /// Pause playback, retaining the current frame.
    pub fn pause(&mut self) {
        self.playback.pause();
        self.host.request_redraw();
    }

    /// Stop playback and rewind to frame zero.
    pub fn stop(&mut self) {
        self.playback.stop();
        self.host.request_redraw();
    }

    /// Advance one frame, wrapping past the end.
    pub fn next_frame(&mut self) {
        let snap = self.lifecycle.snapshot();
        self.playback.step(true, &snap);
        self.host.request_redraw();
    }

    /// Retreat one frame, wrapping past the start.
    pub fn prev_frame(&mut self) {
        let snap = self.lifecycle.snapshot();
        self.playback.step(false, &snap);
        self.host.request_redraw();
    }

    /// Drop the decoded store and reset to undecoded; the placeholder is kept.
    pub fn release(&mut self) {
        self.lifecycle.release();
        self.playback.reset();
    }

    /// Kick off the asynchronous decode without waiting for a playing tick.
    pub fn start_decode_if_needed(&self) {
        self.lifecycle.start_decode_if_needed();
    }

    /// Density-correction scale applied to content before fitting.
    pub fn scale(&self) -> f64 {
        let resolved = density::resolve_density(
            self.density_override,
            &self.process,
            self.display_density,
        );
        density::effective_scale(self.display_density, resolved)
    }

    /// Measured size under the host's constraints.
    ///
    /// Decoded content dimensions win; otherwise the placeholder's intrinsic
    /// size is used. `None` when there is nothing to measure yet, in which
    /// case the host keeps its own sizing.
    pub fn measure(&self, width: Constraint, height: Constraint) -> Option<(f64, f64)> {
        let snap = self.lifecycle.snapshot();
        let decoded_dims = match snap.status {
            DecodeStatus::Decoded => snap
                .store
                .as_deref()
                .map(FrameStore::dims)
                .filter(|dims| !dims.is_degenerate()),
            _ => None,
        };
        let dims = decoded_dims.or_else(|| self.placeholder.as_ref().map(Bitmap::dims))?;
        Some(measure(dims, width, height))
    }

    /// Render tick: select the visible still or frame, fit it, and draw.
    ///
    /// Requests another tick whenever tick-driven work remains (a decode in
    /// flight, an undecoded playing source, a playing animation).
    pub fn draw(&mut self, surface: &mut dyn DrawSurface, viewport: Viewport, now_ms: i64) {
        let snap = self.lifecycle.snapshot();
        let scale = self.scale();

        match snap.status {
            DecodeStatus::Undecoded => {
                self.draw_bitmap(surface, viewport, scale, self.placeholder.as_ref());
                if self.playback.state() == PlaybackState::Playing {
                    self.lifecycle.start_decode_if_needed();
                    self.host.request_redraw();
                }
            }
            DecodeStatus::Decoding => {
                self.draw_bitmap(surface, viewport, scale, self.placeholder.as_ref());
                self.host.request_redraw();
            }
            DecodeStatus::Decoded => match snap.kind {
                AnimationKind::Dynamic => {
                    match self.playback.current_frame(&snap, now_ms) {
                        Some(frame) => {
                            self.draw_bitmap(surface, viewport, scale, Some(&frame.bitmap));
                        }
                        None => {
                            self.draw_bitmap(surface, viewport, scale, self.placeholder.as_ref());
                        }
                    }
                    if self.playback.state() == PlaybackState::Playing {
                        self.host.request_redraw();
                    }
                }
                AnimationKind::Static | AnimationKind::Unknown => {
                    self.draw_bitmap(surface, viewport, scale, self.placeholder.as_ref());
                }
            },
        }
    }

    fn draw_bitmap(
        &self,
        surface: &mut dyn DrawSurface,
        viewport: Viewport,
        scale: f64,
        bitmap: Option<&Bitmap>,
    ) {
        let Some(bitmap) = bitmap else {
            return;
        };
        let placement = place(bitmap.dims(), viewport, scale, self.policy);
        surface.draw_frame(bitmap, &placement);
    }
}
