use std::sync::Arc;

use crate::foundation::core::PixelDims;

#[derive(Clone, Debug)]
/// Decoded raster frame in premultiplied RGBA8 form.
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Intrinsic dimensions of this bitmap.
    pub fn dims(&self) -> PixelDims {
        PixelDims::new(self.width, self.height)
    }
}

#[derive(Clone, Debug)]
/// One decoded frame of an animated source, paired with its display delay.
pub struct DecodedFrame {
    /// Frame pixels.
    pub bitmap: Bitmap,
    /// Decoder-reported display delay in milliseconds. May be zero; playback
    /// floors it at [`crate::MIN_FRAME_DELAY_MS`].
    pub delay_ms: u32,
}

#[derive(Clone, Debug, Default)]
/// Immutable sequence of decoded frames plus per-frame delay metadata.
///
/// A store is produced once per decode and only ever replaced wholesale,
/// never mutated in place. The render tick reads it through an
/// `Arc<FrameStore>` published by the decode lifecycle.
pub struct FrameStore {
    frames: Vec<DecodedFrame>,
    dims: PixelDims,
}

impl FrameStore {
    /// Build a store from decoded frames and the reported canvas dimensions.
    pub fn new(frames: Vec<DecodedFrame>, dims: PixelDims) -> Self {
        Self { frames, dims }
    }

    /// The empty store published when a decode yields no frames.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of frames in the sequence.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// True when the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Canvas dimensions reported by the decoder.
    pub fn dims(&self) -> PixelDims {
        self.dims
    }

    /// Frame at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&DecodedFrame> {
        self.frames.get(index)
    }

    /// Decoder-reported delay for `index`, zero when out of range.
    pub fn delay_ms(&self, index: usize) -> u32 {
        self.frames.get(index).map_or(0, |f| f.delay_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
