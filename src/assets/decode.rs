use std::io::Cursor;
use std::sync::Arc;

use anyhow::Context;
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, ImageDecoder, ImageFormat};

use crate::assets::store::{Bitmap, DecodedFrame};
use crate::foundation::core::PixelDims;
use crate::foundation::error::{FlipbookError, FlipbookResult};

#[derive(Clone, Debug, Default)]
/// Raw decoder output: the frame sequence plus the reported canvas size.
///
/// Zero reported width or height signals single-still content; the lifecycle
/// classifies such results as static and keeps showing the placeholder.
pub struct DecodedAnimation {
    /// Decoded frames in display order.
    pub frames: Vec<DecodedFrame>,
    /// Intrinsic canvas dimensions reported by the decoder.
    pub dims: PixelDims,
}

/// Byte-level image decoder collaborator.
///
/// Implementations run on the decode worker thread and must be shareable
/// across assignments.
pub trait FrameDecoder: Send + Sync {
    /// Decode `bytes` into a frame sequence.
    fn decode(&self, bytes: &[u8]) -> FlipbookResult<DecodedAnimation>;
}

#[derive(Clone, Copy, Debug, Default)]
/// Default [`FrameDecoder`] backed by the `image` crate.
///
/// GIF bytes decode to the full frame sequence; any other format is reported
/// as zero-dimension static content, leaving the placeholder on screen.
pub struct RasterDecoder;

impl FrameDecoder for RasterDecoder {
    fn decode(&self, bytes: &[u8]) -> FlipbookResult<DecodedAnimation> {
        if !matches!(image::guess_format(bytes), Ok(ImageFormat::Gif)) {
            return Ok(DecodedAnimation::default());
        }

        let decoder = GifDecoder::new(Cursor::new(bytes))
            .map_err(|err| FlipbookError::decode(format!("open gif stream: {err}")))?;
        let (width, height) = decoder.dimensions();

        let mut frames = Vec::new();
        for frame in decoder.into_frames() {
            let frame =
                frame.map_err(|err| FlipbookError::decode(format!("decode gif frame: {err}")))?;
            let (numer, denom) = frame.delay().numer_denom_ms();
            let delay_ms = if denom > 0 { numer / denom } else { 0 };

            let buffer = frame.into_buffer();
            let (fw, fh) = buffer.dimensions();
            let mut rgba8_premul = buffer.into_raw();
            premultiply_rgba8_in_place(&mut rgba8_premul);

            frames.push(DecodedFrame {
                bitmap: Bitmap {
                    width: fw,
                    height: fh,
                    rgba8_premul: Arc::new(rgba8_premul),
                },
                delay_ms,
            });
        }

        Ok(DecodedAnimation {
            frames,
            dims: PixelDims::new(width, height),
        })
    }
}

/// Decode a single still image to premultiplied RGBA8.
///
/// Useful for building the placeholder shown before an animated decode
/// completes, from the same bytes or a cheaper preview.
pub fn decode_still(bytes: &[u8]) -> FlipbookResult<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode still image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Bitmap {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
