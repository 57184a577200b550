//! Pure region extraction, the functional core of cropping.
//!
//! Takes a source bitmap and a window in source pixels, returns an
//! encoded image. No engine state, no logging.

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;

use super::CropError;
use crate::config::ArtifactFormat;
use crate::geometry::Rect;

/// Encoded snapshot of a region, sampled at source resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropArtifact {
    width: u32,
    height: u32,
    format: ArtifactFormat,
    bytes: Vec<u8>,
}

impl CropArtifact {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format
    }

    /// Encoded image bytes (PNG or JPEG).
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Self-contained `data:` URI, ready for an `<img src>` or similar.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            STANDARD.encode(&self.bytes)
        )
    }
}

/// Largest sampling buffer, in bytes (1 GiB of RGBA).
pub const MAX_BUFFER_BYTES: u64 = 1 << 30;

/// Size of the buffer a source window is sampled into.
///
/// The window's extents may be negative (a drag up or to the left), so
/// the magnitude is used. Fractional sizes truncate like a canvas does.
pub fn buffer_size(window: &Rect) -> Result<(u32, u32), CropError> {
    let w = window.width.abs();
    let h = window.height.abs();
    if !w.is_finite() || !h.is_finite() || !window.x.is_finite() || !window.y.is_finite() {
        return Err(CropError::InvalidWindow);
    }
    if w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
        return Err(CropError::InvalidWindow);
    }
    let (w, h) = (w.trunc() as u32, h.trunc() as u32);
    if w == 0 || h == 0 {
        return Err(CropError::ZeroDimension);
    }
    let bytes = u64::from(w)
        .checked_mul(u64::from(h))
        .and_then(|px| px.checked_mul(4));
    match bytes {
        Some(bytes) if bytes <= MAX_BUFFER_BYTES => Ok((w, h)),
        _ => Err(CropError::InvalidWindow),
    }
}

/// Samples `window` of `image` into a fresh buffer covering the whole
/// window.
///
/// Nearest-neighbour at pixel centres. Integral windows therefore copy
/// pixels one to one. Parts of the window that fall outside the bitmap
/// come out fully transparent.
pub fn sample_window(image: &RgbaImage, window: &Rect) -> Result<RgbaImage, CropError> {
    let (bw, bh) = buffer_size(window)?;
    let win = window.normalized();
    let step_x = win.width / f64::from(bw);
    let step_y = win.height / f64::from(bh);
    let (iw, ih) = (i64::from(image.width()), i64::from(image.height()));

    Ok(RgbaImage::from_fn(bw, bh, |dx, dy| {
        let sx = (win.x + (f64::from(dx) + 0.5) * step_x).floor() as i64;
        let sy = (win.y + (f64::from(dy) + 0.5) * step_y).floor() as i64;
        if sx < 0 || sy < 0 || sx >= iw || sy >= ih {
            Rgba([0, 0, 0, 0])
        } else {
            *image.get_pixel(sx as u32, sy as u32)
        }
    }))
}

/// Encodes a sampled buffer as an artifact.
pub fn encode(buffer: RgbaImage, format: ArtifactFormat) -> Result<CropArtifact, CropError> {
    let (width, height) = buffer.dimensions();
    let image = match format {
        ArtifactFormat::Png => DynamicImage::ImageRgba8(buffer),
        // JPEG has no alpha channel.
        ArtifactFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(buffer).to_rgb8()),
    };

    let mut bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), format.image_format())
        .map_err(|e| CropError::EncodingFailed(e.to_string()))?;

    Ok(CropArtifact {
        width,
        height,
        format,
        bytes,
    })
}

/// Samples and encodes in one step.
pub fn crop_window(
    image: &RgbaImage,
    window: &Rect,
    format: ArtifactFormat,
) -> Result<CropArtifact, CropError> {
    encode(sample_window(image, window)?, format)
}
