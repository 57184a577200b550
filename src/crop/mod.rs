//! Crop domain: public API.
//!
//! Owns the source bitmap and the stage's measurement of it, and turns
//! display rectangles into encoded crops. Callers only see
//! [`CropSource`] and [`CropEngine`].

mod mapper;
mod region;

pub use mapper::{to_source_space, CoordinateMapper, ScaleFactors, StageLayout};
pub use region::{buffer_size, crop_window, encode, sample_window, CropArtifact, MAX_BUFFER_BYTES};

use image::{DynamicImage, RgbaImage};

use crate::config::ArtifactFormat;
use crate::geometry::{Extent, Rect};

/// Anything that can turn a display rectangle into a crop artifact.
///
/// The selection store depends on this seam rather than on
/// [`CropEngine`] directly.
pub trait CropSource {
    fn extract_crop(&self, rect: &Rect) -> Result<CropArtifact, CropError>;

    /// Records the size the stage actually rendered the image at.
    fn set_displayed_extent(&mut self, extent: Extent);
}

/// Storage for the decoded source image and its on-stage size.
///
/// Both are filled in by the host as they become known. Until then every
/// extraction reports unavailable.
pub struct CropEngine {
    source: Option<RgbaImage>,
    displayed: Option<Extent>,
    format: ArtifactFormat,
}

impl CropEngine {
    pub fn new(format: ArtifactFormat) -> Self {
        Self {
            source: None,
            displayed: None,
            format,
        }
    }

    /// Replaces the source image. Any measurement taken of the previous
    /// image no longer applies and is dropped.
    pub fn load_image(&mut self, image: DynamicImage) {
        let rgba = image.to_rgba8();
        log::info!("[CROP] Source image loaded ({}x{})", rgba.width(), rgba.height());
        self.source = Some(rgba);
        self.displayed = None;
    }

    pub fn unload_image(&mut self) {
        if self.source.take().is_some() {
            log::info!("[CROP] Source image unloaded");
        }
    }

    pub fn displayed_extent(&self) -> Option<Extent> {
        self.displayed
    }

    pub fn source_extent(&self) -> Option<Extent> {
        self.source
            .as_ref()
            .map(|img| Extent::new(f64::from(img.width()), f64::from(img.height())))
    }

    pub fn mapper(&self) -> Result<CoordinateMapper, CropError> {
        CoordinateMapper::new(self.displayed, self.source_extent())
    }

    /// Source-pixel window that a display rectangle would be cropped from.
    pub fn source_window(&self, rect: &Rect) -> Result<Rect, CropError> {
        Ok(self.mapper()?.to_source_space(rect))
    }
}

impl CropSource for CropEngine {
    fn extract_crop(&self, rect: &Rect) -> Result<CropArtifact, CropError> {
        let start = std::time::Instant::now();

        let window = self.source_window(rect)?;
        let source = self.source.as_ref().ok_or(CropError::ImageNotLoaded)?;
        let artifact = crop_window(source, &window, self.format)?;

        log::info!(
            "[CROP] Cropped region ({}x{} at {},{}) in {}ms, {} bytes",
            artifact.width(),
            artifact.height(),
            window.x,
            window.y,
            start.elapsed().as_millis(),
            artifact.bytes().len()
        );

        Ok(artifact)
    }

    fn set_displayed_extent(&mut self, extent: Extent) {
        log::debug!("[CROP] Displayed extent {}x{}", extent.width, extent.height);
        self.displayed = Some(extent);
    }
}

/// Reasons an extraction could not produce an artifact.
///
/// None of these are fatal. The caller leaves its state as it was and
/// tries again on the next relevant event.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    #[error("Source image is not loaded yet")]
    ImageNotLoaded,

    #[error("Displayed image size has not been measured yet")]
    DisplayNotMeasured,

    #[error("Crop window has zero width or height")]
    ZeroDimension,

    #[error("Crop window is not finite or too large")]
    InvalidWindow,

    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),
}
