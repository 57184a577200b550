//! Display space to source space.
//!
//! The image on the stage is a scaled copy of the source bitmap. Every
//! crop is computed against the source, so display rectangles have to be
//! scaled by `source / displayed` on each axis. The axes are scaled
//! independently; nothing here assumes the aspect ratio was preserved.

use super::CropError;
use crate::geometry::{Extent, Rect};

/// Per-axis multipliers from display units to source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

/// Source and displayed sizes of the same image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    displayed: Extent,
    source: Extent,
}

impl CoordinateMapper {
    /// Fails while the image is not loaded or the stage has not measured
    /// the rendered image yet.
    pub fn new(displayed: Option<Extent>, source: Option<Extent>) -> Result<Self, CropError> {
        let source = source
            .filter(Extent::is_measured)
            .ok_or(CropError::ImageNotLoaded)?;
        let displayed = displayed
            .filter(Extent::is_measured)
            .ok_or(CropError::DisplayNotMeasured)?;
        Ok(Self { displayed, source })
    }

    pub fn scale(&self) -> ScaleFactors {
        ScaleFactors {
            x: self.source.width / self.displayed.width,
            y: self.source.height / self.displayed.height,
        }
    }

    /// Maps a display rectangle into source pixels. Signs of the extents
    /// are kept; normalizing is the extractor's job.
    pub fn to_source_space(&self, rect: &Rect) -> Rect {
        // Multiply before dividing so that integral sizes map exactly:
        // the full stage always lands on the full bitmap.
        let sx = |v: f64| v * self.source.width / self.displayed.width;
        let sy = |v: f64| v * self.source.height / self.displayed.height;
        Rect {
            x: sx(rect.x),
            y: sy(rect.y),
            width: sx(rect.width),
            height: sy(rect.height),
        }
    }
}

/// One-shot form of [`CoordinateMapper::to_source_space`].
pub fn to_source_space(
    rect: &Rect,
    displayed: Option<Extent>,
    source: Option<Extent>,
) -> Result<Rect, CropError> {
    Ok(CoordinateMapper::new(displayed, source)?.to_source_space(rect))
}

/// How the source image is fitted onto the stage.
///
/// The image is stretched to the stage width and keeps its aspect ratio.
/// Before an image is available the stage falls back to a fixed height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageLayout {
    pub stage: Extent,
    pub image: Option<Extent>,
}

impl StageLayout {
    pub fn fit(source: Option<Extent>, stage_width: f64, fallback_height: f64) -> Self {
        match source.filter(Extent::is_measured) {
            Some(src) => {
                let fitted = Extent::new(stage_width, src.height / src.width * stage_width);
                Self {
                    stage: fitted,
                    image: Some(fitted),
                }
            }
            None => Self {
                stage: Extent::new(stage_width, fallback_height),
                image: None,
            },
        }
    }
}
