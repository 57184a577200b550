//! Geometry reported by the surface when a drag or resize finishes.
//!
//! A resize handle usually scales the shape rather than changing its
//! size, so the surface reports the base extents together with the scale
//! it ended up at. Committing folds the scale into the extents. The
//! surface gets the folded geometry back and resets its shape to it, so
//! the next resize starts from scale 1 instead of compounding.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

fn unit_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default = "unit_scale")]
    pub scale_x: f64,
    #[serde(default = "unit_scale")]
    pub scale_y: f64,
}

impl ShapeGeometry {
    /// Unscaled shape with the given box.
    pub fn from_rect(rect: Rect) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    pub fn with_scale(self, scale_x: f64, scale_y: f64) -> Self {
        Self {
            scale_x,
            scale_y,
            ..self
        }
    }

    /// Box the shape covers on the stage: base extents times scale.
    pub fn resolved(&self) -> Rect {
        Rect::new(
            self.x,
            self.y,
            self.width * self.scale_x,
            self.height * self.scale_y,
        )
    }

    /// Same box with the scale folded into the extents.
    pub fn baked(&self) -> Self {
        Self::from_rect(self.resolved())
    }
}

/// Keeps a resize from collapsing a region: a proposed box narrower or
/// shorter than `min` is refused and the previous box stays.
pub fn bound_box(old: Rect, proposed: Rect, min: f64) -> Rect {
    if proposed.width.abs() < min || proposed.height.abs() < min {
        old
    } else {
        proposed
    }
}
