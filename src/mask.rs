//! Dimmed overlay that covers the stage everywhere outside the regions.
//!
//! Only describes the shape of the overlay; drawing it is up to the
//! surface.

use serde::Serialize;

use crate::geometry::{Extent, Point, Rect};
use crate::selection::SelectionStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskOverlay {
    pub bounds: Extent,
    pub opacity: f32,
    /// Normalized boxes cut out of the overlay, regions first, then the draft.
    pub holes: Vec<Rect>,
}

impl MaskOverlay {
    /// `None` while there is nothing to cut out.
    pub fn compose<'a>(
        bounds: Extent,
        opacity: f32,
        regions: impl IntoIterator<Item = &'a Rect>,
        draft: Option<Rect>,
    ) -> Option<Self> {
        let holes: Vec<Rect> = regions
            .into_iter()
            .copied()
            .chain(draft)
            .map(|r| r.normalized())
            .collect();
        if holes.is_empty() {
            return None;
        }
        Some(Self {
            bounds,
            opacity,
            holes,
        })
    }

    pub fn from_store(store: &SelectionStore, bounds: Extent, opacity: f32) -> Option<Self> {
        Self::compose(
            bounds,
            opacity,
            store.regions().iter().map(|r| &r.rect),
            store.draft(),
        )
    }

    /// True for points on the stage that no hole uncovers.
    pub fn is_dimmed(&self, point: Point) -> bool {
        let stage = Rect::new(0.0, 0.0, self.bounds.width, self.bounds.height);
        stage.contains(point) && !self.holes.iter().any(|h| h.contains(point))
    }

    /// Overlay alpha at a point: `opacity` where dimmed, zero elsewhere.
    pub fn alpha_at(&self, point: Point) -> f32 {
        if self.is_dimmed(point) {
            self.opacity
        } else {
            0.0
        }
    }
}
