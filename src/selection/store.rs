//! The authoritative list of regions plus selection and hover state.
//!
//! Every mutation of geometry goes through a [`CropSource`] first. If no
//! artifact can be produced for the new geometry, nothing changes: a
//! region's box and its crop always describe the same pixels.

use serde::Serialize;

use super::ids::{IdGenerator, RegionId};
use crate::crop::{CropArtifact, CropError, CropSource};
use crate::geometry::Rect;

/// A persisted region of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: RegionId,
    /// Display-space geometry, extents signed by drag direction.
    pub rect: Rect,
    pub artifact: CropArtifact,
}

/// Which region, if any, the manipulation handle is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleBinding {
    #[default]
    Unbound,
    Bound(RegionId),
}

/// Serializes as the bound id, or `null`.
impl Serialize for HandleBinding {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HandleBinding::Unbound => serializer.serialize_none(),
            HandleBinding::Bound(id) => serializer.serialize_some(id),
        }
    }
}

#[derive(Debug)]
pub enum CreateOutcome {
    Created(RegionId),
    Rejected(Rejection),
}

/// Why a candidate region was not added. Neither case is an error.
#[derive(Debug)]
pub enum Rejection {
    BelowThreshold,
    Unavailable(CropError),
}

#[derive(Debug)]
pub enum UpdateOutcome {
    Updated,
    UnknownId,
    Unavailable(CropError),
}

/// Entry in the numbered preview list.
#[derive(Debug, Clone, Copy)]
pub struct Preview<'a> {
    /// 1-based position in insertion order.
    pub ordinal: usize,
    pub id: RegionId,
    pub rect: Rect,
    pub artifact: &'a CropArtifact,
}

pub struct SelectionStore {
    regions: Vec<Region>,
    draft: Option<Rect>,
    ids: Box<dyn IdGenerator>,
    selected: Option<RegionId>,
    hovered: Option<RegionId>,
    handle: HandleBinding,
    min_extent: f64,
}

impl SelectionStore {
    pub fn new(ids: Box<dyn IdGenerator>, min_extent: f64) -> Self {
        Self {
            regions: Vec::new(),
            draft: None,
            ids,
            selected: None,
            hovered: None,
            handle: HandleBinding::Unbound,
            min_extent,
        }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    pub fn contains(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn min_extent(&self) -> f64 {
        self.min_extent
    }

    pub fn draft(&self) -> Option<Rect> {
        self.draft
    }

    /// Replaces the in-progress draft. There is only ever one.
    pub fn set_draft(&mut self, draft: Option<Rect>) {
        self.draft = draft;
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<RegionId> {
        self.hovered
    }

    pub fn handle(&self) -> HandleBinding {
        self.handle
    }

    /// A region is drawn highlighted only while nothing is selected.
    pub fn is_highlighted(&self, id: RegionId) -> bool {
        self.selected.is_none() && self.hovered == Some(id)
    }

    /// Adds a region for `rect` if it is large enough and a crop can be
    /// taken for it. The id is consumed even when extraction fails.
    pub fn create_if_large_enough(&mut self, rect: Rect, crop: &dyn CropSource) -> CreateOutcome {
        if !rect.exceeds(self.min_extent) {
            log::debug!(
                "[SELECTION] Ignored {}x{} draft, below {} units",
                rect.width.abs(),
                rect.height.abs(),
                self.min_extent
            );
            return CreateOutcome::Rejected(Rejection::BelowThreshold);
        }

        let id = self.ids.next_id();
        match crop.extract_crop(&rect) {
            Ok(artifact) => {
                self.regions.push(Region { id, rect, artifact });
                log::info!("[SELECTION] Created {} at {:?}", id, rect);
                CreateOutcome::Created(id)
            }
            Err(e) => {
                log::debug!("[SELECTION] Dropped candidate {}: {}", id, e);
                CreateOutcome::Rejected(Rejection::Unavailable(e))
            }
        }
    }

    /// Moves or resizes a region. Geometry and artifact change together,
    /// or the region is left exactly as it was.
    pub fn update_geometry(
        &mut self,
        id: RegionId,
        rect: Rect,
        crop: &dyn CropSource,
    ) -> UpdateOutcome {
        let Some(index) = self.regions.iter().position(|r| r.id == id) else {
            log::debug!("[SELECTION] Update for unknown {} ignored", id);
            return UpdateOutcome::UnknownId;
        };

        let artifact = match crop.extract_crop(&rect) {
            Ok(artifact) => artifact,
            Err(e) => {
                log::debug!("[SELECTION] Kept {} unchanged: {}", id, e);
                return UpdateOutcome::Unavailable(e);
            }
        };

        let region = &mut self.regions[index];
        region.rect = rect;
        region.artifact = artifact;
        log::info!("[SELECTION] Updated {} to {:?}", id, rect);
        UpdateOutcome::Updated
    }

    /// Selects a region, or clears the selection with `None`.
    ///
    /// Selecting clears hover. The manipulation handle is rebound here, so
    /// the returned binding is always in step with the selection. Unknown
    /// ids leave everything as it was.
    pub fn select(&mut self, id: Option<RegionId>) -> HandleBinding {
        match id {
            Some(id) if !self.contains(id) => {
                log::debug!("[SELECTION] Select of unknown {} ignored", id);
            }
            Some(id) => {
                self.selected = Some(id);
                self.hovered = None;
                self.handle = HandleBinding::Bound(id);
            }
            None => {
                self.selected = None;
                self.handle = HandleBinding::Unbound;
            }
        }
        self.handle
    }

    /// Sets the hovered region. Suppressed while anything is selected.
    /// Returns whether the hover state changed.
    pub fn set_hovered(&mut self, id: Option<RegionId>) -> bool {
        if self.selected.is_some() {
            return false;
        }
        if let Some(id) = id {
            if !self.contains(id) {
                return false;
            }
        }
        let changed = self.hovered != id;
        self.hovered = id;
        changed
    }

    /// Deletes a region, clearing selection and hover that pointed at it.
    pub fn remove(&mut self, id: RegionId) -> Option<Region> {
        let index = self.regions.iter().position(|r| r.id == id)?;
        let region = self.regions.remove(index);
        if self.selected == Some(id) {
            self.select(None);
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        log::info!("[SELECTION] Removed {}", id);
        Some(region)
    }

    /// Regions in insertion order, numbered from 1.
    pub fn previews(&self) -> impl Iterator<Item = Preview<'_>> {
        self.regions.iter().enumerate().map(|(i, r)| Preview {
            ordinal: i + 1,
            id: r.id,
            rect: r.rect,
            artifact: &r.artifact,
        })
    }
}
