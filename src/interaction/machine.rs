//! Pointer-driven state machine for drawing, selecting, moving and
//! resizing regions.
//!
//! The machine is the only writer of the [`SelectionStore`]. Every event
//! runs to completion before the next one is handled, so the outcome of
//! an event sequence depends only on its order.

use image::DynamicImage;

use super::events::{PressTarget, SurfaceEvent, Transition};
use super::transform::{bound_box, ShapeGeometry};
use crate::config::EngineConfig;
use crate::crop::{CropEngine, CropSource, StageLayout};
use crate::geometry::{Extent, Point, Rect};
use crate::mask::MaskOverlay;
use crate::selection::{CreateOutcome, RegionId, SelectionStore, SequentialIds, UpdateOutcome};

/// What the pointer is currently doing. Selection is tracked separately
/// by the store; a region can be selected in any phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Drawing { anchor: Point },
    Dragging(RegionId),
    Resizing(RegionId),
}

pub struct InteractionMachine<C: CropSource = CropEngine> {
    phase: Phase,
    store: SelectionStore,
    crop: C,
    config: EngineConfig,
}

impl InteractionMachine<CropEngine> {
    /// Machine with a sequential id generator and an empty crop engine.
    pub fn with_config(config: EngineConfig) -> Self {
        let store = SelectionStore::new(Box::new(SequentialIds::new()), config.min_extent);
        let crop = CropEngine::new(config.artifact_format);
        Self::new(store, crop, config)
    }

    /// Loads the source image. Until the surface reports its own
    /// measurement of this image, it is assumed to be fitted to the stage
    /// width.
    pub fn load_image(&mut self, image: DynamicImage) {
        self.crop.load_image(image);
        if let Some(fitted) = self.stage_layout().image {
            self.crop.set_displayed_extent(fitted);
        }
    }

    pub fn stage_layout(&self) -> StageLayout {
        StageLayout::fit(
            self.crop.source_extent(),
            self.config.stage_width,
            self.config.fallback_stage_height,
        )
    }

    /// Overlay for the current stage, if anything is drawn.
    pub fn stage_mask(&self) -> Option<MaskOverlay> {
        self.mask(self.stage_layout().stage)
    }
}

impl<C: CropSource> InteractionMachine<C> {
    pub fn new(store: SelectionStore, crop: C, config: EngineConfig) -> Self {
        Self {
            phase: Phase::Idle,
            store,
            crop,
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn store(&self) -> &SelectionStore {
        &self.store
    }

    pub fn crop(&self) -> &C {
        &self.crop
    }

    pub fn crop_mut(&mut self) -> &mut C {
        &mut self.crop
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mask(&self, stage: Extent) -> Option<MaskOverlay> {
        MaskOverlay::from_store(&self.store, stage, self.config.mask_opacity)
    }

    pub fn handle(&mut self, event: SurfaceEvent) -> Transition {
        let transition = match event {
            SurfaceEvent::ImageMeasured { width, height } => {
                let extent = Extent::new(width, height);
                self.crop.set_displayed_extent(extent);
                Transition::Measured { extent }
            }
            SurfaceEvent::PointerDown { position, target } => self.press(position, target),
            SurfaceEvent::PointerMove { position } => self.pointer_moved(position),
            SurfaceEvent::PointerUp => self.release(),
            SurfaceEvent::ShapeClick { id } => {
                if self.store.contains(id) {
                    Transition::SelectionChanged {
                        handle: self.store.select(Some(id)),
                    }
                } else {
                    Transition::Ignored
                }
            }
            SurfaceEvent::DragStart { id } => self.start_manipulation(Phase::Dragging(id), id),
            SurfaceEvent::TransformStart { id } => self.start_manipulation(Phase::Resizing(id), id),
            SurfaceEvent::DragEnd { id, geometry } => self.commit(id, geometry, false),
            SurfaceEvent::TransformEnd { id, geometry } => self.commit(id, geometry, true),
            SurfaceEvent::HoverEnter { id } => self.hover(Some(id)),
            SurfaceEvent::HoverLeave { .. } => self.hover(None),
            SurfaceEvent::Deselect => Transition::SelectionChanged {
                handle: self.store.select(None),
            },
            SurfaceEvent::Remove { id } => self.remove(id),
        };
        log::trace!("[INTERACTION] {:?} -> {:?}", self.phase, transition);
        transition
    }

    fn press(&mut self, position: Point, target: PressTarget) -> Transition {
        match target {
            PressTarget::Surface => {
                // Any draft still around is abandoned.
                self.store.set_draft(None);
                let handle = self.store.select(None);
                self.phase = Phase::Drawing { anchor: position };
                Transition::DrawStarted {
                    anchor: position,
                    handle,
                }
            }
            // The shape or handle runs its own logic; starting a draw here
            // would cancel it.
            PressTarget::Shape { .. } | PressTarget::TransformHandle => Transition::Ignored,
        }
    }

    fn pointer_moved(&mut self, position: Point) -> Transition {
        let Phase::Drawing { anchor } = self.phase else {
            return Transition::Ignored;
        };
        let draft = Rect::from_corners(anchor, position);
        self.store.set_draft(Some(draft));
        Transition::DraftResized { draft }
    }

    fn release(&mut self) -> Transition {
        let Phase::Drawing { .. } = self.phase else {
            return Transition::Ignored;
        };
        self.phase = Phase::Idle;

        let Some(draft) = self.store.draft() else {
            return Transition::DraftDiscarded;
        };
        self.store.set_draft(None);

        if !draft.exceeds(self.store.min_extent()) {
            log::debug!("[INTERACTION] Draft {:?} too small, discarded", draft);
            return Transition::DraftDiscarded;
        }

        match self.store.create_if_large_enough(draft, &self.crop) {
            CreateOutcome::Created(id) => Transition::Created { id },
            CreateOutcome::Rejected(_) => Transition::DraftDiscarded,
        }
    }

    fn start_manipulation(&mut self, phase: Phase, id: RegionId) -> Transition {
        if !self.store.contains(id) {
            return Transition::Ignored;
        }
        if matches!(self.phase, Phase::Drawing { .. }) {
            self.store.set_draft(None);
        }
        self.phase = phase;
        Transition::ManipulationStarted { id }
    }

    /// Commits the geometry a drag or resize ended with. The scale the
    /// surface reports is folded into the extents first.
    fn commit(&mut self, id: RegionId, geometry: ShapeGeometry, resized: bool) -> Transition {
        if matches!(self.phase, Phase::Dragging(_) | Phase::Resizing(_)) {
            self.phase = Phase::Idle;
        }

        let Some(current) = self.store.get(id).map(|r| r.rect) else {
            return Transition::Ignored;
        };

        let baked = geometry.baked();
        let mut rect = baked.resolved();
        if resized {
            rect = bound_box(current, rect, self.store.min_extent());
            if rect == current && baked.resolved() != current {
                log::debug!("[INTERACTION] Resize of {} below minimum, kept", id);
                return Transition::CommitDeclined { id };
            }
        }

        match self.store.update_geometry(id, rect, &self.crop) {
            UpdateOutcome::Updated => Transition::Committed {
                id,
                geometry: ShapeGeometry::from_rect(rect),
            },
            UpdateOutcome::UnknownId => Transition::Ignored,
            UpdateOutcome::Unavailable(_) => Transition::CommitDeclined { id },
        }
    }

    fn hover(&mut self, id: Option<RegionId>) -> Transition {
        if self.store.set_hovered(id) {
            Transition::HoverChanged {
                hovered: self.store.hovered(),
            }
        } else {
            Transition::Ignored
        }
    }

    fn remove(&mut self, id: RegionId) -> Transition {
        if self.store.remove(id).is_none() {
            return Transition::Ignored;
        }
        if matches!(self.phase, Phase::Dragging(m) | Phase::Resizing(m) if m == id) {
            self.phase = Phase::Idle;
        }
        Transition::Removed { id }
    }
}
