//! End-to-end scenarios: pointer events in, regions and crops out.
//!
//! Every test drives an `InteractionMachine` the way a rendering surface
//! would, on an 800×1000 stage showing a 1600×2000 source image.

use std::cell::Cell;
use std::collections::HashSet;

use image::{DynamicImage, Rgba, RgbaImage};
use region_crop::crop::to_source_space;
use region_crop::selection::{SelectionStore, SequentialIds};
use region_crop::{
    CropArtifact, CropEngine, CropError, CropSource, EngineConfig, Extent, InteractionMachine,
    Point, PressTarget, Rect, RegionId, ShapeGeometry, SurfaceEvent, Transition,
};

fn source_image() -> DynamicImage {
    let img = RgbaImage::from_fn(1600, 2000, |x, y| {
        Rgba([(x % 251) as u8, (y % 241) as u8, ((x + y) % 239) as u8, 255])
    });
    DynamicImage::ImageRgba8(img)
}

fn machine() -> InteractionMachine {
    let mut machine = InteractionMachine::with_config(EngineConfig::default());
    machine.load_image(source_image());
    machine.handle(SurfaceEvent::ImageMeasured {
        width: 800.0,
        height: 1000.0,
    });
    machine
}

fn draw<C: CropSource>(machine: &mut InteractionMachine<C>, from: (f64, f64), to: (f64, f64)) -> Transition {
    machine.handle(SurfaceEvent::PointerDown {
        position: Point::new(from.0, from.1),
        target: PressTarget::Surface,
    });
    machine.handle(SurfaceEvent::PointerMove {
        position: Point::new(to.0, to.1),
    });
    machine.handle(SurfaceEvent::PointerUp)
}

fn created(transition: Transition) -> RegionId {
    match transition {
        Transition::Created { id } => id,
        other => panic!("expected a new region, got {:?}", other),
    }
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn scenario_a_draw_creates_region_at_source_resolution() {
    let mut machine = machine();
    let id = created(draw(&mut machine, (100.0, 100.0), (300.0, 250.0)));

    let region = machine.store().get(id).unwrap();
    assert_eq!(region.rect, Rect::new(100.0, 100.0, 200.0, 150.0));

    let window = machine.crop().source_window(&region.rect).unwrap();
    assert_eq!(window, Rect::new(200.0, 200.0, 400.0, 300.0));
    assert_eq!((region.artifact.width(), region.artifact.height()), (400, 300));

    let decoded = image::load_from_memory(region.artifact.bytes()).unwrap().to_rgba8();
    let expected = source_image().crop_imm(200, 200, 400, 300).to_rgba8();
    assert_eq!(decoded, expected);
}

#[test]
fn scenario_b_tiny_draw_creates_nothing() {
    let mut machine = machine();
    let t = draw(&mut machine, (100.0, 100.0), (103.0, 102.0));
    assert_eq!(t, Transition::DraftDiscarded);
    assert!(machine.store().is_empty());
    assert_eq!(machine.store().draft(), None);
}

#[test]
fn scenario_c_drag_moves_without_resizing() {
    let mut machine = machine();
    let id = created(draw(&mut machine, (100.0, 100.0), (300.0, 250.0)));
    let before = machine.store().get(id).cloned().unwrap();

    machine.handle(SurfaceEvent::DragStart { id });
    let moved = before.rect.translated(50.0, 20.0);
    let t = machine.handle(SurfaceEvent::DragEnd {
        id,
        geometry: ShapeGeometry::from_rect(moved),
    });
    assert!(matches!(t, Transition::Committed { .. }));

    let after = machine.store().get(id).unwrap();
    assert_eq!(after.rect, Rect::new(150.0, 120.0, 200.0, 150.0));
    assert_eq!(after.rect.width, before.rect.width);
    assert_eq!(after.rect.height, before.rect.height);
    assert_ne!(after.artifact.bytes(), before.artifact.bytes());
}

#[test]
fn scenario_d_resize_bakes_scale_and_does_not_compound() {
    let mut machine = machine();
    let id = created(draw(&mut machine, (100.0, 100.0), (300.0, 250.0)));
    let original = machine.store().get(id).unwrap().rect;

    machine.handle(SurfaceEvent::TransformStart { id });
    let scaled = ShapeGeometry::from_rect(original).with_scale(2.0, 1.0);
    let reset = match machine.handle(SurfaceEvent::TransformEnd { id, geometry: scaled }) {
        Transition::Committed { geometry, .. } => geometry,
        other => panic!("expected a commit, got {:?}", other),
    };
    assert_eq!(machine.store().get(id).unwrap().rect.width, original.width * 2.0);
    assert_eq!((reset.scale_x, reset.scale_y), (1.0, 1.0));
    assert_eq!(reset.width, original.width * 2.0);

    // A second resize from the reset shape scales the new baseline once.
    machine.handle(SurfaceEvent::TransformStart { id });
    let again = reset.with_scale(1.5, 1.0);
    machine.handle(SurfaceEvent::TransformEnd { id, geometry: again });
    assert_eq!(machine.store().get(id).unwrap().rect.width, original.width * 3.0);

    // Releasing at unit scale leaves the width where it is.
    let stored = machine.store().get(id).unwrap().rect;
    machine.handle(SurfaceEvent::TransformEnd {
        id,
        geometry: ShapeGeometry::from_rect(stored),
    });
    assert_eq!(machine.store().get(id).unwrap().rect, stored);
}

// ── Properties ──────────────────────────────────────────────────────

#[test]
fn full_display_rect_maps_to_full_source() {
    for (dw, dh, sw, sh) in [
        (800.0, 1000.0, 1600.0, 2000.0),
        (640.0, 480.0, 4000.0, 3000.0),
        (801.0, 599.0, 1234.0, 987.0),
    ] {
        let out = to_source_space(
            &Rect::new(0.0, 0.0, dw, dh),
            Some(Extent::new(dw, dh)),
            Some(Extent::new(sw, sh)),
        )
        .unwrap();
        assert_eq!(out, Rect::new(0.0, 0.0, sw, sh));
    }
}

#[test]
fn sub_threshold_draws_never_persist() {
    let mut machine = machine();
    for (w, h) in [(5.0, 100.0), (100.0, 5.0), (-5.0, 100.0), (100.0, -4.0), (0.0, 0.0)] {
        draw(&mut machine, (200.0, 200.0), (200.0 + w, 200.0 + h));
    }
    assert!(machine.store().is_empty());
}

#[test]
fn ids_are_pairwise_distinct() {
    let mut machine = machine();
    let ids: Vec<RegionId> = (0..25)
        .map(|i| {
            let x = 10.0 + (i % 5) as f64 * 150.0;
            let y = 10.0 + (i / 5) as f64 * 150.0;
            created(draw(&mut machine, (x, y), (x + 40.0, y + 40.0)))
        })
        .collect();
    let unique: HashSet<RegionId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());

    let ordinals: Vec<usize> = machine.store().previews().map(|p| p.ordinal).collect();
    assert_eq!(ordinals, (1..=25).collect::<Vec<_>>());
}

#[test]
fn select_always_clears_hover() {
    let mut machine = machine();
    let a = created(draw(&mut machine, (10.0, 10.0), (60.0, 60.0)));
    let b = created(draw(&mut machine, (100.0, 10.0), (160.0, 60.0)));

    for hovered in [None, Some(a), Some(b)] {
        machine.handle(SurfaceEvent::Deselect);
        if let Some(id) = hovered {
            machine.handle(SurfaceEvent::HoverEnter { id });
        }
        machine.handle(SurfaceEvent::ShapeClick { id: a });
        assert_eq!(machine.store().hovered(), None);
        assert_eq!(machine.store().selected(), Some(a));
    }
}

/// Crop source that can be switched off mid-test.
struct Switchable {
    inner: CropEngine,
    off: Cell<bool>,
}

impl CropSource for Switchable {
    fn extract_crop(&self, rect: &Rect) -> Result<CropArtifact, CropError> {
        if self.off.get() {
            return Err(CropError::ImageNotLoaded);
        }
        self.inner.extract_crop(rect)
    }

    fn set_displayed_extent(&mut self, extent: Extent) {
        self.inner.set_displayed_extent(extent);
    }
}

#[test]
fn failed_extraction_leaves_region_byte_identical() {
    let mut engine = CropEngine::new(Default::default());
    engine.load_image(source_image());
    let crop = Switchable {
        inner: engine,
        off: Cell::new(false),
    };
    let config = EngineConfig::default();
    let store = SelectionStore::new(Box::new(SequentialIds::new()), config.min_extent);
    let mut machine = InteractionMachine::new(store, crop, config);
    machine.handle(SurfaceEvent::ImageMeasured {
        width: 800.0,
        height: 1000.0,
    });

    let id = created(draw(&mut machine, (100.0, 100.0), (300.0, 250.0)));
    let before = machine.store().get(id).cloned().unwrap();

    machine.crop().off.set(true);
    let t = machine.handle(SurfaceEvent::DragEnd {
        id,
        geometry: ShapeGeometry::from_rect(Rect::new(400.0, 400.0, 100.0, 100.0)),
    });
    assert_eq!(t, Transition::CommitDeclined { id });

    let after = machine.store().get(id).unwrap();
    assert_eq!(after.rect, before.rect);
    assert_eq!(after.artifact.bytes(), before.artifact.bytes());

    // Creation while unavailable is dropped, not an error.
    assert_eq!(draw(&mut machine, (500.0, 500.0), (600.0, 600.0)), Transition::DraftDiscarded);
    assert_eq!(machine.store().len(), 1);
}

#[test]
fn nothing_happens_before_image_loads() {
    let mut machine = InteractionMachine::with_config(EngineConfig::default());
    assert_eq!(draw(&mut machine, (100.0, 100.0), (300.0, 250.0)), Transition::DraftDiscarded);
    assert!(machine.store().is_empty());
    assert_eq!(machine.stage_layout().stage, Extent::new(800.0, 1000.0));
}
