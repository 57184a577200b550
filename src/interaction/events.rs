//! Events delivered by the rendering surface, and what handling them did.
//!
//! Both directions serialize as internally tagged JSON so a surface in
//! another process can drive the engine.

use serde::{Deserialize, Serialize};

use super::transform::ShapeGeometry;
use crate::geometry::{Extent, Point, Rect};
use crate::selection::{HandleBinding, RegionId};

/// What the pointer was over when it went down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PressTarget {
    /// Empty stage or the image itself.
    Surface,
    Shape { id: RegionId },
    TransformHandle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SurfaceEvent {
    /// The surface measured the rendered image.
    ImageMeasured { width: f64, height: f64 },
    PointerDown { position: Point, target: PressTarget },
    PointerMove { position: Point },
    PointerUp,
    ShapeClick { id: RegionId },
    DragStart { id: RegionId },
    DragEnd { id: RegionId, geometry: ShapeGeometry },
    TransformStart { id: RegionId },
    TransformEnd { id: RegionId, geometry: ShapeGeometry },
    HoverEnter { id: RegionId },
    HoverLeave { id: RegionId },
    /// The "Save" affordance next to a selected region.
    Deselect,
    Remove { id: RegionId },
}

/// Result of one event, for the surface to react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Transition {
    Ignored,
    Measured { extent: Extent },
    DrawStarted { anchor: Point, handle: HandleBinding },
    DraftResized { draft: Rect },
    /// Draw finished without producing a region.
    DraftDiscarded,
    Created { id: RegionId },
    ManipulationStarted { id: RegionId },
    /// Geometry and crop were replaced. `geometry` is what the surface
    /// should reset its shape to.
    Committed { id: RegionId, geometry: ShapeGeometry },
    /// The region kept its previous geometry and crop.
    CommitDeclined { id: RegionId },
    SelectionChanged { handle: HandleBinding },
    HoverChanged { hovered: Option<RegionId> },
    Removed { id: RegionId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_down_from_json() {
        let event: SurfaceEvent = serde_json::from_str(
            r#"{ "type": "pointerDown", "position": { "x": 100, "y": 100 }, "target": { "kind": "surface" } }"#,
        )
        .unwrap();
        assert_eq!(
            event,
            SurfaceEvent::PointerDown {
                position: Point::new(100.0, 100.0),
                target: PressTarget::Surface,
            }
        );
    }

    #[test]
    fn transform_end_from_json() {
        let event: SurfaceEvent = serde_json::from_str(
            r#"{ "type": "transformEnd", "id": 3,
                 "geometry": { "x": 10, "y": 10, "width": 50, "height": 20, "scaleX": 2 } }"#,
        )
        .unwrap();
        match event {
            SurfaceEvent::TransformEnd { id, geometry } => {
                assert_eq!(id, RegionId::new(3));
                assert_eq!(geometry.scale_x, 2.0);
                assert_eq!(geometry.scale_y, 1.0);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn transition_to_json() {
        let json = serde_json::to_value(Transition::SelectionChanged {
            handle: HandleBinding::Bound(RegionId::new(4)),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "type": "selectionChanged", "handle": 4 }));

        let json = serde_json::to_value(Transition::SelectionChanged {
            handle: HandleBinding::Unbound,
        })
        .unwrap();
        assert_eq!(json["handle"], serde_json::Value::Null);
    }
}
