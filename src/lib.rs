//! Region Crop: a selection engine for cropping regions out of a scaled image.
//!
//! Wires together:
//! - Crop domain (crop/): display-to-source mapping and extraction
//! - Selection domain (selection/): region list, selection and hover
//! - Interaction domain (interaction/): pointer-driven state machine
//! - Mask overlay (mask.rs) and engine configuration (config.rs)
//!
//! A host surface feeds [`SurfaceEvent`]s into an [`InteractionMachine`]
//! and renders whatever the [`SelectionStore`] holds afterwards.

pub mod config;
pub mod crop;
pub mod geometry;
pub mod interaction;
pub mod mask;
pub mod selection;

pub use config::{ArtifactFormat, EngineConfig};
pub use crop::{CropArtifact, CropEngine, CropError, CropSource};
pub use geometry::{Extent, Point, Rect};
pub use interaction::{InteractionMachine, PressTarget, ShapeGeometry, SurfaceEvent, Transition};
pub use mask::MaskOverlay;
pub use selection::{RegionId, SelectionStore};

/// Initialises `env_logger` from `RUST_LOG`. Safe to call more than once.
pub fn init_logging() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialised");
    }
}
