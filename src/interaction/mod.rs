//! Interaction domain: public API.
//!
//! Surface events in, transitions out. The machine owns the selection
//! store and the crop source for the lifetime of a stage.

mod events;
mod machine;
mod transform;

pub use events::{PressTarget, SurfaceEvent, Transition};
pub use machine::{InteractionMachine, Phase};
pub use transform::{bound_box, ShapeGeometry};
