//! Selection domain: public API.
//!
//! Region identity and the store that owns the region list, the draft,
//! and the selection/hover scalars.

mod ids;
mod store;

pub use ids::{IdGenerator, RegionId, SequentialIds};
pub use store::{
    CreateOutcome, HandleBinding, Preview, Region, Rejection, SelectionStore, UpdateOutcome,
};
