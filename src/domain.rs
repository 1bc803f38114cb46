//! The domain module encapsulates the simulation engine. It defines the `Vehicle` and `Grid`
//! entities, along with the rules governing how vehicles move and collide.
//!
//! The module has no knowledge of how vehicles are entered or how results are displayed, so the
//! engine can be driven by any caller.

mod basis;
mod grid;
mod vehicle;

pub use basis::{Command, Heading, Position};
pub use grid::{CollisionEvent, CollisionScope, Grid, VehicleId};
pub use vehicle::{StepOutcome, StopReason, Vehicle, VehicleError, VehicleState};
