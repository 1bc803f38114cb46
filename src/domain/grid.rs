//! Bounded grid tracking which vehicle moved where, and the collisions this caused.

use std::{collections::BTreeMap, fmt, str::FromStr};

use log::trace;
use thiserror::Error;

use super::Position;

/// Index of a vehicle within its simulation, in insertion order.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct VehicleId(pub usize);

/// Rule deciding which other vehicles a forward move collides with.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CollisionScope {
    /// Another vehicle currently holds the cell, whether it arrived earlier in this step, on an
    /// earlier step, or never left its start cell. Stopped vehicles keep holding their cell.
    #[default]
    Occupied,
    /// Another vehicle moved onto the same cell during the same step.
    SameStep,
    /// The first record ever logged on one of the four orthogonal neighbours of the new cell
    /// belongs to another vehicle, regardless of when it was logged.
    History,
}

impl fmt::Display for CollisionScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollisionScope::Occupied => "occupied",
            CollisionScope::SameStep => "same-step",
            CollisionScope::History => "history",
        })
    }
}

impl FromStr for CollisionScope {
    type Err = ParseCollisionScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "occupied" => Ok(CollisionScope::Occupied),
            "same-step" => Ok(CollisionScope::SameStep),
            "history" => Ok(CollisionScope::History),
            _ => Err(ParseCollisionScopeError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown collision scope {0:?}, expected \"occupied\", \"same-step\" or \"history\"")]
pub struct ParseCollisionScopeError(String);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OccupancyRecord {
    pub position: Position,
    pub vehicle: VehicleId,
    pub step: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollisionEvent {
    pub step: usize,
    pub position: Position,
    pub vehicle: String,
    pub other: String,
}

impl fmt::Display for CollisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- {}, collides with {} at ({},{}) at step {}",
            self.vehicle,
            self.other,
            self.position.x(),
            self.position.y(),
            self.step
        )
    }
}

#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    height: u32,
    scope: CollisionScope,
    occupancy: Vec<OccupancyRecord>,
    holders: BTreeMap<VehicleId, Position>,
    collisions: Vec<CollisionEvent>,
}

impl Grid {
    /// Creates an empty grid. Both dimensions are expected to be positive.
    pub fn new(width: u32, height: u32, scope: CollisionScope) -> Self {
        Self {
            width,
            height,
            scope,
            occupancy: vec![],
            holders: BTreeMap::new(),
            collisions: vec![],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells, which is also the most vehicles the grid can hold.
    pub fn capacity(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, position: Position) -> bool {
        u32::try_from(position.x()).is_ok_and(|x| x < self.width)
            && u32::try_from(position.y()).is_ok_and(|y| y < self.height)
    }

    pub fn occupancy(&self) -> &[OccupancyRecord] {
        &self.occupancy
    }

    /// Cell currently held by `vehicle`, if it has been placed.
    pub fn holder_position(&self, vehicle: VehicleId) -> Option<Position> {
        self.holders.get(&vehicle).copied()
    }

    /// Puts a vehicle on its start cell without logging an occupancy record.
    pub fn place(&mut self, vehicle: VehicleId, position: Position) {
        self.holders.insert(vehicle, position);
    }

    /// Appends an occupancy record and moves the vehicle onto `position`. Earlier records are
    /// never removed.
    pub fn mark_occupied(&mut self, vehicle: VehicleId, position: Position, step: usize) {
        trace!("step {step}: vehicle {} occupies {position}", vehicle.0);
        self.occupancy.push(OccupancyRecord {
            position,
            vehicle,
            step,
        });
        self.holders.insert(vehicle, position);
    }

    /// Vehicles that `vehicle`, having just moved forward onto `position` during `step`, collides
    /// with, in the order they were found. Under `History` a vehicle appears once per matching
    /// neighbour record.
    pub fn colliding_neighbours_of(
        &self,
        vehicle: VehicleId,
        position: Position,
        step: usize,
    ) -> Vec<VehicleId> {
        match self.scope {
            CollisionScope::Occupied => self
                .holders
                .iter()
                .filter(|(id, held)| **id != vehicle && **held == position)
                .map(|(id, _)| *id)
                .collect(),
            CollisionScope::SameStep => self
                .occupancy
                .iter()
                .rev()
                .take_while(|r| r.step == step)
                .filter(|r| r.position == position && r.vehicle != vehicle)
                .map(|r| r.vehicle)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect(),
            CollisionScope::History => position
                .neighbours()
                .filter_map(|cell| self.occupancy.iter().find(|r| r.position == cell))
                .filter(|r| r.vehicle != vehicle)
                .map(|r| r.vehicle)
                .collect(),
        }
    }

    /// Logs a collision in both directions.
    pub fn record_collision(&mut self, step: usize, position: Position, vehicle: &str, other: &str) {
        self.collisions.push(CollisionEvent {
            step,
            position,
            vehicle: vehicle.to_string(),
            other: other.to_string(),
        });
        self.collisions.push(CollisionEvent {
            step,
            position,
            vehicle: other.to_string(),
            other: vehicle.to_string(),
        });
    }

    /// Collision events ordered by the name of the colliding vehicle, ignoring case. Events of the
    /// same vehicle keep the order in which they were recorded.
    pub fn collision_log(&self) -> Vec<&CollisionEvent> {
        let mut log: Vec<&CollisionEvent> = self.collisions.iter().collect();
        log.sort_by(|a, b| {
            a.vehicle
                .to_lowercase()
                .cmp(&b.vehicle.to_lowercase())
                .then_with(|| a.vehicle.cmp(&b.vehicle))
        });
        log
    }
}
