//! Lock-step simulation of all vehicles on a shared grid.
//!
//! In every step each active vehicle executes one command, in the order the vehicles were added.
//! When a forward move runs into other vehicles, all of them are stopped and the collision is
//! logged. The simulation ends as soon as no vehicle is active.

use std::fmt;

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    config::SimulationConfig,
    domain::{CollisionEvent, Grid, Position, StepOutcome, Vehicle, VehicleId},
};

#[derive(Clone, Debug)]
pub struct Simulator {
    grid: Grid,
    config: SimulationConfig,
    vehicles: Vec<Vehicle>,
    steps: usize,
}

impl Simulator {
    pub fn new(width: u32, height: u32, config: SimulationConfig) -> Self {
        Self {
            grid: Grid::new(width, height, config.collision_scope),
            config,
            vehicles: vec![],
            steps: 0,
        }
    }

    /// Replaces the grid and starts over: vehicles already added are dropped, since they were
    /// validated against the old bounds.
    pub fn set_grid(&mut self, width: u32, height: u32) {
        self.grid = Grid::new(width, height, self.config.collision_scope);
        self.vehicles.clear();
        self.steps = 0;
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Global step counter, i.e. the number of steps the last run took.
    pub fn steps_taken(&self) -> usize {
        self.steps
    }

    /// Adds a vehicle unless the grid is full, its name is taken (ignoring case) or another
    /// vehicle starts on the same cell. The checks are made in this order.
    pub fn try_add_vehicle(&mut self, vehicle: Vehicle) -> Result<VehicleId, AddVehicleError> {
        let capacity = self.grid.capacity();
        if self.vehicles.len() >= capacity {
            return Err(AddVehicleError::CarsOverload { capacity });
        }

        if self.vehicles.iter().any(|v| v.has_name(vehicle.name())) {
            return Err(AddVehicleError::CarNameExisted(vehicle.name().to_string()));
        }

        if self
            .vehicles
            .iter()
            .any(|v| v.initial_position() == vehicle.initial_position())
        {
            return Err(AddVehicleError::CarIsSamePosition(vehicle.initial_position()));
        }

        let id = VehicleId(self.vehicles.len());
        self.grid.place(id, vehicle.initial_position());
        debug!("added vehicle {}", vehicle.initial_info_line());
        self.vehicles.push(vehicle);
        Ok(id)
    }

    /// Steps all vehicles until none of them is active and returns the number of steps taken.
    pub fn run(&mut self) -> usize {
        if self.vehicles.is_empty() {
            warn!("running a simulation without vehicles");
        }

        while self.vehicles.iter().any(Vehicle::is_active) {
            self.steps += 1;
            let step = self.steps;

            for index in 0..self.vehicles.len() {
                let id = VehicleId(index);
                if let StepOutcome::Collided(others) =
                    self.vehicles[index].advance(id, &mut self.grid, step)
                {
                    let position = self.vehicles[index].position();
                    for other in others {
                        self.vehicles[other.0].mark_collided();
                        self.grid.record_collision(
                            step,
                            position,
                            self.vehicles[index].name(),
                            self.vehicles[other.0].name(),
                        );
                        info!(
                            "step {step}: {} collided with {} at {position}",
                            self.vehicles[index].name(),
                            self.vehicles[other.0].name()
                        );
                    }
                }
            }
        }

        self.steps
    }

    /// Collisions sorted by vehicle name, followed by the final state of every vehicle that was not
    /// involved in a collision, in insertion order.
    pub fn report(&self) -> Report {
        Report {
            collisions: self.grid.collision_log().into_iter().cloned().collect(),
            survivors: self
                .vehicles
                .iter()
                .filter_map(Vehicle::summary_line)
                .collect(),
        }
    }

    /// One line per vehicle describing its start and program.
    pub fn initial_listing(&self) -> Vec<String> {
        self.vehicles
            .iter()
            .map(Vehicle::initial_info_line)
            .collect()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    pub collisions: Vec<CollisionEvent>,
    pub survivors: Vec<String>,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for collision in &self.collisions {
            writeln!(f, "{collision}")?;
        }
        for survivor in &self.survivors {
            writeln!(f, "{survivor}")?;
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AddVehicleError {
    #[error("the grid cannot hold more than {capacity} vehicles")]
    CarsOverload { capacity: usize },
    #[error("a vehicle named {0} already exists")]
    CarNameExisted(String),
    #[error("another vehicle already starts at {0}")]
    CarIsSamePosition(Position),
}
