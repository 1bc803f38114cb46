//! Reproducible random scenarios.

use rand::{seq::index, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::domain::{Command, Heading, Position, Vehicle, VehicleError};

const COMMANDS: [Command; 3] = [Command::MoveForward, Command::TurnLeft, Command::TurnRight];

pub struct ScenarioGenerator {
    rng: ChaCha8Rng,
}

impl ScenarioGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates `count` vehicles with distinct names and distinct start cells inside a
    /// `width` x `height` grid. Each program holds at most `max_commands` commands.
    pub fn generate(
        &mut self,
        width: u32,
        height: u32,
        count: usize,
        max_commands: usize,
    ) -> Result<Vec<Vehicle>, ScenarioError> {
        let coordinate = |value: usize| {
            i32::try_from(value).map_err(|_| ScenarioError::GridTooLarge { width, height })
        };
        coordinate(width as usize)?;
        coordinate(height as usize)?;

        let capacity = width as usize * height as usize;
        if count > capacity {
            return Err(ScenarioError::TooManyVehicles { count, capacity });
        }

        let cells = index::sample(&mut self.rng, capacity, count);
        let mut vehicles = Vec::with_capacity(count);

        for (i, cell) in cells.into_iter().enumerate() {
            let position = Position::new(
                coordinate(cell % width as usize)?,
                coordinate(cell / width as usize)?,
            );
            let heading = Heading::ALL[self.rng.random_range(0..Heading::ALL.len())];
            let length = self.rng.random_range(0..=max_commands);
            let program = (0..length)
                .map(|_| COMMANDS[self.rng.random_range(0..COMMANDS.len())].letter())
                .collect::<String>();
            vehicles.push(Vehicle::new(vehicle_name(i), position, heading, &program)?);
        }

        Ok(vehicles)
    }
}

/// Spreadsheet style names: A, B, ..., Z, AA, AB, ...
pub fn vehicle_name(mut index: usize) -> String {
    let mut name = vec![];
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.iter().rev().map(|&b| b as char).collect()
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("cannot place {count} vehicles on a grid with {capacity} cells")]
    TooManyVehicles { count: usize, capacity: usize },
    #[error("a {width}x{height} grid has cells outside the coordinate range")]
    GridTooLarge { width: u32, height: u32 },
    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}
