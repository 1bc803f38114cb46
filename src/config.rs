//! Engine configuration and the command line that fills it in.

use std::{num::ParseIntError, str::FromStr};

use clap::{ArgAction, Parser};
use thiserror::Error;

use crate::domain::{CollisionScope, Heading, Position, Vehicle, VehicleError};

/// Largest grid side, so that every cell has an `i32` coordinate.
const MAX_DIMENSION: i64 = i32::MAX as i64;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    pub collision_scope: CollisionScope,
}

impl SimulationConfig {
    pub const fn new(collision_scope: CollisionScope) -> Self {
        SimulationConfig { collision_scope }
    }
}

/// Simulate vehicles driving on a grid in lock-step and report where they end up.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Number of columns of the grid.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    pub width: u32,

    /// Number of rows of the grid.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=MAX_DIMENSION))]
    pub height: u32,

    /// Vehicle to add, e.g. "A 1 2 N FFRFFFRRLF". May be repeated.
    #[arg(long = "vehicle", value_name = "NAME X Y HEADING [COMMANDS]")]
    pub vehicles: Vec<VehicleArg>,

    /// Add this many randomly generated vehicles.
    #[arg(long, value_name = "COUNT")]
    pub random: Option<usize>,

    /// Seed for the random vehicles. A fresh seed is drawn if omitted.
    #[arg(long, requires = "random")]
    pub seed: Option<u64>,

    /// Longest program of a randomly generated vehicle.
    #[arg(long, default_value_t = 10)]
    pub max_commands: usize,

    /// Which earlier moves a forward move collides with.
    #[arg(long, default_value_t = CollisionScope::default())]
    pub collision_scope: CollisionScope,

    /// Increase logging verbosity. `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> SimulationConfig {
        SimulationConfig::new(self.collision_scope)
    }

    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

/// Vehicle given on the command line.
#[derive(Clone, Debug)]
pub struct VehicleArg(pub Vehicle);

impl FromStr for VehicleArg {
    type Err = VehicleArgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        let (name, x, y, heading, program) = match fields[..] {
            [name, x, y, heading] => (name, x, y, heading, ""),
            [name, x, y, heading, program] => (name, x, y, heading, program),
            _ => return Err(VehicleArgError::Format(s.to_string())),
        };

        let mut letters = heading.chars();
        let heading = match (letters.next(), letters.next()) {
            (Some(letter), None) => Heading::try_from(letter)?,
            _ => return Err(VehicleArgError::Format(s.to_string())),
        };

        let vehicle = Vehicle::new(
            name,
            Position::new(x.parse()?, y.parse()?),
            heading,
            program,
        )?;
        Ok(VehicleArg(vehicle))
    }
}

#[derive(Error, Debug)]
pub enum VehicleArgError {
    #[error("expected \"NAME X Y HEADING [COMMANDS]\", got {0:?}")]
    Format(String),
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] ParseIntError),
    #[error(transparent)]
    Vehicle(#[from] VehicleError),
}
