//! Vehicle executing a fixed program of commands, one command per simulation step.

use log::{debug, info};
use thiserror::Error;

use super::{Command, Grid, Heading, Position, VehicleId};

#[derive(Clone, Debug, PartialEq)]
pub struct Vehicle {
    name: String,
    initial_position: Position,
    initial_heading: Heading,
    program: String,
    commands: Vec<Command>,
    position: Position,
    heading: Heading,
    step: usize,
    state: VehicleState,
}

impl Vehicle {
    pub fn new(
        name: impl Into<String>,
        position: Position,
        heading: Heading,
        program: &str,
    ) -> Result<Self, VehicleError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VehicleError::EmptyName);
        }
        let commands = Command::parse_program(program)?;
        Ok(Self {
            name,
            initial_position: position,
            initial_heading: heading,
            program: program.to_string(),
            commands,
            position,
            heading,
            step: 0,
            state: VehicleState::Active,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive identity check.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    pub fn initial_position(&self) -> Position {
        self.initial_position
    }

    pub fn initial_heading(&self) -> Heading {
        self.initial_heading
    }

    pub fn total_steps(&self) -> usize {
        self.commands.len()
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Last step this vehicle took part in.
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn state(&self) -> VehicleState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == VehicleState::Active
    }

    pub fn has_collided(&self) -> bool {
        self.state == VehicleState::Stopped(StopReason::Collided)
    }

    /// Stops the vehicle because something ran into it. A collision overrides any earlier stop
    /// reason, but the vehicle never becomes active again.
    pub fn mark_collided(&mut self) {
        self.state = VehicleState::Stopped(StopReason::Collided);
    }

    /// Executes the command for the 1-based `step`.
    ///
    /// A move that would leave the grid is discarded and stops the vehicle where it stands. Only
    /// forward moves are recorded on the grid and checked for collisions. The returned outcome
    /// lists the vehicles this one ran into, so the caller can stop them as well.
    pub fn advance(&mut self, id: VehicleId, grid: &mut Grid, step: usize) -> StepOutcome {
        if !self.is_active() {
            return StepOutcome::Idle;
        }

        self.step = step;

        let Some(&command) = step.checked_sub(1).and_then(|i| self.commands.get(i)) else {
            debug!("step {step}: {} ran out of commands", self.name);
            return self.stop(StopReason::RanOutOfCommands);
        };

        let next = self
            .next_state(command)
            .filter(|(position, _)| grid.contains(*position));

        let Some((position, heading)) = next else {
            info!(
                "step {step}: {} stopped at {} before leaving the grid",
                self.name, self.position
            );
            return self.stop(StopReason::HitBoundary);
        };

        self.position = position;
        self.heading = heading;
        debug!(
            "step {step}: {} executed {} and is at {} {}",
            self.name,
            command.letter(),
            self.position,
            self.heading
        );

        if command == Command::MoveForward {
            grid.mark_occupied(id, self.position, step);
            let colliding = grid.colliding_neighbours_of(id, self.position, step);
            if !colliding.is_empty() {
                self.mark_collided();
                return StepOutcome::Collided(colliding);
            }
        }

        StepOutcome::Executed(command)
    }

    /// `None` if a forward move would leave the coordinate range altogether.
    fn next_state(&self, command: Command) -> Option<(Position, Heading)> {
        match command {
            Command::MoveForward => self
                .position
                .checked_add(self.heading.offset())
                .map(|position| (position, self.heading)),
            Command::TurnLeft => Some((self.position, self.heading.turn_left())),
            Command::TurnRight => Some((self.position, self.heading.turn_right())),
        }
    }

    fn stop(&mut self, reason: StopReason) -> StepOutcome {
        self.state = VehicleState::Stopped(reason);
        StepOutcome::Stopped(reason)
    }

    /// Final position and heading, or `None` if the vehicle was involved in a collision.
    pub fn summary_line(&self) -> Option<String> {
        if self.has_collided() {
            return None;
        }
        Some(format!(
            "- {}, ({}, {}) {}",
            self.name,
            self.position.x(),
            self.position.y(),
            self.heading
        ))
    }

    pub fn initial_info_line(&self) -> String {
        format!(
            "{}, ({}, {}) {}, {}",
            self.name,
            self.position.x(),
            self.position.y(),
            self.heading,
            self.program.to_uppercase()
        )
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VehicleState {
    #[default]
    Active,
    Stopped(StopReason),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StopReason {
    RanOutOfCommands,
    HitBoundary,
    Collided,
}

/// What happened to a vehicle during one step.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StepOutcome {
    /// The vehicle was already stopped.
    Idle,
    Executed(Command),
    Stopped(StopReason),
    /// The vehicle moved forward into the listed vehicles and stopped.
    Collided(Vec<VehicleId>),
}

#[derive(Error, Debug, PartialEq)]
pub enum VehicleError {
    #[error("invalid command {found:?} at position {index}, expected one of F, L, R")]
    InvalidCommand { index: usize, found: char },
    #[error("invalid heading {0:?}, expected one of N, S, E, W")]
    InvalidHeading(char),
    #[error("vehicle name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::{domain::CollisionScope, tests::vehicle};

    const ID: VehicleId = VehicleId(0);

    fn grid() -> Grid {
        Grid::new(10, 10, CollisionScope::default())
    }

    fn run_program(vehicle: &mut Vehicle, grid: &mut Grid) {
        for step in 1..=vehicle.total_steps() + 1 {
            vehicle.advance(ID, grid, step);
        }
    }

    #[rstest]
    #[case::north(Heading::North, (1, 3))]
    #[case::south(Heading::South, (1, 1))]
    #[case::west(Heading::West, (0, 2))]
    #[case::east(Heading::East, (2, 2))]
    fn test_vehicle_forward(#[case] heading: Heading, #[case] expected: (i32, i32)) {
        let mut grid = grid();
        let mut car = vehicle("A", (1, 2), heading, "F");
        assert_eq!(
            car.advance(ID, &mut grid, 1),
            StepOutcome::Executed(Command::MoveForward)
        );
        assert_eq!(car.position(), Position::from(expected));
        assert_eq!(car.heading(), heading);
    }

    #[rstest]
    #[case(Heading::North, Heading::East)]
    #[case(Heading::East, Heading::South)]
    #[case(Heading::South, Heading::West)]
    #[case(Heading::West, Heading::North)]
    fn test_vehicle_turn_right(#[case] heading: Heading, #[case] expected: Heading) {
        let mut grid = grid();
        let mut car = vehicle("A", (1, 2), heading, "R");
        car.advance(ID, &mut grid, 1);
        assert_eq!(car.position(), Position::new(1, 2));
        assert_eq!(car.heading(), expected);
        assert!(grid.occupancy().is_empty());
    }

    #[rstest]
    #[case(Heading::North, Heading::West)]
    #[case(Heading::West, Heading::South)]
    #[case(Heading::South, Heading::East)]
    #[case(Heading::East, Heading::North)]
    fn test_vehicle_turn_left(#[case] heading: Heading, #[case] expected: Heading) {
        let mut grid = grid();
        let mut car = vehicle("A", (1, 2), heading, "L");
        car.advance(ID, &mut grid, 1);
        assert_eq!(car.position(), Position::new(1, 2));
        assert_eq!(car.heading(), expected);
    }

    #[rstest]
    #[case((1, 2), Heading::North, "FFRFFFRRLF", (4, 3), Heading::South)]
    #[case((7, 8), Heading::West, "FFLFFFFFFF", (5, 1), Heading::South)]
    #[case((2, 5), Heading::East, "FFFRFFLF", (6, 3), Heading::East)]
    fn test_vehicle_program(
        #[case] start: (i32, i32),
        #[case] heading: Heading,
        #[case] program: &str,
        #[case] position: (i32, i32),
        #[case] expected_heading: Heading,
    ) {
        let mut grid = grid();
        let mut car = vehicle("A", start, heading, program);
        run_program(&mut car, &mut grid);
        assert_eq!(car.position(), Position::from(position));
        assert_eq!(car.heading(), expected_heading);
        assert_eq!(
            car.state(),
            VehicleState::Stopped(StopReason::RanOutOfCommands)
        );
    }

    #[test]
    fn test_vehicle_stops_at_boundary() {
        let mut grid = grid();
        let mut car = vehicle("A", (0, 8), Heading::North, "FFRF");
        assert_eq!(
            car.advance(ID, &mut grid, 1),
            StepOutcome::Executed(Command::MoveForward)
        );
        assert_eq!(
            car.advance(ID, &mut grid, 2),
            StepOutcome::Stopped(StopReason::HitBoundary)
        );
        assert_eq!(car.advance(ID, &mut grid, 3), StepOutcome::Idle);
        assert_eq!(car.advance(ID, &mut grid, 4), StepOutcome::Idle);
        assert_eq!(car.position(), Position::new(0, 9));
        assert_eq!(car.heading(), Heading::North);
        assert_eq!(car.step(), 2);
    }

    #[test]
    fn test_vehicle_stops_at_coordinate_limit() {
        let mut grid = Grid::new(u32::MAX, 1, CollisionScope::default());
        let mut car = vehicle("A", (i32::MAX, 0), Heading::East, "F");
        assert_eq!(
            car.advance(ID, &mut grid, 1),
            StepOutcome::Stopped(StopReason::HitBoundary)
        );
        assert_eq!(car.position(), Position::new(i32::MAX, 0));
    }

    #[test]
    fn test_vehicle_without_commands_stops_on_first_step() {
        let mut grid = grid();
        let mut car = vehicle("A", (3, 3), Heading::East, "");
        assert_eq!(
            car.advance(ID, &mut grid, 1),
            StepOutcome::Stopped(StopReason::RanOutOfCommands)
        );
        assert!(!car.is_active());
    }

    #[test]
    fn test_vehicle_reports_collision() {
        let mut grid = grid();
        grid.mark_occupied(VehicleId(1), Position::new(3, 4), 1);
        let mut car = vehicle("A", (3, 3), Heading::North, "FF");
        assert_eq!(
            car.advance(ID, &mut grid, 1),
            StepOutcome::Collided(vec![VehicleId(1)])
        );
        assert!(car.has_collided());
        assert_eq!(car.advance(ID, &mut grid, 2), StepOutcome::Idle);
        assert_eq!(car.position(), Position::new(3, 4));
    }

    #[test]
    fn test_collision_overrides_earlier_stop() {
        let mut grid = grid();
        let mut car = vehicle("A", (3, 3), Heading::North, "");
        car.advance(ID, &mut grid, 1);
        car.mark_collided();
        assert_eq!(car.state(), VehicleState::Stopped(StopReason::Collided));
        assert_eq!(car.advance(ID, &mut grid, 2), StepOutcome::Idle);
    }

    #[test]
    fn test_vehicle_summary_line() {
        let mut grid = grid();
        let mut car = vehicle("A", (1, 2), Heading::North, "FFRFFFRRLF");
        run_program(&mut car, &mut grid);
        assert_eq!(car.summary_line().as_deref(), Some("- A, (4, 3) S"));
        car.mark_collided();
        assert_eq!(car.summary_line(), None);
    }

    #[test]
    fn test_vehicle_initial_info_line() {
        let car = vehicle("A", (1, 2), Heading::North, "ffrL");
        assert_eq!(car.initial_info_line(), "A, (1, 2) N, FFRL");
    }

    #[rstest]
    #[case::invalid_command("A", "FFQ", VehicleError::InvalidCommand { index: 2, found: 'Q' })]
    #[case::empty_name("  ", "F", VehicleError::EmptyName)]
    fn test_vehicle_new_rejects(
        #[case] name: &str,
        #[case] program: &str,
        #[case] expected: VehicleError,
    ) {
        assert_eq!(
            Vehicle::new(name, Position::new(0, 0), Heading::North, program),
            Err(expected)
        );
    }

    #[test]
    fn test_vehicle_has_name_ignores_case() {
        let car = vehicle("Alpha", (0, 0), Heading::North, "");
        assert!(car.has_name("ALPHA"));
        assert!(!car.has_name("Alph"));
    }
}
