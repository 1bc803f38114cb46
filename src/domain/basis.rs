//! Basic building blocks.

use std::fmt;

use super::VehicleError;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Ord, PartialOrd)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    /// `None` if a coordinate leaves the `i32` range.
    pub fn checked_add(self, rhs: Position) -> Option<Position> {
        Some(Self {
            x: self.x.checked_add(rhs.x)?,
            y: self.y.checked_add(rhs.y)?,
        })
    }

    /// The orthogonally adjacent cells in the order north, south, east, west. Cells outside the
    /// `i32` range are skipped.
    pub fn neighbours(self) -> impl Iterator<Item = Position> {
        Heading::ALL
            .into_iter()
            .filter_map(move |heading| self.checked_add(heading.offset()))
    }
}

impl From<(i32, i32)> for Position {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Heading {
    North,
    South,
    East,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::South, Heading::East, Heading::West];

    pub fn turn_right(self) -> Self {
        match self {
            Heading::North => Heading::East,
            Heading::East => Heading::South,
            Heading::South => Heading::West,
            Heading::West => Heading::North,
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Heading::North => Heading::West,
            Heading::West => Heading::South,
            Heading::South => Heading::East,
            Heading::East => Heading::North,
        }
    }

    /// Unit step taken by a forward move.
    pub fn offset(self) -> Position {
        match self {
            Heading::North => Position::new(0, 1),
            Heading::South => Position::new(0, -1),
            Heading::East => Position::new(1, 0),
            Heading::West => Position::new(-1, 0),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Heading::North => 'N',
            Heading::South => 'S',
            Heading::East => 'E',
            Heading::West => 'W',
        }
    }
}

impl TryFrom<char> for Heading {
    type Error = VehicleError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'N' => Ok(Heading::North),
            'S' => Ok(Heading::South),
            'E' => Ok(Heading::East),
            'W' => Ok(Heading::West),
            _ => Err(VehicleError::InvalidHeading(value)),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    MoveForward,
    TurnLeft,
    TurnRight,
}

impl Command {
    /// Parses a whole program, reporting the first offending character.
    pub fn parse_program(text: &str) -> Result<Vec<Command>, VehicleError> {
        text.chars()
            .enumerate()
            .map(|(index, c)| {
                Command::try_from(c).map_err(|_| VehicleError::InvalidCommand { index, found: c })
            })
            .collect()
    }

    pub fn letter(self) -> char {
        match self {
            Command::MoveForward => 'F',
            Command::TurnLeft => 'L',
            Command::TurnRight => 'R',
        }
    }
}

impl TryFrom<char> for Command {
    type Error = VehicleError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_uppercase() {
            'F' => Ok(Command::MoveForward),
            'L' => Ok(Command::TurnLeft),
            'R' => Ok(Command::TurnRight),
            _ => Err(VehicleError::InvalidCommand {
                index: 0,
                found: value,
            }),
        }
    }
}
