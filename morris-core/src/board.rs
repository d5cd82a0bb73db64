//! Board geometry: the 24 points of three nested squares and their mills

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MorrisError;

/// Number of playable intersections
pub const NUM_POINTS: usize = 24;

/// Number of straight-line triples on the board
pub const NUM_MILLS: usize = 16;

/// Grid coordinates (file 0-6 = a-g, rank 1-7) of each point, indexed by point.
/// Points are numbered row by row from the top-left corner.
const COORDS: [(u8, u8); NUM_POINTS] = [
    (0, 7), (3, 7), (6, 7),                 // outer top
    (1, 6), (3, 6), (5, 6),                 // middle top
    (2, 5), (3, 5), (4, 5),                 // inner top
    (0, 4), (1, 4), (2, 4),                 // left connector
    (4, 4), (5, 4), (6, 4),                 // right connector
    (2, 3), (3, 3), (4, 3),                 // inner bottom
    (1, 2), (3, 2), (5, 2),                 // middle bottom
    (0, 1), (3, 1), (6, 1),                 // outer bottom
];

/// Adjacency lists (sliding moves), indexed by point
const ADJACENT: [&[u8]; NUM_POINTS] = [
    &[1, 9],
    &[0, 2, 4],
    &[1, 14],
    &[4, 10],
    &[1, 3, 5, 7],
    &[4, 13],
    &[7, 11],
    &[4, 6, 8],
    &[7, 12],
    &[0, 10, 21],
    &[3, 9, 11, 18],
    &[6, 10, 15],
    &[8, 13, 17],
    &[5, 12, 14, 20],
    &[2, 13, 23],
    &[11, 16],
    &[15, 17, 19],
    &[12, 16],
    &[10, 19],
    &[16, 18, 20, 22],
    &[13, 19],
    &[9, 22],
    &[19, 21, 23],
    &[14, 22],
];

/// The straight-line triples. Horizontal lines first, then vertical.
const MILL_LINES: [[u8; 3]; NUM_MILLS] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [9, 10, 11],
    [12, 13, 14],
    [15, 16, 17],
    [18, 19, 20],
    [21, 22, 23],
    [0, 9, 21],
    [3, 10, 18],
    [6, 11, 15],
    [1, 4, 7],
    [16, 19, 22],
    [8, 12, 17],
    [5, 13, 20],
    [2, 14, 23],
];

/// Every point lies on exactly one horizontal and one vertical line
const POINT_MILLS: [[u8; 2]; NUM_POINTS] = [
    [0, 8], [0, 11], [0, 15],
    [1, 9], [1, 11], [1, 14],
    [2, 10], [2, 11], [2, 13],
    [3, 8], [3, 9], [3, 10],
    [4, 13], [4, 14], [4, 15],
    [5, 10], [5, 12], [5, 13],
    [6, 9], [6, 12], [6, 14],
    [7, 8], [7, 12], [7, 15],
];

/// One of the 24 board intersections
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Point(u8);

impl Point {
    /// Point by index (0-23)
    pub fn new(index: usize) -> Option<Self> {
        (index < NUM_POINTS).then_some(Self(index as u8))
    }

    /// Point at grid coordinates, if that grid cell is an intersection
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        COORDS
            .iter()
            .position(|&c| c == (file, rank))
            .map(|i| Self(i as u8))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// (file, rank) on the 7x7 grid
    pub fn coords(self) -> (u8, u8) {
        COORDS[self.index()]
    }

    /// All points in index order
    pub fn all() -> impl Iterator<Item = Point> {
        (0..NUM_POINTS as u8).map(Point)
    }

    /// Directly connected points
    pub fn neighbors(self) -> impl Iterator<Item = Point> {
        ADJACENT[self.index()].iter().map(|&i| Point(i))
    }

    pub fn is_adjacent(self, other: Point) -> bool {
        ADJACENT[self.index()].contains(&other.0)
    }

    /// The two mills passing through this point
    pub fn mills(self) -> [Mill; 2] {
        let [a, b] = POINT_MILLS[self.index()];
        [Mill(a), Mill(b)]
    }
}

impl TryFrom<u8> for Point {
    type Error = MorrisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Point::new(value as usize)
            .ok_or_else(|| MorrisError::ParseAction(format!("point index out of range: {}", value)))
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> Self {
        point.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (file, rank) = self.coords();
        write!(f, "{}{}", (b'a' + file) as char, rank)
    }
}

impl FromStr for Point {
    type Err = MorrisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.trim().as_bytes();
        if bytes.len() != 2 {
            return Err(MorrisError::ParseAction(format!("bad point: {:?}", s)));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'0');
        Point::from_coords(file, rank)
            .ok_or_else(|| MorrisError::ParseAction(format!("not a board point: {:?}", s)))
    }
}

/// A straight-line triple of points
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Mill(u8);

impl Mill {
    /// Mill by index (0-15)
    pub fn new(index: usize) -> Option<Self> {
        (index < NUM_MILLS).then_some(Self(index as u8))
    }

    /// All mills in table order
    pub fn all() -> impl Iterator<Item = Mill> {
        (0..NUM_MILLS as u8).map(Mill)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn points(self) -> [Point; 3] {
        MILL_LINES[self.index()].map(Point)
    }

    pub fn contains(self, point: Point) -> bool {
        MILL_LINES[self.index()].contains(&point.0)
    }
}

impl TryFrom<u8> for Mill {
    type Error = MorrisError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Mill::new(value as usize)
            .ok_or_else(|| MorrisError::ParseAction(format!("mill index out of range: {}", value)))
    }
}

impl From<Mill> for u8 {
    fn from(mill: Mill) -> Self {
        mill.0
    }
}

impl fmt::Display for Mill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.points();
        write!(f, "{}-{}-{}", a, b, c)
    }
}
