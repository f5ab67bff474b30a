//! Axial hex coordinates.
//!
//! Uses the axial `(q, r)` system with `s = -q - r` implied. `r` doubles as
//! latitude: row 0 is the equator.

use serde::{Deserialize, Serialize};

use crate::catalog::Climate;

/// Offsets to the six neighbours, clockwise from east.
pub const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// Position of a tile on the hex grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Implied third axial component.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// The six surrounding coordinates.
    pub fn neighbors(self) -> impl Iterator<Item = HexCoord> {
        DIRECTIONS
            .iter()
            .map(move |&(dq, dr)| HexCoord::new(self.q + dq, self.r + dr))
    }

    /// Grid distance in steps.
    #[must_use]
    pub fn distance(self, other: HexCoord) -> u32 {
        let dq = (self.q - other.q).unsigned_abs();
        let dr = (self.r - other.r).unsigned_abs();
        let ds = (self.s() - other.s()).unsigned_abs();
        dq.max(dr).max(ds)
    }

    #[must_use]
    pub fn is_adjacent(self, other: HexCoord) -> bool {
        self.distance(other) == 1
    }
}

/// All coordinates of a hexagon of the given radius, row by row.
#[must_use]
pub fn hexagon(radius: u32) -> Vec<HexCoord> {
    let n = i32::try_from(radius).unwrap_or(i32::MAX / 2);
    let mut coords = Vec::new();
    for r in -n..=n {
        let q_min = (-n).max(-n - r);
        let q_max = n.min(n - r);
        for q in q_min..=q_max {
            coords.push(HexCoord::new(q, r));
        }
    }
    coords
}

/// Climate band for a row of a board with the given radius.
///
/// The equator sits at row 0; the outermost rows of a radius-3 board are polar.
#[must_use]
pub fn climate_band(coord: HexCoord, radius: u32) -> Climate {
    let latitude = coord.r.unsigned_abs() * 4 / (radius + 1);
    match latitude {
        0 => Climate::Equatorial,
        1 => Climate::Tropical,
        2 => Climate::Temperate,
        _ => Climate::Polar,
    }
}
