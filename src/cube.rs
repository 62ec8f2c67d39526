//! Piece-level model of the cube state.
//!
//! Corner positions are numbered 0..8 by octant: bit 0 of the index is the
//! x side, bit 1 the y side, bit 2 the z side, with a clear bit meaning the
//! positive half. Edge positions are numbered 0..12 with the R-face ring
//! first (UR, FR, BR, DR), then UF, UB, DF, DB, then the L-face ring
//! (UL, FL, BL, DL). Centres never move and are not part of the state.

use crate::codec;

pub const NUM_CORNERS: usize = 8;
pub const NUM_EDGES: usize = 12;

/// The axis a sticker or protrusion points along.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    #[inline(always)]
    pub fn index(self) -> u8 {
        self as u8
    }

    #[inline(always)]
    pub fn from_index(index: u8) -> Axis {
        match index {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            other => unreachable!("axis index {other} out of range"),
        }
    }

    /// Exchange two axes, leaving the third fixed. This is how a quarter
    /// turn acts on anything axis-valued.
    #[inline(always)]
    pub fn swapped(self, a: Axis, b: Axis) -> Axis {
        if self == a {
            b
        } else if self == b {
            a
        } else {
            self
        }
    }
}

/// A corner piece: where it sits and which axis its reference sticker
/// (yellow or white at solved) points along.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Corner {
    pub position: u8,
    pub orientation: Axis,
}

/// An edge piece: where it sits and whether it is flipped relative to the
/// solved insertion.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct Edge {
    pub position: u8,
    pub flipped: bool,
}

/// Full cube state. `corners[i]` and `edges[i]` are always piece `i`; a
/// rotation changes the fields of the moved pieces, never their slot in the
/// array.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Cube {
    pub corners: [Corner; NUM_CORNERS],
    pub edges: [Edge; NUM_EDGES],
}

/// Composite state key: the corner hash and the edge hash side by side.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct CubeHash {
    pub corners: u32,
    pub edges: u64,
}

impl CubeHash {
    pub const SOLVED: CubeHash = CubeHash { corners: 0, edges: 0 };
}

impl Cube {
    pub fn solved() -> Self {
        let mut corners = [Corner { position: 0, orientation: Axis::X }; NUM_CORNERS];
        for (i, corner) in corners.iter_mut().enumerate() {
            corner.position = i as u8;
        }
        let mut edges = [Edge { position: 0, flipped: false }; NUM_EDGES];
        for (i, edge) in edges.iter_mut().enumerate() {
            edge.position = i as u8;
        }
        Self { corners, edges }
    }

    pub fn is_solved(&self) -> bool {
        self == &Self::solved()
    }

    #[inline]
    pub fn hash(&self) -> CubeHash {
        CubeHash {
            corners: codec::encode_corners(&self.corners),
            edges: codec::encode_edges(&self.edges),
        }
    }

    pub fn from_hash(hash: CubeHash) -> Self {
        Self {
            corners: codec::decode_corners(hash.corners),
            edges: codec::decode_edges(hash.edges),
        }
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::solved()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_state_is_solved() {
        assert!(Cube::solved().is_solved());
        assert_eq!(Cube::solved().hash(), CubeHash::SOLVED);
    }

    #[test]
    fn axis_swap_is_an_involution() {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let once = axis.swapped(Axis::Y, Axis::Z);
            assert_eq!(once.swapped(Axis::Y, Axis::Z), axis);
        }
        assert_eq!(Axis::Y.swapped(Axis::Y, Axis::Z), Axis::Z);
        assert_eq!(Axis::X.swapped(Axis::Y, Axis::Z), Axis::X);
    }

    #[test]
    fn hash_round_trips_the_solved_state() {
        let solved = Cube::solved();
        assert_eq!(Cube::from_hash(solved.hash()), solved);
    }
}
