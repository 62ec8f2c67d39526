//! The eighteen rotations and how they act on a state.
//!
//! Each rotation is a permutation of the corner and edge slots (tables below,
//! -1 marking an untouched slot), an axis swap applied to everything
//! axis-valued on the moved pieces, and a flag saying whether moved edges
//! change orientation. Slice rotations are the combined opposite-face pairs
//! (M = R L', E = U D', S = F' B) and are listed after the face rotations;
//! they exist as single moves because their destinations are reachable even
//! when neither component face turn is.

use std::fmt;

use enum_iterator::Sequence;

use crate::cube::{Axis, Cube, NUM_CORNERS, NUM_EDGES};

pub const NUM_ROTATIONS: usize = 18;
pub const NUM_FACE_ROTATIONS: usize = 12;

#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Sequence)]
#[repr(u8)]
pub enum Rotation {
    R,
    Rp,
    L,
    Lp,
    U,
    Up,
    D,
    Dp,
    F,
    Fp,
    B,
    Bp,
    M,
    Mp,
    E,
    Ep,
    S,
    Sp,
}

// where a corner at a given position ends up, -1 for "stays put"
#[rustfmt::skip]
const CORNER_TARGET: [[i8; NUM_CORNERS]; NUM_ROTATIONS] = [
    [ 4, -1,  0, -1,  6, -1,  2, -1], // R
    [ 2, -1,  6, -1,  0, -1,  4, -1], // R'
    [-1,  3, -1,  7, -1,  1, -1,  5], // L
    [-1,  5, -1,  1, -1,  7, -1,  3], // L'
    [ 1,  5, -1, -1,  0,  4, -1, -1], // U
    [ 4,  0, -1, -1,  5,  1, -1, -1], // U'
    [-1, -1,  6,  2, -1, -1,  7,  3], // D
    [-1, -1,  3,  7, -1, -1,  2,  6], // D'
    [ 2,  0,  3,  1, -1, -1, -1, -1], // F
    [ 1,  3,  0,  2, -1, -1, -1, -1], // F'
    [-1, -1, -1, -1,  5,  7,  4,  6], // B
    [-1, -1, -1, -1,  6,  4,  7,  5], // B'
    [ 4,  5,  0,  1,  6,  7,  2,  3], // M  =  R  L'
    [ 2,  3,  6,  7,  0,  1,  4,  5], // M' =  R' L
    [ 1,  5,  3,  7,  0,  4,  2,  6], // E  =  U  D'
    [ 4,  0,  6,  2,  5,  1,  7,  3], // E' =  U' D
    [ 1,  3,  0,  2,  5,  7,  4,  6], // S  =  F' B
    [ 2,  0,  3,  1,  6,  4,  7,  5], // S' =  F  B'
];

// same for edge positions
#[rustfmt::skip]
const EDGE_TARGET: [[i8; NUM_EDGES]; NUM_ROTATIONS] = [
    [ 2,  0,  3,  1, -1, -1, -1, -1, -1, -1, -1, -1], // R
    [ 1,  3,  0,  2, -1, -1, -1, -1, -1, -1, -1, -1], // R'
    [-1, -1, -1, -1, -1, -1, -1, -1,  9, 11,  8, 10], // L
    [-1, -1, -1, -1, -1, -1, -1, -1, 10,  8, 11,  9], // L'
    [ 4, -1, -1, -1,  8,  0, -1, -1,  5, -1, -1, -1], // U
    [ 5, -1, -1, -1,  0,  8, -1, -1,  4, -1, -1, -1], // U'
    [-1, -1, -1,  7, -1, -1,  3, 11, -1, -1, -1,  6], // D
    [-1, -1, -1,  6, -1, -1, 11,  3, -1, -1, -1,  7], // D'
    [-1,  6, -1, -1,  1, -1,  9, -1, -1,  4, -1, -1], // F
    [-1,  4, -1, -1,  9, -1,  1, -1, -1,  6, -1, -1], // F'
    [-1, -1,  5, -1, -1, 10, -1,  2, -1, -1,  7, -1], // B
    [-1, -1,  7, -1, -1,  2, -1, 10, -1, -1,  5, -1], // B'
    [ 2,  0,  3,  1, -1, -1, -1, -1, 10,  8, 11,  9], // M  =  R  L'
    [ 1,  3,  0,  2, -1, -1, -1, -1,  9, 11,  8, 10], // M' =  R' L
    [ 4, -1, -1,  6,  8,  0, 11,  3,  5, -1, -1,  7], // E  =  U  D'
    [ 5, -1, -1,  7,  0,  8,  3, 11,  4, -1, -1,  6], // E' =  U' D
    [-1,  4,  5, -1,  9, 10,  1,  2, -1,  6,  7, -1], // S  =  F' B
    [-1,  6,  7, -1,  1,  2,  9, 10, -1,  4,  5, -1], // S' =  F  B'
];

impl Rotation {
    /// All rotations in their canonical enumeration order, inverse pairs
    /// adjacent.
    pub const ALL: [Rotation; NUM_ROTATIONS] = [
        Rotation::R,
        Rotation::Rp,
        Rotation::L,
        Rotation::Lp,
        Rotation::U,
        Rotation::Up,
        Rotation::D,
        Rotation::Dp,
        Rotation::F,
        Rotation::Fp,
        Rotation::B,
        Rotation::Bp,
        Rotation::M,
        Rotation::Mp,
        Rotation::E,
        Rotation::Ep,
        Rotation::S,
        Rotation::Sp,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn from_index(index: usize) -> Rotation {
        Self::ALL[index]
    }

    /// Inverse pairs sit at adjacent indices.
    #[inline(always)]
    pub fn inverse(self) -> Rotation {
        Self::ALL[self as usize ^ 1]
    }

    #[inline(always)]
    pub fn is_face_rotation(self) -> bool {
        (self as usize) < NUM_FACE_ROTATIONS
    }

    /// Bit in the six-bit legal-move mask guarding this rotation, or `None`
    /// for the always-available slice rotations. Opposite faces share a bit
    /// per direction: R and L read bit 0, R' and L' bit 1, and so on through
    /// F'/B' at bit 5.
    #[inline(always)]
    pub fn legal_bit(self) -> Option<u8> {
        if !self.is_face_rotation() {
            return None;
        }
        let i = self as usize;
        if i % 4 <= 1 {
            Some((i / 2 + i % 4) as u8)
        } else {
            Some((i / 2 + i % 4 - 3) as u8)
        }
    }

    /// The offline generator checks the geometry for R, R', U, U', F and F'
    /// and lets the opposite face of each inherit the resulting bit.
    #[inline(always)]
    pub fn checks_legality(self) -> bool {
        self.is_face_rotation() && (self as usize) % 4 <= 1
    }

    /// The two axes this rotation exchanges on every moved piece.
    #[inline(always)]
    pub fn axis_swap(self) -> (Axis, Axis) {
        use Rotation::*;
        match self {
            R | Rp | L | Lp | M | Mp => (Axis::Y, Axis::Z),
            U | Up | D | Dp | E | Ep => (Axis::X, Axis::Z),
            F | Fp | B | Bp | S | Sp => (Axis::X, Axis::Y),
        }
    }

    /// Moved edges change orientation except under the U, D and E families,
    /// which keep every edge in its own axis plane.
    #[inline(always)]
    pub fn flips_edges(self) -> bool {
        use Rotation::*;
        !matches!(self, U | Up | D | Dp | E | Ep)
    }

    #[inline(always)]
    pub fn corner_target(self, position: u8) -> Option<u8> {
        let target = CORNER_TARGET[self as usize][position as usize];
        (target >= 0).then_some(target as u8)
    }

    #[inline(always)]
    pub fn edge_target(self, position: u8) -> Option<u8> {
        let target = EDGE_TARGET[self as usize][position as usize];
        (target >= 0).then_some(target as u8)
    }

    /// Apply this rotation to a copy of the state.
    pub fn apply(self, cube: &Cube) -> Cube {
        let mut next = *cube;
        let (a, b) = self.axis_swap();

        for corner in next.corners.iter_mut() {
            if let Some(target) = self.corner_target(corner.position) {
                corner.position = target;
                corner.orientation = corner.orientation.swapped(a, b);
            }
        }

        let flips = self.flips_edges();
        for edge in next.edges.iter_mut() {
            if let Some(target) = self.edge_target(edge.position) {
                edge.position = target;
                edge.flipped ^= flips;
            }
        }

        next
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rotation::R => "R",
            Rotation::Rp => "R'",
            Rotation::L => "L",
            Rotation::Lp => "L'",
            Rotation::U => "U",
            Rotation::Up => "U'",
            Rotation::D => "D",
            Rotation::Dp => "D'",
            Rotation::F => "F",
            Rotation::Fp => "F'",
            Rotation::B => "B",
            Rotation::Bp => "B'",
            Rotation::M => "M",
            Rotation::Mp => "M'",
            Rotation::E => "E",
            Rotation::Ep => "E'",
            Rotation::S => "S",
            Rotation::Sp => "S'",
        };
        write!(f, "{name}")
    }
}

/// Rotations available under a legal-move mask, in enumeration order. Slice
/// rotations carry no mask bit and always pass.
pub fn legal_rotations(mask: u8) -> impl Iterator<Item = Rotation> {
    Rotation::ALL.into_iter().filter(move |rotation| match rotation.legal_bit() {
        Some(bit) => mask >> bit & 1 == 1,
        None => true,
    })
}
