//! Protrusion geometry of the puppet cube.
//!
//! Corner piece `i` is oversized along the axes set in the bit pattern of
//! `i`: piece 0 is a normal corner, pieces 1, 2 and 4 stick out along one
//! axis, piece 7 along all three. A half of the cube can only turn when the
//! protrusions of its four corners clear the protrusions next to them, which
//! boils down to a 256-entry lookup per half-face.
//!
//! The online solver never needs any of this: it reads the six-bit legal-move
//! mask the offline generator bakes into the corner table. Protrusions only
//! live here, in the generator's corner representation.

use crate::codec;
use crate::cube::{Axis, Corner, NUM_CORNERS};
use crate::rotation::Rotation;

/// Protrusion masks run 0..8, three bits per corner.
pub const NUM_PROTRUSION_PATTERNS: u32 = 8;

/// A corner piece together with its protrusion mask (bit 0 = x, 1 = y,
/// 2 = z).
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug)]
pub struct ShapedCorner {
    pub corner: Corner,
    pub protruding: u8,
}

pub type ShapedCorners = [ShapedCorner; NUM_CORNERS];

/// Quadrant signatures that would make a half-face jam. A clear bit means
/// "this quadrant does not protrude along that perpendicular axis"; the
/// rejected patterns are the two opposing pairs along each perpendicular
/// axis and the two face diagonals.
const LEGAL_MAP: [bool; 256] = build_legal_map();

const fn build_legal_map() -> [bool; 256] {
    let mut map = [false; 256];
    let mut signature = 0;
    while signature < 256 {
        let m0 = signature & 0x01 == 0;
        let m1 = signature & 0x02 == 0;
        let m2 = signature & 0x04 == 0;
        let m3 = signature & 0x08 == 0;
        let m4 = signature & 0x10 == 0;
        let m5 = signature & 0x20 == 0;
        let m6 = signature & 0x40 == 0;
        let m7 = signature & 0x80 == 0;

        let jammed = (m0 && m4)
            || (m2 && m6)
            || (m1 && m3)
            || (m5 && m7)
            || (m0 && m1 && m6 && m7)
            || (m2 && m3 && m4 && m5);
        map[signature] = !jammed;
        signature += 1;
    }
    map
}

/// The solved assignment: piece `i` at position `i`, reference sticker on
/// the x axis, protruding along the bits of `i`.
pub fn solved() -> ShapedCorners {
    std::array::from_fn(|i| ShapedCorner {
        corner: Corner { position: i as u8, orientation: Axis::X },
        protruding: i as u8,
    })
}

// swap bit a with bit b
#[inline(always)]
fn swap_mask_bits(bits: u8, a: u8, b: u8) -> u8 {
    bits ^ (((bits >> a ^ bits >> b) & 1) * (1 << a | 1 << b))
}

/// Apply a rotation to the shaped corners: positions permute, and both the
/// orientation axis and the protrusion mask pick up the rotation's axis
/// swap on every moved piece.
pub fn rotate(corners: &ShapedCorners, rotation: Rotation) -> ShapedCorners {
    let (a, b) = rotation.axis_swap();
    let mut next = *corners;
    for piece in next.iter_mut() {
        if let Some(target) = rotation.corner_target(piece.corner.position) {
            piece.corner.position = target;
            piece.corner.orientation = piece.corner.orientation.swapped(a, b);
            piece.protruding = swap_mask_bits(piece.protruding, a.index(), b.index());
        }
    }
    next
}

/// Corner hash of the shaped state; protrusions are not part of the hash.
pub fn corner_hash(corners: &ShapedCorners) -> u32 {
    let plain: [Corner; NUM_CORNERS] = std::array::from_fn(|i| corners[i].corner);
    codec::encode_corners(&plain)
}

/// Pack the eight protrusion masks into one integer, piece 0 most
/// significant.
pub fn protrusion_hash(corners: &ShapedCorners) -> u32 {
    let mut hash = 0;
    for piece in corners {
        hash = hash * NUM_PROTRUSION_PATTERNS + u32::from(piece.protruding);
    }
    hash
}

/// Rebuild shaped corners from the two hashes the generator queues.
pub fn decode(corner_hash: u32, protrusion_hash: u32) -> ShapedCorners {
    let plain = codec::decode_corners(corner_hash);
    let mut protruding = [0u8; NUM_CORNERS];
    let mut rest = protrusion_hash;
    for mask in protruding.iter_mut().rev() {
        *mask = (rest % NUM_PROTRUSION_PATTERNS) as u8;
        rest /= NUM_PROTRUSION_PATTERNS;
    }
    std::array::from_fn(|i| ShapedCorner { corner: plain[i], protruding: protruding[i] })
}

// two signature bits per quadrant, the axes perpendicular to the face normal
fn signature(quadrants: &[u8; 4], axis: usize) -> usize {
    let mut hash = 0;
    for &mask in quadrants {
        for offset in 1..=2 {
            hash = hash << 1 | (mask >> ((axis + offset) % 3) & 1) as usize;
        }
    }
    hash
}

/// Geometric feasibility of a corner configuration: every one of the six
/// half-faces must show a signature the legal map accepts.
pub fn is_legal(corners: &ShapedCorners) -> bool {
    for axis in 0..3 {
        for side in 0..2u8 {
            // quadrants with no protruding corner act as fully protruding
            let mut quadrants = [NUM_PROTRUSION_PATTERNS as u8 - 1; 4];
            for piece in corners {
                let position = piece.corner.position;
                if position >> axis & 1 == side && piece.protruding >> axis & 1 == 1 {
                    let quadrant =
                        (position >> ((axis + 1) % 3) & 1) + (position >> ((axis + 2) % 3) & 1) * 2;
                    quadrants[quadrant as usize] = piece.protruding;
                }
            }
            if !LEGAL_MAP[signature(&quadrants, axis)] {
                return false;
            }
        }
    }
    true
}
