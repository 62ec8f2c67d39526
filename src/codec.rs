//! Canonical integer encodings of cube states.
//!
//! Permutations are ranked with Lehmer codes (count of smaller unused values
//! at each step, combined with a shrinking mixed radix) and orientations are
//! appended as a base-3 or base-2 number, so the solved state always encodes
//! to zero. Encoding and decoding are mutual inverses on the full domain;
//! a value at or past the domain size is a programming error, not a
//! recoverable condition.

use crate::cube::{Axis, Corner, Edge, NUM_CORNERS, NUM_EDGES};

/// 8! * 3^7, the corner state space.
pub const CORNER_STATES: u32 = 88_179_840;
pub const EIGHT_FACTORIAL: u32 = 40_320;

/// 12!/6! * 2^6, one six-edge projection.
pub const EDGE_PROJECTION_STATES: u32 = 42_577_920;
/// 12! * 2^12, the full edge space.
pub const EDGE_STATES: u64 = 1_961_990_553_600;
const TWELVE_FACTORIAL: u64 = 479_001_600;

/// Number of edges a projection tracks.
pub const PROJECTION_EDGES: usize = 6;

/// Rank the first seven corner positions (the eighth is forced) and pack the
/// first seven orientations on top as a base-3 number.
pub fn encode_corners(corners: &[Corner; NUM_CORNERS]) -> u32 {
    let mut hash = 0u32;
    let mut orientation_hash = 0u32;
    let mut used = [false; NUM_CORNERS];

    for (i, corner) in corners.iter().take(NUM_CORNERS - 1).enumerate() {
        hash *= (NUM_CORNERS - i) as u32;
        let mut rank = 0;
        for &other in used.iter().take(corner.position as usize) {
            rank += u32::from(!other);
        }
        used[corner.position as usize] = true;
        hash += rank;

        orientation_hash = orientation_hash * 3 + u32::from(corner.orientation.index());
    }

    let hash = hash + orientation_hash * EIGHT_FACTORIAL;
    debug_assert!(hash < CORNER_STATES);
    hash
}

/// Inverse of [`encode_corners`]. The eighth corner's orientation is not part
/// of the hash (the twist invariant pins it on reachable states); it comes
/// back as the canonical X axis.
pub fn decode_corners(hash: u32) -> [Corner; NUM_CORNERS] {
    debug_assert!(hash < CORNER_STATES);
    let mut corners = [Corner { position: 0, orientation: Axis::X }; NUM_CORNERS];

    let mut orientation_hash = hash / EIGHT_FACTORIAL;
    for i in (0..NUM_CORNERS - 1).rev() {
        corners[i].orientation = Axis::from_index((orientation_hash % 3) as u8);
        orientation_hash /= 3;
    }

    let mut position_hash = hash % EIGHT_FACTORIAL;
    let mut used = [false; NUM_CORNERS];
    let mut radix = EIGHT_FACTORIAL;
    for i in 0..NUM_CORNERS {
        radix /= (NUM_CORNERS - i) as u32;
        let mut rank = (position_hash / radix) as i32;
        position_hash %= radix;

        for (j, slot) in used.iter_mut().enumerate() {
            if !*slot {
                rank -= 1;
            }
            if rank == -1 {
                corners[i].position = j as u8;
                *slot = true;
                break;
            }
        }
    }

    corners
}

/// Rank all twelve edge positions, then shift in the twelve orientation bits.
pub fn encode_edges(edges: &[Edge; NUM_EDGES]) -> u64 {
    let mut hash = 0u64;
    let mut used = [false; NUM_EDGES];

    for (i, edge) in edges.iter().enumerate() {
        hash *= (NUM_EDGES - i) as u64;
        let mut rank = 0;
        for &other in used.iter().take(edge.position as usize) {
            rank += u64::from(!other);
        }
        used[edge.position as usize] = true;
        hash += rank;
    }

    for edge in edges {
        hash = hash << 1 | u64::from(edge.flipped);
    }

    debug_assert!(hash < EDGE_STATES);
    hash
}

/// Inverse of [`encode_edges`].
pub fn decode_edges(hash: u64) -> [Edge; NUM_EDGES] {
    debug_assert!(hash < EDGE_STATES);
    let mut edges = [Edge { position: 0, flipped: false }; NUM_EDGES];

    for (i, edge) in edges.iter_mut().enumerate() {
        edge.flipped = hash >> (NUM_EDGES - 1 - i) & 1 == 1;
    }

    let mut position_hash = hash >> NUM_EDGES;
    let mut used = [false; NUM_EDGES];
    let mut radix = TWELVE_FACTORIAL;
    for i in 0..NUM_EDGES {
        radix /= (NUM_EDGES - i) as u64;
        let mut rank = (position_hash / radix) as i64;
        position_hash %= radix;

        for (j, slot) in used.iter_mut().enumerate() {
            if !*slot {
                rank -= 1;
            }
            if rank == -1 {
                edges[i].position = j as u8;
                *slot = true;
                break;
            }
        }
    }

    edges
}

/// Rank six tracked edges (positions still drawn from all twelve slots) and
/// shift in their six orientation bits.
pub fn encode_edge_projection(tracked: &[Edge; PROJECTION_EDGES]) -> u32 {
    let mut hash = 0u32;
    let mut used = [false; NUM_EDGES];

    for (i, edge) in tracked.iter().enumerate() {
        hash *= (NUM_EDGES - i) as u32;
        let mut rank = 0;
        for &other in used.iter().take(edge.position as usize) {
            rank += u32::from(!other);
        }
        used[edge.position as usize] = true;
        hash += rank;
    }

    for edge in tracked {
        hash = hash << 1 | u32::from(edge.flipped);
    }

    debug_assert!(hash < EDGE_PROJECTION_STATES);
    hash
}

/// Projection over edge pieces 0..6.
#[inline]
pub fn encode_edge_projection_low(edges: &[Edge; NUM_EDGES]) -> u32 {
    let tracked: [Edge; PROJECTION_EDGES] = std::array::from_fn(|i| edges[i]);
    encode_edge_projection(&tracked)
}

/// Projection over edge pieces 6..12.
#[inline]
pub fn encode_edge_projection_high(edges: &[Edge; NUM_EDGES]) -> u32 {
    let tracked: [Edge; PROJECTION_EDGES] = std::array::from_fn(|i| edges[i + PROJECTION_EDGES]);
    encode_edge_projection(&tracked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::Cube;
    use crate::rotation::Rotation;
    use ahash::HashSet;

    #[test]
    fn solved_hashes_are_zero() {
        let solved = Cube::solved();
        assert_eq!(encode_corners(&solved.corners), 0);
        assert_eq!(encode_edges(&solved.edges), 0);
        assert_eq!(encode_edge_projection_low(&solved.edges), 0);
    }

    #[test]
    fn corner_decode_is_a_right_inverse() {
        // a spread of raw hash values, including both domain ends
        let samples = [
            0,
            1,
            39,
            40_320,
            1_234_567,
            40_319,
            77_777_777,
            CORNER_STATES - 1,
        ];
        for hash in samples {
            let corners = decode_corners(hash);
            assert_eq!(encode_corners(&corners), hash, "hash {hash}");

            // decode must hand back a permutation
            let mut seen = [false; NUM_CORNERS];
            for corner in &corners {
                assert!(!seen[corner.position as usize]);
                seen[corner.position as usize] = true;
            }
        }
    }

    #[test]
    fn edge_decode_is_a_right_inverse() {
        let samples = [0u64, 1, 4_095, 4_096, 987_654_321, EDGE_STATES - 1];
        for hash in samples {
            let edges = decode_edges(hash);
            assert_eq!(encode_edges(&edges), hash, "hash {hash}");
        }
    }

    #[test]
    fn scrambled_states_round_trip() {
        let mut cube = Cube::solved();
        for rotation in [
            Rotation::R,
            Rotation::U,
            Rotation::Fp,
            Rotation::M,
            Rotation::D,
            Rotation::Sp,
            Rotation::B,
            Rotation::Ep,
        ] {
            cube = rotation.apply(&cube);
            assert_eq!(decode_corners(encode_corners(&cube.corners)), cube.corners);
            assert_eq!(decode_edges(encode_edges(&cube.edges)), cube.edges);
        }
    }

    #[test]
    fn nearby_states_get_distinct_hashes() {
        // breadth-first to depth 3 with every rotation enabled; all hashes
        // must be distinct state keys
        let mut seen = HashSet::default();
        let mut frontier = vec![Cube::solved()];
        seen.insert(Cube::solved().hash());

        for _ in 0..3 {
            let mut next = Vec::new();
            for cube in frontier {
                for rotation in Rotation::ALL {
                    let neighbor = rotation.apply(&cube);
                    if seen.insert(neighbor.hash()) {
                        next.push(neighbor);
                    }
                }
            }
            frontier = next;
        }

        // every key decodes back to a cube with the same key
        for &key in &seen {
            let cube = Cube::from_hash(key);
            assert_eq!(cube.hash(), key);
        }
        assert!(seen.len() > 200);
    }

    #[test]
    fn projections_only_see_their_half() {
        let mut cube = Cube::solved();
        cube = Rotation::R.apply(&cube);
        // R only touches slots 0..4, which the low projection tracks
        assert_ne!(encode_edge_projection_low(&cube.edges), 0);
        let solved_high = encode_edge_projection_high(&Cube::solved().edges);
        assert_eq!(encode_edge_projection_high(&cube.edges), solved_high);
    }
}
