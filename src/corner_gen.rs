//! Offline generator for the corner table.
//!
//! One exhaustive BFS over the corner projection of the state space. Every
//! reached state gets a 16-bit entry: the low six bits say which face-turn
//! classes are geometrically available there, the upper ten bits hold the
//! BFS depth from solved. The six classes are checked on R, R', U, U', F and
//! F'; the opposite face of each pair shares the bit, and slice rotations
//! are always taken.
//!
//! The queue carries `(corner_hash, protrusion_hash, depth)` and the state
//! is rebuilt on pop, so the table array itself is the visited set: 0 means
//! untouched, `PENDING` means queued, anything else is final.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::codec;
use crate::rotation::Rotation;
use crate::shape;

pub const FILE_NAME: &str = "corner-data.bin";

/// Queued-but-not-expanded marker. Real entries never collide with it: the
/// mask occupies six bits and depths stay far below 1023.
pub const PENDING: u16 = u16::MAX;

pub const DEPTH_SHIFT: u32 = 6;
pub const LEGAL_MASK: u16 = (1 << DEPTH_SHIFT) - 1;

struct Queued {
    hash: u32,
    protrusions: u32,
    depth: u16,
}

/// Run the full BFS. Takes a few minutes and roughly 1.5 GB of queue at the
/// widest layers; this is the offline half of the system.
pub fn generate() -> Vec<u16> {
    let mut table = vec![0u16; codec::CORNER_STATES as usize];

    let start = shape::solved();
    let mut queue = VecDeque::new();
    queue.push_back(Queued {
        hash: shape::corner_hash(&start),
        protrusions: shape::protrusion_hash(&start),
        depth: 0,
    });
    table[0] = PENDING;

    let mut expanded: u64 = 0;
    while let Some(Queued { hash, protrusions, depth }) = queue.pop_front() {
        let current = shape::decode(hash, protrusions);

        let mut legal_moves: u16 = 0;
        for rotation in Rotation::ALL {
            let next = shape::rotate(&current, rotation);

            if let Some(bit) = rotation.legal_bit() {
                if rotation.checks_legality() {
                    if !shape::is_legal(&next) {
                        continue;
                    }
                    legal_moves |= 1 << bit;
                } else if legal_moves >> bit & 1 == 0 {
                    // the opposite face already failed the geometry check
                    continue;
                }
            }

            let next_hash = shape::corner_hash(&next);
            if table[next_hash as usize] == 0 {
                table[next_hash as usize] = PENDING;
                queue.push_back(Queued {
                    hash: next_hash,
                    protrusions: shape::protrusion_hash(&next),
                    depth: depth + 1,
                });
            }
        }

        table[hash as usize] = legal_moves | depth << DEPTH_SHIFT;

        expanded += 1;
        if expanded % 100_000 == 0 {
            log::debug!(
                "corner bfs: depth {depth}, {expanded} expanded, {} queued ({} MB queue)",
                queue.len(),
                queue.len() * std::mem::size_of::<Queued>() / 1_000_000
            );
        }
    }

    log::info!("corner bfs finished with {expanded} reachable states");
    table
}

/// Persist as raw little-endian 16-bit values, exactly one per state.
pub fn save(table: &[u16], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for &entry in table {
        writer.write_all(&entry.to_le_bytes())?;
    }
    writer.flush()
}

/// Depth distribution and branching summary of a generated table.
pub fn report_statistics(table: &[u16]) {
    let mut reached: u64 = 0;
    let mut max_depth: u16 = 0;
    let mut per_depth = [0u64; 64];
    let mut per_depth_moves = [0u64; 64];

    for &entry in table {
        if entry == 0 {
            continue;
        }
        reached += 1;
        let depth = entry >> DEPTH_SHIFT;
        max_depth = max_depth.max(depth);
        per_depth[depth as usize] += 1;
        per_depth_moves[depth as usize] += u64::from((entry & LEGAL_MASK).count_ones());
    }

    log::info!("number of positions: {reached}");
    log::info!("max heuristic: {max_depth}");
    for depth in 0..=max_depth as usize {
        let count = per_depth[depth];
        if count == 0 {
            continue;
        }
        // each mask bit covers a pair of face turns, slices are always open
        let average_moves = per_depth_moves[depth] as f64 * 2.0 / count as f64 + 6.0;
        log::info!("{depth}: {count} positions, {average_moves:.2} legal moves on average");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solved_shape_hashes_to_zero() {
        assert_eq!(shape::corner_hash(&shape::solved()), 0);
    }

    #[test]
    fn pending_marker_cannot_be_a_real_entry() {
        // 63 legal-move bits plus the deepest representable depth still
        // leaves the all-ones pattern unused by real states
        let deepest_entry = LEGAL_MASK | 1000 << DEPTH_SHIFT;
        assert_ne!(deepest_entry, PENDING);
    }

    // Full-space checks live behind `--ignored`; the BFS walks 8.8e7 states.
    #[test]
    #[ignore = "walks the whole corner space, takes minutes"]
    fn generated_table_has_the_documented_solved_entry() {
        let table = generate();
        // depth zero and all six rotation classes available at solved
        assert_eq!(table[0] >> DEPTH_SHIFT, 0);
        assert_eq!(table[0] & LEGAL_MASK, LEGAL_MASK);

        // walk a few hundred states following the table's own mask: every
        // reached state must be recorded, neighbouring depths differ by at
        // most one, and slice destinations never violate the geometry even
        // though no mask bit guards them
        let mut current = shape::solved();
        let mut previous_depth = 0i32;
        for step in 0..300usize {
            let entry = table[shape::corner_hash(&current) as usize];
            assert_ne!(entry, 0, "reached state must be in the table");
            let depth = (entry >> DEPTH_SHIFT) as i32;
            assert!((depth - previous_depth).abs() <= 1);
            previous_depth = depth;

            let mask = (entry & LEGAL_MASK) as u8;
            let legal: Vec<Rotation> = crate::rotation::legal_rotations(mask).collect();
            let rotation = legal[step % legal.len()];
            let next = shape::rotate(&current, rotation);
            assert!(shape::is_legal(&next), "{rotation} led into an impossible state");
            current = next;
        }
    }
}
