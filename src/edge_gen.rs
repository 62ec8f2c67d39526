//! Offline generator for the two edge-projection tables.
//!
//! Each projection tracks six of the twelve edge pieces (the ones solved in
//! slots 0..6, or the ones solved in slots 6..12) and runs a BFS over all
//! eighteen rotations with no legality restriction. Dropping half the edges
//! and the legality check makes the projection a relaxation of the real
//! puzzle, so the recorded depth is a valid lower bound on true distance.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::codec::{self, PROJECTION_EDGES};
use crate::cube::Edge;
use crate::rotation::Rotation;

/// Never reached by the BFS; only hash values no real state decodes to keep
/// this marker after generation finishes.
pub const UNVISITED: u8 = 0xFF;
const PENDING: u8 = 0xFE;

/// Which six pieces the table tracks.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Projection {
    Low,
    High,
}

impl Projection {
    pub fn file_name(self) -> &'static str {
        match self {
            Projection::Low => "edge-data.bin",
            Projection::High => "edge-data-high.bin",
        }
    }

    fn start_slot(self) -> u8 {
        match self {
            Projection::Low => 0,
            Projection::High => PROJECTION_EDGES as u8,
        }
    }
}

type Tracked = [Edge; PROJECTION_EDGES];

fn rotate(tracked: &Tracked, rotation: Rotation) -> Tracked {
    let flips = rotation.flips_edges();
    let mut next = *tracked;
    for edge in next.iter_mut() {
        if let Some(target) = rotation.edge_target(edge.position) {
            edge.position = target;
            edge.flipped ^= flips;
        }
    }
    next
}

/// BFS the whole projection space and return depth-from-solved per hash.
pub fn generate(projection: Projection) -> Vec<u8> {
    let mut table = vec![UNVISITED; codec::EDGE_PROJECTION_STATES as usize];

    let start_slot = projection.start_slot();
    let start: Tracked =
        std::array::from_fn(|i| Edge { position: start_slot + i as u8, flipped: false });

    let mut queue: VecDeque<(Tracked, u8)> = VecDeque::new();
    queue.push_back((start, 0));
    table[codec::encode_edge_projection(&start) as usize] = PENDING;

    let mut expanded: u64 = 0;
    while let Some((tracked, depth)) = queue.pop_front() {
        for rotation in Rotation::ALL {
            let next = rotate(&tracked, rotation);
            let next_hash = codec::encode_edge_projection(&next) as usize;
            if table[next_hash] == UNVISITED {
                table[next_hash] = PENDING;
                queue.push_back((next, depth + 1));
            }
        }

        table[codec::encode_edge_projection(&tracked) as usize] = depth;

        expanded += 1;
        if expanded % 100_000 == 0 {
            log::debug!(
                "edge bfs ({projection:?}): depth {depth}, {expanded} expanded, {} queued",
                queue.len()
            );
        }
    }

    log::info!("edge bfs ({projection:?}) finished with {expanded} reachable states");
    table
}

/// Persist as raw 8-bit depth values, one per projection hash.
pub fn save(table: &[u8], path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(table)?;
    writer.flush()
}
