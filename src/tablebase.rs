//! Layered tablebase grown outward from the solved state.
//!
//! Layer `k` holds exactly the states at distance `k` from solved under the
//! legality-aware move set, so membership answers "how far is this state"
//! with certainty, and walking strictly downhill through the layers yields
//! an exact solution from any contained state. Growth runs once per
//! process; finalized layers never change.

use std::time::Instant;

use rayon::prelude::*;

use crate::concurrent::ShardedSet;
use crate::cube::{Cube, CubeHash};
use crate::heuristic::HeuristicTables;
use crate::rotation::Rotation;

pub struct Tablebase {
    layers: Vec<ShardedSet<CubeHash>>,
}

impl Tablebase {
    /// Start with layer zero, the solved state alone.
    pub fn new() -> Self {
        let solved = ShardedSet::new();
        solved.insert(CubeHash::SOLVED);
        Self { layers: vec![solved] }
    }

    /// Current exact-coverage radius.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Grow until states at distance `depth` are covered. A second call with
    /// the same target is a no-op.
    pub fn grow_to(&mut self, depth: usize, tables: &HeuristicTables) {
        if self.depth() >= depth {
            return;
        }

        let start_time = Instant::now();
        log::info!("growing tablebase from depth {} to {depth}", self.depth());

        while self.depth() < depth {
            let current = self.layers.len() - 1;
            let next = ShardedSet::new();
            let frontier = self.layers[current].snapshot();

            frontier.par_iter().for_each(|&hash| {
                let cube = Cube::from_hash(hash);
                for rotation in tables.legal_rotations(&cube) {
                    let next_hash = rotation.apply(&cube).hash();
                    if next.contains(&next_hash)
                        || self.layers[current].contains(&next_hash)
                        || (current > 0 && self.layers[current - 1].contains(&next_hash))
                    {
                        continue;
                    }
                    next.insert(next_hash);
                }
            });

            log::debug!("tablebase layer {} holds {} states", current + 1, next.len());
            self.layers.push(next);
        }

        log::info!(
            "tablebase grown to depth {depth} in {:.2} seconds",
            start_time.elapsed().as_secs_f64()
        );
    }

    /// Is the state on the outermost layer?
    pub fn contains_outer(&self, hash: &CubeHash) -> bool {
        self.layers.last().is_some_and(|layer| layer.contains(hash))
    }

    /// Exact distance from solved, if the state is covered. The number of
    /// layers is small, so a linear scan is fine.
    pub fn depth_of(&self, hash: &CubeHash) -> Option<u8> {
        self.layers.iter().position(|layer| layer.contains(hash)).map(|depth| depth as u8)
    }

    /// Exact solution from a covered state: depth-first descent taking the
    /// first rotation (in canonical order) whose destination sits one layer
    /// closer to solved. The path has length `depth_of(state)` and is the
    /// lexicographically first such path.
    pub fn retrograde_solve(
        &self,
        cube: &Cube,
        tables: &HeuristicTables,
        max_depth: usize,
        positions: &mut u64,
    ) -> Option<Vec<Rotation>> {
        let mut path = Vec::new();
        if self.descend(cube, tables, max_depth as i32, &mut path, positions) {
            Some(path)
        } else {
            None
        }
    }

    fn descend(
        &self,
        cube: &Cube,
        tables: &HeuristicTables,
        budget: i32,
        path: &mut Vec<Rotation>,
        positions: &mut u64,
    ) -> bool {
        *positions += 1;
        let Some(depth) = self.depth_of(&cube.hash()) else {
            return false;
        };
        let depth = i32::from(depth);
        if depth > budget {
            return false;
        }
        if depth == 0 {
            return true;
        }

        for rotation in tables.legal_rotations(cube) {
            let next = rotation.apply(cube);
            path.push(rotation);
            if self.descend(&next, tables, depth - 1, path, positions) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Total states across all layers; layers are disjoint by construction.
    pub fn total_states(&self) -> usize {
        self.layers.iter().map(|layer| layer.len()).sum()
    }
}

impl Default for Tablebase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::test_support::permissive;
    use ahash::HashSet;
    use std::collections::VecDeque;

    #[test]
    fn layer_one_holds_every_single_move_state() {
        let tables = permissive();
        let mut tablebase = Tablebase::new();
        tablebase.grow_to(1, tables);

        let mut expected = HashSet::default();
        for rotation in Rotation::ALL {
            expected.insert(rotation.apply(&Cube::solved()).hash());
        }

        assert_eq!(tablebase.depth(), 1);
        assert_eq!(tablebase.depth_of(&CubeHash::SOLVED), Some(0));
        assert_eq!(tablebase.layers[1].len(), expected.len());
        for hash in expected {
            assert_eq!(tablebase.depth_of(&hash), Some(1));
            assert!(tablebase.contains_outer(&hash));
        }
    }

    #[test]
    fn grow_to_is_idempotent() {
        let tables = permissive();
        let mut tablebase = Tablebase::new();
        tablebase.grow_to(2, tables);
        let sizes: Vec<usize> = tablebase.layers.iter().map(|layer| layer.len()).collect();
        tablebase.grow_to(2, tables);
        let again: Vec<usize> = tablebase.layers.iter().map(|layer| layer.len()).collect();
        assert_eq!(sizes, again);
    }

    #[test]
    fn layers_match_a_plain_bfs() {
        let tables = permissive();
        let mut tablebase = Tablebase::new();
        tablebase.grow_to(2, tables);

        // single-threaded reference count of distinct states within depth 2
        let mut seen = HashSet::default();
        let mut queue = VecDeque::new();
        seen.insert(Cube::solved().hash());
        queue.push_back((Cube::solved(), 0));
        while let Some((cube, depth)) = queue.pop_front() {
            if depth == 2 {
                continue;
            }
            for rotation in tables.legal_rotations(&cube) {
                let next = rotation.apply(&cube);
                if seen.insert(next.hash()) {
                    queue.push_back((next, depth + 1));
                }
            }
        }

        assert_eq!(tablebase.total_states(), seen.len());

        // layers are pairwise disjoint
        for hash in tablebase.layers[1].snapshot() {
            assert!(!tablebase.layers[0].contains(&hash));
            assert!(!tablebase.layers[2].contains(&hash));
        }
    }

    #[test]
    fn retrograde_walks_back_to_solved() {
        let tables = permissive();
        let mut tablebase = Tablebase::new();
        tablebase.grow_to(2, tables);

        let scrambled = Rotation::U.apply(&Rotation::R.apply(&Cube::solved()));
        assert_eq!(tablebase.depth_of(&scrambled.hash()), Some(2));

        let mut positions = 0;
        let path = tablebase
            .retrograde_solve(&scrambled, tables, tablebase.depth(), &mut positions)
            .expect("state is covered");
        assert_eq!(path.len(), 2);
        assert!(positions > 0);

        let mut replay = scrambled;
        for rotation in path {
            replay = rotation.apply(&replay);
        }
        assert!(replay.is_solved());
    }

    #[test]
    fn retrograde_from_solved_is_empty() {
        let tables = permissive();
        let tablebase = Tablebase::new();
        let mut positions = 0;
        let path = tablebase
            .retrograde_solve(&Cube::solved(), tables, 0, &mut positions)
            .expect("solved is always covered");
        assert!(path.is_empty());
        assert_eq!(positions, 1);
    }

    #[test]
    fn uncovered_states_have_no_depth() {
        let tables = permissive();
        let mut tablebase = Tablebase::new();
        tablebase.grow_to(1, tables);

        let mut far = Cube::solved();
        for rotation in [Rotation::R, Rotation::U, Rotation::F, Rotation::D] {
            far = rotation.apply(&far);
        }
        assert_eq!(tablebase.depth_of(&far.hash()), None);
        let mut positions = 0;
        assert!(tablebase
            .retrograde_solve(&far, tables, tablebase.depth(), &mut positions)
            .is_none());
    }
}
