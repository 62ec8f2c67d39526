//! Bounded parallel best-first search from a scrambled state.
//!
//! Workers pull states off a bucketed frontier ordered by
//! `f = heuristic + depth + visit_count` and stop the moment a state on the
//! tablebase's outer layer is found to beat the best known prefix. The
//! visit count is a small re-expansion budget: a state is re-enqueued up to
//! four times at ever higher priority, and on re-visits only successors
//! whose f exactly matches are admitted. That gives the heuristic a small
//! error allowance without letting re-expansion run away, at the price of
//! not guaranteeing optimality; the result is the shortest solution found
//! within the node budget.
//!
//! The final solution is the visited-map walk from the best frontier entry
//! back to the scramble (inverting each incoming rotation), followed by the
//! tablebase retrograde from that entry down to solved.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU32, AtomicU64, Ordering};

use crossbeam::queue::SegQueue;
use parking_lot::Mutex;

use crate::concurrent::ShardedMap;
use crate::cube::{Cube, CubeHash};
use crate::errors::SolveError;
use crate::heuristic::HeuristicTables;
use crate::rotation::Rotation;
use crate::tablebase::Tablebase;

/// Branches deeper than this are abandoned; only a broken heuristic would
/// ever push a search there.
const MAX_SEARCH_DEPTH: u8 = 100;
/// How many times a state may be re-admitted to the frontier.
const MAX_VISITS: u8 = 4;
/// Priority buckets; f values stay far below this.
const NUM_BUCKETS: usize = 256;

pub struct SolverConfig {
    pub threads: usize,
    /// Node budget per solve.
    pub max_positions: u64,
    /// Stop early once a total solution no longer than this is known;
    /// zero disables the shortcut.
    pub min_depth: usize,
}

pub struct Solution {
    /// Rotations in application order; replaying them from the scramble
    /// reaches the solved state.
    pub rotations: Vec<Rotation>,
    /// Positions expanded while searching.
    pub positions: u64,
}

#[derive(Copy, Clone, Debug)]
struct SearchNode {
    hash: CubeHash,
    depth: u8,
    /// f at admission time: heuristic + depth + visit count.
    priority: u8,
    visits: u8,
}

#[derive(Copy, Clone)]
struct Visit {
    depth: u8,
    /// Rotation that produced this state; `None` only for the scramble.
    incoming: Option<Rotation>,
}

struct SearchContext<'a> {
    tables: &'a HeuristicTables,
    tablebase: &'a Tablebase,
    visited: ShardedMap<CubeHash, Visit>,
    frontier: Vec<SegQueue<SearchNode>>,
    /// Nodes enqueued or still being expanded; zero means the search is
    /// drained.
    frontier_len: AtomicI64,
    positions: AtomicU64,
    best_depth: AtomicU32,
    best_entry: Mutex<Option<CubeHash>>,
    /// External shutdown, shared with the action sink.
    stop: &'a AtomicBool,
    /// Internal early-out for the min-depth shortcut.
    done: AtomicBool,
    max_positions: u64,
    min_depth: u32,
    tablebase_depth: u32,
}

/// Solve one scramble. The scramble must be a legal, reachable state; the
/// search only ever applies rotations the legal-move mask allows, so every
/// intermediate state of the returned solution is legal too.
pub fn solve(
    start: &Cube,
    tables: &HeuristicTables,
    tablebase: &Tablebase,
    config: &SolverConfig,
    stop: &AtomicBool,
) -> Result<Solution, SolveError> {
    let mut positions: u64 = 0;
    let start_hash = start.hash();

    // a start already covered by the tablebase needs no search at all
    if tablebase.depth_of(&start_hash).is_some() {
        let rotations = tablebase
            .retrograde_solve(start, tables, tablebase.depth(), &mut positions)
            .ok_or(SolveError::NoSolution { budget: config.max_positions })?;
        return Ok(Solution { rotations, positions });
    }

    let ctx = SearchContext {
        tables,
        tablebase,
        visited: ShardedMap::new(),
        frontier: (0..NUM_BUCKETS).map(|_| SegQueue::new()).collect(),
        frontier_len: AtomicI64::new(0),
        positions: AtomicU64::new(0),
        best_depth: AtomicU32::new(u32::MAX),
        best_entry: Mutex::new(None),
        stop,
        done: AtomicBool::new(false),
        max_positions: config.max_positions,
        min_depth: config.min_depth as u32,
        tablebase_depth: tablebase.depth() as u32,
    };

    ctx.visited.upsert_if(start_hash, Visit { depth: 0, incoming: None }, |_| true);
    ctx.enqueue(SearchNode {
        hash: start_hash,
        depth: 0,
        priority: bucket_of(u32::from(tables.heuristic(start))),
        visits: 0,
    });

    std::thread::scope(|scope| {
        for _ in 0..config.threads.max(1) {
            scope.spawn(|| ctx.worker());
        }
    });

    positions += ctx.positions.load(Ordering::Relaxed);

    let best_entry = ctx.best_entry.lock().take();
    let Some(best_hash) = best_entry else {
        return Err(SolveError::NoSolution { budget: config.max_positions });
    };

    // prefix: invert incoming rotations back to the scramble
    let best_cube = Cube::from_hash(best_hash);
    let mut prefix = Vec::new();
    let mut cursor = best_cube;
    let mut cursor_hash = best_hash;
    while cursor_hash != start_hash {
        let visit = ctx
            .visited
            .get(&cursor_hash)
            .expect("visited entries chain back to the scramble");
        let rotation = visit.incoming.expect("only the scramble has no incoming rotation");
        prefix.push(rotation);
        cursor = rotation.inverse().apply(&cursor);
        cursor_hash = cursor.hash();
    }
    prefix.reverse();

    // suffix: exact walk down the tablebase layers
    let suffix = tablebase
        .retrograde_solve(&best_cube, tables, tablebase.depth(), &mut positions)
        .expect("the best entry lies on the tablebase frontier");
    prefix.extend(suffix);

    Ok(Solution { rotations: prefix, positions })
}

#[inline]
fn bucket_of(f: u32) -> u8 {
    f.min(NUM_BUCKETS as u32 - 1) as u8
}

impl SearchContext<'_> {
    fn enqueue(&self, node: SearchNode) {
        self.frontier_len.fetch_add(1, Ordering::SeqCst);
        self.frontier[node.priority as usize].push(node);
    }

    fn try_dequeue(&self) -> Option<SearchNode> {
        self.frontier.iter().find_map(|queue| queue.pop())
    }

    fn worker(&self) {
        loop {
            if self.stop.load(Ordering::Relaxed) || self.done.load(Ordering::Relaxed) {
                return;
            }
            if self.positions.load(Ordering::Relaxed) >= self.max_positions {
                return;
            }

            let Some(node) = self.try_dequeue() else {
                if self.frontier_len.load(Ordering::SeqCst) == 0 {
                    return;
                }
                // someone is still expanding; their successors may land soon
                std::hint::spin_loop();
                continue;
            };

            self.positions.fetch_add(1, Ordering::Relaxed);
            self.expand(node);
            self.frontier_len.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn expand(&self, node: SearchNode) {
        let cube = Cube::from_hash(node.hash);
        let heuristic = u32::from(self.tables.heuristic(&cube));
        let depth = u32::from(node.depth);

        // reaching the outer layer costs at least h - D more moves; prune
        // anything that cannot beat the best known prefix
        if depth + heuristic.saturating_sub(self.tablebase_depth)
            >= self.best_depth.load(Ordering::Relaxed)
        {
            return;
        }

        if self.tablebase.contains_outer(&node.hash) {
            let mut best = self.best_entry.lock();
            if depth < self.best_depth.load(Ordering::Relaxed) {
                self.best_depth.store(depth, Ordering::Relaxed);
                *best = Some(node.hash);
                if self.min_depth > 0 && depth + self.tablebase_depth <= self.min_depth {
                    self.done.store(true, Ordering::Relaxed);
                }
            }
        }

        if node.depth >= MAX_SEARCH_DEPTH {
            return;
        }

        // a better path to this state has been found since it was queued
        if let Some(visit) = self.visited.get(&node.hash) {
            if visit.depth < node.depth {
                return;
            }
        }

        let f = u32::from(node.priority);
        for rotation in self.tables.legal_rotations(&cube) {
            let next = rotation.apply(&cube);
            let next_hash = next.hash();
            let next_depth = node.depth + 1;
            let next_f = u32::from(self.tables.heuristic(&next)) + u32::from(next_depth);

            if let Some(visit) = self.visited.get(&next_hash) {
                if visit.depth <= next_depth {
                    continue;
                }
            }

            // first visit spends the error budget, re-visits only follow
            // exact-f successors
            let admit = if node.visits == 0 { next_f <= f } else { next_f == f };
            if !admit {
                continue;
            }

            let improved = self.visited.upsert_if(
                next_hash,
                Visit { depth: next_depth, incoming: Some(rotation) },
                |old| next_depth < old.depth,
            );
            if improved {
                self.enqueue(SearchNode {
                    hash: next_hash,
                    depth: next_depth,
                    priority: bucket_of(next_f),
                    visits: 0,
                });
            }
        }

        if node.visits < MAX_VISITS {
            self.enqueue(SearchNode {
                priority: bucket_of(f + 1),
                visits: node.visits + 1,
                ..node
            });
        }
    }
}
