//! Solver core for the Puppet Cube V2, a 3x3x3 variant whose corner pieces
//! protrude past the edge pieces, so a face turn is only possible when the
//! protrusions on that face clear each other. Which moves are available
//! therefore depends on the current state, and the solver threads a
//! precomputed legal-move mask through everything it does.
//!
//! The pieces fit together like this:
//!
//! - offline generators ([`corner_gen`], [`edge_gen`]) run exhaustive BFS over
//!   projections of the state space and persist distance tables,
//! - the [`heuristic`] oracle loads those tables and answers `h(state)` plus
//!   "which rotations are legal here",
//! - the [`tablebase`] holds every state within a small exact distance of
//!   solved, grown once per process,
//! - the [`solver`] runs a bounded parallel best-first search from a scramble
//!   until it touches the tablebase frontier, then splices on a retrograde
//!   walk down the layers.

pub mod actions;
pub mod codec;
pub mod concurrent;
pub mod corner_gen;
pub mod cube;
pub mod edge_gen;
pub mod errors;
pub mod heuristic;
pub mod rotation;
pub mod scramble;
pub mod shape;
pub mod solver;
pub mod stats;
pub mod tablebase;
