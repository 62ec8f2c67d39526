//! Random legal scrambles.
//!
//! Every scramble rotation is drawn uniformly from the rotations legal in
//! the current state, so a scramble can never pass through a geometrically
//! impossible position. The driver seeds the generator (zero by default)
//! to keep scramble sequences reproducible across runs.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::actions::{Action, Actions};
use crate::cube::Cube;
use crate::heuristic::HeuristicTables;
use crate::rotation::Rotation;

/// One uniformly random legal rotation for the current state.
pub fn random_rotation<R: Rng>(rng: &mut R, tables: &HeuristicTables, cube: &Cube) -> Rotation {
    let legal: Vec<Rotation> = tables.legal_rotations(cube).collect();
    *legal.choose(rng).expect("slice rotations are always legal")
}

/// Scramble in place with `depth` random legal rotations, continuing past
/// the requested depth until the corner heuristic reaches `heuristic_floor`
/// (zero disables the floor). Rotations are mirrored into the sink when one
/// is given. Returns how many rotations were applied.
pub fn scramble<R: Rng>(
    rng: &mut R,
    tables: &HeuristicTables,
    cube: &mut Cube,
    depth: usize,
    heuristic_floor: u16,
    sink: Option<&Actions>,
) -> u64 {
    let mut total: u64 = 0;
    while total < depth as u64 || tables.corner_heuristic(cube) < heuristic_floor {
        let rotation = random_rotation(rng, tables, cube);
        if let Some(actions) = sink {
            actions.push(Action::Rotation(rotation));
        }
        *cube = rotation.apply(cube);
        total += 1;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristic::test_support::permissive;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_depth_leaves_the_cube_solved() {
        let tables = permissive();
        let mut rng = StdRng::seed_from_u64(0);
        let mut cube = Cube::solved();
        let applied = scramble(&mut rng, tables, &mut cube, 0, 0, None);
        assert_eq!(applied, 0);
        assert!(cube.is_solved());
    }

    #[test]
    fn fixed_seed_gives_a_reproducible_scramble() {
        let tables = permissive();
        let mut first_rng = StdRng::seed_from_u64(0);
        let mut second_rng = StdRng::seed_from_u64(0);
        let mut first = Cube::solved();
        let mut second = Cube::solved();

        assert_eq!(scramble(&mut first_rng, tables, &mut first, 25, 0, None), 25);
        assert_eq!(scramble(&mut second_rng, tables, &mut second, 25, 0, None), 25);
        assert_eq!(first, second);

        let mut other = Cube::solved();
        let mut other_rng = StdRng::seed_from_u64(1);
        scramble(&mut other_rng, tables, &mut other, 25, 0, None);
        assert_ne!(first, other);
    }

    #[test]
    fn scramble_rotations_land_in_the_sink() {
        let tables = permissive();
        let mut rng = StdRng::seed_from_u64(0);
        let mut cube = Cube::solved();
        let actions = Actions::new();

        let applied = scramble(&mut rng, tables, &mut cube, 5, 0, Some(&actions));
        assert_eq!(applied, 5);

        // replaying the sink contents reproduces the scrambled state
        let mut replay = Cube::solved();
        while let Some(action) = actions.try_pop() {
            match action {
                Action::Rotation(rotation) => replay = rotation.apply(&replay),
                other => panic!("unexpected action {other:?}"),
            }
        }
        assert_eq!(replay, cube);
    }
}
