//! Loads the precomputed tables and answers heuristic queries.
//!
//! Three tables back the oracle: the corner table (distance plus legal-move
//! mask) and the two edge-projection tables. Each is an exact distance in a
//! relaxation of the puzzle, so each is a lower bound on true distance and
//! so is their maximum. `h(solved) == 0`, and every answer is a pure
//! function of the state.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::codec;
use crate::corner_gen;
use crate::cube::Cube;
use crate::edge_gen::Projection;
use crate::errors::InitError;
use crate::rotation::{self, Rotation};

/// Directory under the root path holding the generated tables.
pub const DATA_DIR: &str = "position_data";

pub struct HeuristicTables {
    corner: Vec<u16>,
    edge_low: Vec<u8>,
    edge_high: Vec<u8>,
}

impl HeuristicTables {
    /// Load all three tables from `<root>/position_data/`. A missing file is
    /// fatal; a short file is a warning and the tail of the table stays
    /// zeroed, which degrades the heuristic but keeps the process alive.
    pub fn load(root: &Path) -> Result<Self, InitError> {
        let dir = root.join(DATA_DIR);
        let corner = load_u16_table(&dir.join(corner_gen::FILE_NAME), codec::CORNER_STATES as usize)?;
        let edge_low = load_u8_table(
            &dir.join(Projection::Low.file_name()),
            codec::EDGE_PROJECTION_STATES as usize,
        )?;
        let edge_high = load_u8_table(
            &dir.join(Projection::High.file_name()),
            codec::EDGE_PROJECTION_STATES as usize,
        )?;
        log::info!("position data initialized");
        Ok(Self { corner, edge_low, edge_high })
    }

    /// Build the oracle from freshly generated tables instead of files.
    pub fn from_tables(corner: Vec<u16>, edge_low: Vec<u8>, edge_high: Vec<u8>) -> Self {
        Self { corner, edge_low, edge_high }
    }

    #[inline]
    fn corner_entry(&self, cube: &Cube) -> u16 {
        self.corner[codec::encode_corners(&cube.corners) as usize]
    }

    /// Six-bit mask of the face-turn classes available in this state.
    #[inline]
    pub fn legal_move_mask(&self, cube: &Cube) -> u8 {
        (self.corner_entry(cube) & corner_gen::LEGAL_MASK) as u8
    }

    /// The rotations available in this state, in canonical order.
    pub fn legal_rotations(&self, cube: &Cube) -> impl Iterator<Item = Rotation> {
        rotation::legal_rotations(self.legal_move_mask(cube))
    }

    /// Corner-table distance alone; a cheaper bound for cutoff checks.
    #[inline]
    pub fn corner_heuristic(&self, cube: &Cube) -> u16 {
        self.corner_entry(cube) >> corner_gen::DEPTH_SHIFT
    }

    /// Admissible estimate of the distance to solved.
    #[inline]
    pub fn heuristic(&self, cube: &Cube) -> u16 {
        let edge_low =
            u16::from(self.edge_low[codec::encode_edge_projection_low(&cube.edges) as usize]);
        let edge_high =
            u16::from(self.edge_high[codec::encode_edge_projection_high(&cube.edges) as usize]);
        self.corner_heuristic(cube).max(edge_low).max(edge_high)
    }
}

fn load_u16_table(path: &Path, len: usize) -> Result<Vec<u16>, InitError> {
    let mut file = File::open(path).map_err(|_| InitError::MissingDataFile(path.to_path_buf()))?;
    let mut bytes = Vec::with_capacity(len * 2);
    file.read_to_end(&mut bytes)?;

    let mut table: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect();
    if table.len() < len {
        log::warn!(
            "only {} of {len} entries found in {}; heuristics will be wrong",
            table.len(),
            path.display()
        );
        table.resize(len, 0);
    } else {
        table.truncate(len);
    }
    Ok(table)
}

fn load_u8_table(path: &Path, len: usize) -> Result<Vec<u8>, InitError> {
    let mut file = File::open(path).map_err(|_| InitError::MissingDataFile(path.to_path_buf()))?;
    let mut table = Vec::with_capacity(len);
    file.read_to_end(&mut table)?;

    if table.len() < len {
        log::warn!(
            "only {} of {len} entries found in {}; heuristics will be wrong",
            table.len(),
            path.display()
        );
        table.resize(len, 0);
    } else {
        table.truncate(len);
    }
    Ok(table)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use std::sync::OnceLock;

    /// Full-size tables with every rotation class open and all distances
    /// zero. Zero distances are trivially admissible, so these let the
    /// search machinery run without the multi-minute offline generation.
    pub(crate) fn permissive() -> &'static HeuristicTables {
        static TABLES: OnceLock<HeuristicTables> = OnceLock::new();
        TABLES.get_or_init(|| {
            HeuristicTables::from_tables(
                vec![corner_gen::LEGAL_MASK; codec::CORNER_STATES as usize],
                vec![0; codec::EDGE_PROJECTION_STATES as usize],
                vec![0; codec::EDGE_PROJECTION_STATES as usize],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::permissive;
    use super::*;

    #[test]
    fn missing_file_is_fatal() {
        let err = HeuristicTables::load(Path::new("/nonexistent/puppet-cube-root"));
        assert!(matches!(err, Err(InitError::MissingDataFile(_))));
    }

    #[test]
    fn solved_heuristic_is_zero() {
        let tables = permissive();
        assert_eq!(tables.heuristic(&Cube::solved()), 0);
        assert_eq!(tables.corner_heuristic(&Cube::solved()), 0);
    }

    #[test]
    fn open_mask_enumerates_every_rotation() {
        let tables = permissive();
        let legal: Vec<Rotation> = tables.legal_rotations(&Cube::solved()).collect();
        assert_eq!(legal, Rotation::ALL.to_vec());
    }

    #[test]
    #[ignore = "needs generated tables under ./position_data"]
    fn heuristic_is_admissible_on_short_scrambles() {
        use crate::scramble;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let tables = HeuristicTables::load(Path::new(".")).expect("generated tables present");
        assert_eq!(tables.heuristic(&Cube::solved()), 0);

        // a state reached by k rotations is at most k from solved, so the
        // heuristic may never exceed the scramble length
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            let mut cube = Cube::solved();
            scramble::scramble(&mut rng, &tables, &mut cube, 7, 0, None);
            assert!(tables.heuristic(&cube) <= 7);
        }
    }

    #[test]
    fn short_file_degrades_with_a_warning() {
        let dir = std::env::temp_dir().join(format!("puppet-cube-test-{}", std::process::id()));
        let data_dir = dir.join(DATA_DIR);
        std::fs::create_dir_all(&data_dir).unwrap();
        // a few bytes per table, far short of the real sizes
        std::fs::write(data_dir.join(corner_gen::FILE_NAME), [0x3F, 0x00, 0x7F, 0x00]).unwrap();
        std::fs::write(data_dir.join(Projection::Low.file_name()), [1u8, 2, 3]).unwrap();
        std::fs::write(data_dir.join(Projection::High.file_name()), [4u8]).unwrap();

        let tables = HeuristicTables::load(&dir).unwrap();
        assert_eq!(tables.legal_move_mask(&Cube::solved()), 0x3F);
        // the truncated tail reads as zero
        let scrambled = Rotation::R.apply(&Cube::solved());
        assert_eq!(tables.corner_heuristic(&scrambled), 0);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
