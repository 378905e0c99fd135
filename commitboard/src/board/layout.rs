//! Board layout generation, serialization, and rendering.

use rand::{thread_rng, Rng};

use crate::{
    board::{
        commit::{commit_space, Commitment, NonceGrid, Reveal},
        errors::{LayoutGenerationFailed, MalformedBoardData},
        Cell, Coordinate,
    },
    ships::ShipSpec,
};

/// Board dimension used by the standard game.
pub const DEFAULT_SIZE: usize = 10;

/// Default number of random placement attempts allowed per ship before
/// generation gives up.
pub const DEFAULT_RETRY_BUDGET: usize = 10_000;

/// Controls how close ships may sit to one another during generation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Spacing {
    /// Ships keep a one-cell buffer: no cell of one ship may touch a cell of
    /// another, even diagonally.
    Separated,
    /// Ships may touch but may not overlap.
    Touching,
}

impl Default for Spacing {
    fn default() -> Self {
        Spacing::Separated
    }
}

/// A player's committed ship layout for one game.
///
/// Created once by generation (or reconstructed from persisted data) and
/// never mutated afterward; shots are tracked by the ledger's game record,
/// not on the layout.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BoardLayout {
    size: usize,
    cells: Box<[Cell]>,
}

impl BoardLayout {
    /// Generate a layout for the standard 10×10 board with the default
    /// spacing policy and retry budget.
    pub fn generate(ships: &ShipSpec) -> Result<Self, LayoutGenerationFailed> {
        Self::generate_sized(ships, DEFAULT_SIZE)
    }

    /// Generate a layout for a `size`×`size` board with the default spacing
    /// policy and retry budget.
    pub fn generate_sized(ships: &ShipSpec, size: usize) -> Result<Self, LayoutGenerationFailed> {
        Self::generate_with(
            ships,
            size,
            Spacing::default(),
            DEFAULT_RETRY_BUDGET,
            &mut thread_rng(),
        )
    }

    /// Generate a layout with explicit spacing policy, per-ship retry budget,
    /// and randomness source.
    ///
    /// Each ship is placed by rejection sampling: pick a random start cell
    /// and orientation, accept only if the whole run is in bounds, unoccupied,
    /// and clear of other ships per the spacing policy. A ship that cannot be
    /// placed within `budget` attempts fails the whole generation rather than
    /// looping forever.
    pub fn generate_with<R: Rng>(
        ships: &ShipSpec,
        size: usize,
        spacing: Spacing,
        budget: usize,
        rng: &mut R,
    ) -> Result<Self, LayoutGenerationFailed> {
        let mut cells = vec![Cell::Empty; size * size].into_boxed_slice();
        for ship in ships.ships() {
            let mut placed = false;
            for _ in 0..budget {
                let start = Coordinate::new(rng.gen_range(0, size), rng.gen_range(0, size));
                let horizontal = rng.gen::<bool>();
                let run = match run_from(start, horizontal, ship.length(), size) {
                    Some(run) => run,
                    None => continue,
                };
                if run
                    .iter()
                    .any(|&coord| blocked(&cells, size, coord, spacing))
                {
                    continue;
                }
                for &coord in &run {
                    cells[coord.row * size + coord.col] = Cell::Ship(ship.id());
                }
                placed = true;
                break;
            }
            if !placed {
                return Err(LayoutGenerationFailed {
                    ship: ship.id(),
                    attempts: budget,
                });
            }
        }
        Ok(Self { size, cells })
    }

    /// Reconstruct a layout from its serialized form.
    pub fn deserialize(data: &str) -> Result<Self, MalformedBoardData> {
        let len = data.chars().count();
        let mut size = 0;
        while size * size < len {
            size += 1;
        }
        if size * size != len {
            return Err(MalformedBoardData::NotSquare { len });
        }
        let cells = data
            .chars()
            .enumerate()
            .map(|(offset, symbol)| {
                Cell::from_symbol(symbol)
                    .ok_or(MalformedBoardData::UnrecognizedSymbol { symbol, offset })
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_boxed_slice();
        Ok(Self { size, cells })
    }

    /// Canonical textual encoding of the grid: one symbol per cell,
    /// row-major. `deserialize` reconstructs an equivalent layout from it.
    pub fn serialize(&self) -> String {
        self.cells.iter().map(|cell| cell.symbol()).collect()
    }

    /// The grid as per-cell display symbols, using the same encoding as
    /// `serialize`.
    pub fn render(&self) -> Vec<Vec<char>> {
        (0..self.size)
            .map(|row| {
                (0..self.size)
                    .map(|col| self.cells[row * self.size + col].symbol())
                    .collect()
            })
            .collect()
    }

    /// The hashed view of the layout, one digest per cell, for publishing at
    /// join time.
    ///
    /// Must be called with the exact nonce grid generated alongside this
    /// layout. Repeated calls produce byte-identical output, so the value can
    /// be recomputed for resubmission and still match what the ledger holds.
    pub fn render_hashed(&self, nonces: &NonceGrid) -> Commitment {
        assert_eq!(
            nonces.size(),
            self.size,
            "nonce grid size does not match board size"
        );
        Commitment::new(
            (0..self.size)
                .map(|row| {
                    (0..self.size)
                        .map(|col| {
                            let coord = Coordinate::new(row, col);
                            commit_space(self.cells[row * self.size + col].symbol(), nonces.get(coord))
                        })
                        .collect()
                })
                .collect(),
        )
    }

    /// The reveal pair for a previously fired-upon cell: its true symbol and
    /// the salt behind its commitment.
    ///
    /// A pure read; asking for the same coordinate again returns the same
    /// pair. Panics if the coordinate is out of bounds, which is a caller
    /// contract violation rather than a runtime condition.
    pub fn reveal(&self, nonces: &NonceGrid, coord: Coordinate) -> Reveal {
        let cell = match self.get(coord) {
            Some(cell) => cell,
            None => panic!("{:?} is out of bounds for a {1}x{1} board", coord, self.size),
        };
        Reveal {
            space: cell.symbol(),
            nonce: nonces.get(coord).to_owned(),
        }
    }

    /// Board dimension.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The cell at the given coordinate, or `None` if out of bounds.
    pub fn get(&self, coord: Coordinate) -> Option<Cell> {
        if coord.row < self.size && coord.col < self.size {
            Some(self.cells[coord.row * self.size + coord.col])
        } else {
            None
        }
    }
}

/// Cells covered by a straight run from `start`, or `None` if the run leaves
/// the board.
fn run_from(
    start: Coordinate,
    horizontal: bool,
    length: usize,
    size: usize,
) -> Option<Vec<Coordinate>> {
    let end = if horizontal {
        start.col + length
    } else {
        start.row + length
    };
    if end > size {
        return None;
    }
    Some(
        (0..length)
            .map(|offset| {
                if horizontal {
                    Coordinate::new(start.row, start.col + offset)
                } else {
                    Coordinate::new(start.row + offset, start.col)
                }
            })
            .collect(),
    )
}

/// Whether placing a ship cell at `coord` violates occupancy or the spacing
/// policy against ships already on the grid.
fn blocked(cells: &[Cell], size: usize, coord: Coordinate, spacing: Spacing) -> bool {
    if !cells[coord.row * size + coord.col].is_empty() {
        return true;
    }
    match spacing {
        Spacing::Touching => false,
        Spacing::Separated => {
            neighbors(coord, size).any(|n| !cells[n.row * size + n.col].is_empty())
        }
    }
}

/// The 8-neighborhood of a coordinate, clipped to the board.
fn neighbors(coord: Coordinate, size: usize) -> impl Iterator<Item = Coordinate> {
    (-1isize..=1)
        .flat_map(|dr| (-1isize..=1).map(move |dc| (dr, dc)))
        .filter(|&(dr, dc)| dr != 0 || dc != 0)
        .filter_map(move |(dr, dc)| {
            let row = coord.row as isize + dr;
            let col = coord.col as isize + dc;
            if row < 0 || col < 0 || row >= size as isize || col >= size as isize {
                None
            } else {
                Some(Coordinate::new(row as usize, col as usize))
            }
        })
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::ships::ShipSpec;

    fn spec(tokens: &[&str], size: usize) -> ShipSpec {
        ShipSpec::parse(tokens, size).unwrap()
    }

    fn coords_of(layout: &BoardLayout, id: char) -> Vec<Coordinate> {
        let mut coords = Vec::new();
        for row in 0..layout.size() {
            for col in 0..layout.size() {
                let coord = Coordinate::new(row, col);
                if layout.get(coord) == Some(Cell::Ship(id)) {
                    coords.push(coord);
                }
            }
        }
        coords
    }

    fn is_straight_run(coords: &[Coordinate]) -> bool {
        let rows: Vec<usize> = coords.iter().map(|c| c.row).collect();
        let cols: Vec<usize> = coords.iter().map(|c| c.col).collect();
        let horizontal = rows.iter().all(|&r| r == rows[0]);
        let vertical = cols.iter().all(|&c| c == cols[0]);
        if horizontal {
            // coords_of scans row-major, so runs come back ordered.
            cols.windows(2).all(|w| w[1] == w[0] + 1)
        } else if vertical {
            rows.windows(2).all(|w| w[1] == w[0] + 1)
        } else {
            false
        }
    }

    #[test]
    fn generated_ships_are_straight_and_exact_length() {
        let spec = spec(&["AAAAA", "BBBB", "CCC", "DD", "SSS"], 10);
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = BoardLayout::generate_with(
                &spec,
                10,
                Spacing::Separated,
                DEFAULT_RETRY_BUDGET,
                &mut rng,
            )
            .unwrap();
            for ship in spec.ships() {
                let coords = coords_of(&layout, ship.id());
                assert_eq!(coords.len(), ship.length(), "seed {}", seed);
                assert!(is_straight_run(&coords), "seed {}", seed);
            }
            let occupied = layout
                .serialize()
                .chars()
                .filter(|&c| c != crate::board::EMPTY_MARKER)
                .count();
            assert_eq!(occupied, spec.total_cells());
        }
    }

    #[test]
    fn separated_ships_never_touch() {
        // Two ships on a small board: repeated generation must never put them
        // adjacent, including diagonally.
        let spec = spec(&["AA", "B"], 4);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let layout = BoardLayout::generate_with(
                &spec,
                4,
                Spacing::Separated,
                DEFAULT_RETRY_BUDGET,
                &mut rng,
            )
            .unwrap();
            for coord in coords_of(&layout, 'A') {
                let clear = neighbors(coord, 4)
                    .all(|n| layout.get(n) != Some(Cell::Ship('B')));
                assert!(clear, "seed {}: A touches B in {}", seed, layout.serialize());
            }
        }
    }

    #[test]
    fn touching_policy_fits_where_separated_cannot() {
        // Two 2-cell ships cannot keep a buffer on a 2x2 board.
        let spec = spec(&["AA", "BB"], 2);
        let mut rng = StdRng::seed_from_u64(1);
        let err =
            BoardLayout::generate_with(&spec, 2, Spacing::Separated, 50, &mut rng).unwrap_err();
        assert_eq!(err.ship, 'B');
        assert_eq!(err.attempts, 50);

        let mut rng = StdRng::seed_from_u64(1);
        let layout =
            BoardLayout::generate_with(&spec, 2, Spacing::Touching, 1_000, &mut rng).unwrap();
        assert_eq!(coords_of(&layout, 'A').len(), 2);
        assert_eq!(coords_of(&layout, 'B').len(), 2);
    }

    #[test]
    fn unplaceable_ship_exhausts_budget_instead_of_hanging() {
        // A 5-cell ship fits the capacity of a 4x4 board but no straight run.
        let spec = spec(&["AAAAA"], 4);
        let mut rng = StdRng::seed_from_u64(7);
        let err =
            BoardLayout::generate_with(&spec, 4, Spacing::Separated, 100, &mut rng).unwrap_err();
        assert_eq!(err.ship, 'A');
        assert_eq!(err.attempts, 100);
    }

    #[test]
    fn serialize_round_trips() {
        let spec = spec(&["AAAAA", "BBBB", "CCC", "DD", "DD", "SSS", "SSS"], 10);
        let layout = BoardLayout::generate(&spec).unwrap();
        let data = layout.serialize();
        assert_eq!(data.len(), 100);
        let back = BoardLayout::deserialize(&data).unwrap();
        assert_eq!(back, layout);
        assert_eq!(back.serialize(), data);
    }

    #[test]
    fn deserializes_known_grid() {
        let layout = BoardLayout::deserialize("A-B-").unwrap();
        assert_eq!(layout.size(), 2);
        assert_eq!(
            layout.render(),
            vec![vec!['A', '-'], vec!['B', '-']],
        );
    }

    #[test]
    fn deserialize_rejects_non_square_data() {
        let err = BoardLayout::deserialize("AAA").unwrap_err();
        assert_eq!(err, MalformedBoardData::NotSquare { len: 3 });
    }

    #[test]
    fn deserialize_rejects_unknown_symbols() {
        let err = BoardLayout::deserialize("A?--").unwrap_err();
        assert_eq!(
            err,
            MalformedBoardData::UnrecognizedSymbol {
                symbol: '?',
                offset: 1
            }
        );
    }

    #[test]
    fn hashed_render_is_idempotent() {
        let layout = BoardLayout::deserialize("A-B-").unwrap();
        let nonces = NonceGrid::generate_with(2, &mut StdRng::seed_from_u64(5));
        let first = layout.render_hashed(&nonces);
        let second = layout.render_hashed(&nonces);
        assert_eq!(first, second);
    }

    #[test]
    fn hashed_render_distinguishes_layouts() {
        // Same nonces, one differing cell: that cell's digest must change.
        let nonces = NonceGrid::generate_with(2, &mut StdRng::seed_from_u64(9));
        let a = BoardLayout::deserialize("A-B-").unwrap().render_hashed(&nonces);
        let b = BoardLayout::deserialize("A--B").unwrap().render_hashed(&nonces);
        assert_eq!(a.get(Coordinate::new(0, 0)), b.get(Coordinate::new(0, 0)));
        assert_ne!(a.get(Coordinate::new(1, 0)), b.get(Coordinate::new(1, 0)));
        assert_ne!(a.get(Coordinate::new(1, 1)), b.get(Coordinate::new(1, 1)));
    }

    #[test]
    fn reveals_verify_against_the_commitment() {
        let spec = spec(&["AA", "B"], 4);
        let layout = BoardLayout::generate_sized(&spec, 4).unwrap();
        let nonces = NonceGrid::generate(4);
        let commitment = layout.render_hashed(&nonces);
        for row in 0..4 {
            for col in 0..4 {
                let coord = Coordinate::new(row, col);
                let reveal = layout.reveal(&nonces, coord);
                assert!(commitment.matches(coord, &reveal));
                // The same request again discloses the same pair.
                assert_eq!(layout.reveal(&nonces, coord), reveal);
            }
        }
    }

    #[test]
    fn tampered_reveal_fails_verification() {
        let layout = BoardLayout::deserialize("A-B-").unwrap();
        let nonces = NonceGrid::generate(2);
        let commitment = layout.render_hashed(&nonces);
        let coord = Coordinate::new(0, 0);
        let mut reveal = layout.reveal(&nonces, coord);
        reveal.space = '-';
        assert!(!commitment.matches(coord, &reveal));
    }
}
