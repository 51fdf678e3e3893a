use crate::cost;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sa_common::db::core::Circuit;
use sa_common::db::grid::Grid;
use sa_common::db::indices::CellId;
use sa_common::error::{PlaceError, Result};
use sa_common::geom::coord::GridCoord;

/// An applied swap and the cost change it caused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapMove {
    pub a: CellId,
    pub b: CellId,
    pub delta: i64,
}

/// Random move source. Owns the only RNG of a placement run.
pub struct MoveGenerator {
    rng: StdRng,
}

impl MoveGenerator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Puts every cell on a uniformly random free site.
    ///
    /// Refuses up front when the grid cannot hold every cell, so the
    /// rejection sampling below always terminates. Any earlier placement is
    /// discarded first; a cell never counts its own old site as taken.
    pub fn random_placement(&mut self, circuit: &Circuit, grid: &mut Grid) -> Result<()> {
        if grid.num_sites() < circuit.num_cells() {
            return Err(PlaceError::InsufficientCapacity {
                cells: circuit.num_cells(),
                sites: grid.num_sites(),
            });
        }
        grid.clear();

        let mut draws = 0usize;
        for cell in &circuit.cells {
            loop {
                draws += 1;
                let site = GridCoord::new(
                    self.rng.gen_range(0..grid.cols()),
                    self.rng.gen_range(0..grid.rows()),
                );
                if !grid.is_occupied(site) {
                    grid.place(cell.id, site)?;
                    break;
                }
            }
        }

        log::debug!(
            "Random placement: {} cells on {} sites ({} draws)",
            circuit.num_cells(),
            grid.num_sites(),
            draws
        );
        Ok(())
    }

    /// Two different indices in `[0, n)`, uniformly over ordered pairs.
    pub fn pick_distinct_random_pair(&mut self, n: usize) -> Result<(usize, usize)> {
        if n < 2 {
            return Err(PlaceError::NotEnoughCells {
                required: 2,
                found: n,
            });
        }
        let a = self.rng.gen_range(0..n);
        let mut b = self.rng.gen_range(0..n - 1);
        if b >= a {
            b += 1;
        }
        Ok((a, b))
    }

    /// Swaps two random cells and reports the resulting cost change.
    ///
    /// Only nets touching the pair are re-evaluated; the delta equals the
    /// difference of full totals taken before and after the swap.
    pub fn propose_swap(&mut self, circuit: &Circuit, grid: &mut Grid) -> Result<SwapMove> {
        let (i, j) = self.pick_distinct_random_pair(circuit.num_cells())?;
        let (a, b) = (CellId::new(i), CellId::new(j));

        let nets = cost::affected_nets(circuit, a, b);
        let before = cost::nets_cost(circuit, grid, &nets);
        grid.swap(a, b)?;
        let after = cost::nets_cost(circuit, grid, &nets);

        let delta = after as i64 - before as i64;
        log::trace!("swap {} <-> {}: delta {}", a, b, delta);
        Ok(SwapMove { a, b, delta })
    }

    /// Undoes a swap returned by [`propose_swap`](Self::propose_swap).
    pub fn revert(grid: &mut Grid, mv: &SwapMove) -> Result<()> {
        grid.swap(mv.a, mv.b)
    }

    /// Uniform draw in `[0, 1)` for acceptance tests.
    pub fn unit(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_common::db::core::{NetDesc, NetlistDesc};
    use std::collections::HashSet;

    fn chain(num_cells: i64, cols: i64, rows: i64) -> Circuit {
        let nets = (0..num_cells - 1)
            .map(|i| NetDesc {
                num_pins: 2,
                source: i,
                sinks: vec![i + 1],
            })
            .collect::<Vec<_>>();
        Circuit::new(&NetlistDesc {
            num_cells,
            num_connections: nets.len() as i64,
            num_rows: rows,
            num_cols: cols,
            nets,
        })
        .unwrap()
    }

    #[test]
    fn random_placement_places_every_cell_once() {
        let circuit = chain(12, 4, 4);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let mut moves = MoveGenerator::new(Some(3));
        moves.random_placement(&circuit, &mut grid).unwrap();

        let mut sites = HashSet::new();
        for cell in &circuit.cells {
            let pos = grid.position(cell.id).unwrap();
            assert!(sites.insert(pos), "two cells on {}", pos);
            assert_eq!(grid.cell_at(pos), Some(cell.id));
        }
        assert_eq!(grid.occupied().count(), 12);
    }

    #[test]
    fn random_placement_fills_an_exact_fit() {
        let circuit = chain(9, 3, 3);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        MoveGenerator::new(Some(11))
            .random_placement(&circuit, &mut grid)
            .unwrap();
        assert_eq!(grid.num_placed(), 9);
    }

    #[test]
    fn random_placement_twice_on_a_full_grid_terminates() {
        let circuit = chain(4, 2, 2);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let mut moves = MoveGenerator::new(Some(17));
        moves.random_placement(&circuit, &mut grid).unwrap();
        moves.random_placement(&circuit, &mut grid).unwrap();

        assert_eq!(grid.num_placed(), 4);
        assert_eq!(grid.occupied().count(), 4);
        for cell in &circuit.cells {
            let pos = grid.position(cell.id).unwrap();
            assert_eq!(grid.cell_at(pos), Some(cell.id));
        }
    }

    #[test]
    fn random_placement_rejects_overfull_grid_without_side_effects() {
        let circuit = chain(5, 2, 2);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let err = MoveGenerator::new(Some(1))
            .random_placement(&circuit, &mut grid)
            .unwrap_err();
        assert_eq!(err, PlaceError::InsufficientCapacity { cells: 5, sites: 4 });
        assert_eq!(grid.num_placed(), 0);
        assert_eq!(grid.occupied().count(), 0);
    }

    #[test]
    fn distinct_pair_of_two() {
        let mut moves = MoveGenerator::new(Some(5));
        for _ in 0..200 {
            let pair = moves.pick_distinct_random_pair(2).unwrap();
            assert!(pair == (0, 1) || pair == (1, 0));
        }
    }

    #[test]
    fn distinct_pair_covers_range() {
        let mut moves = MoveGenerator::new(Some(8));
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            let (a, b) = moves.pick_distinct_random_pair(4).unwrap();
            assert_ne!(a, b);
            assert!(a < 4 && b < 4);
            seen.insert((a, b));
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn distinct_pair_needs_two() {
        let mut moves = MoveGenerator::new(Some(0));
        assert!(moves.pick_distinct_random_pair(1).is_err());
        assert!(moves.pick_distinct_random_pair(0).is_err());
    }

    #[test]
    fn swap_delta_matches_full_recompute() {
        let circuit = chain(10, 5, 3);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let mut moves = MoveGenerator::new(Some(21));
        moves.random_placement(&circuit, &mut grid).unwrap();

        for _ in 0..100 {
            let before = cost::total_cost(&circuit, &grid) as i64;
            let mv = moves.propose_swap(&circuit, &mut grid).unwrap();
            let after = cost::total_cost(&circuit, &grid) as i64;
            assert_eq!(mv.delta, after - before);
        }
    }

    #[test]
    fn revert_restores_positions() {
        let circuit = chain(6, 3, 2);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let mut moves = MoveGenerator::new(Some(4));
        moves.random_placement(&circuit, &mut grid).unwrap();
        let before: Vec<_> = circuit.cells.iter().map(|c| grid.position(c.id)).collect();
        let cost_before = cost::total_cost(&circuit, &grid);

        let mv = moves.propose_swap(&circuit, &mut grid).unwrap();
        MoveGenerator::revert(&mut grid, &mv).unwrap();

        let after: Vec<_> = circuit.cells.iter().map(|c| grid.position(c.id)).collect();
        assert_eq!(before, after);
        assert_eq!(cost::total_cost(&circuit, &grid), cost_before);
    }

    #[test]
    fn propose_swap_before_placement_fails_cleanly() {
        let circuit = chain(3, 2, 2);
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        let err = MoveGenerator::new(Some(2))
            .propose_swap(&circuit, &mut grid)
            .unwrap_err();
        assert!(matches!(err, PlaceError::CellNotPlaced(_)));
        assert_eq!(grid.num_placed(), 0);
    }

    #[test]
    fn same_seed_same_placement() {
        let circuit = chain(8, 4, 4);
        let mut g1 = Grid::for_circuit(&circuit).unwrap();
        let mut g2 = Grid::for_circuit(&circuit).unwrap();
        MoveGenerator::new(Some(99))
            .random_placement(&circuit, &mut g1)
            .unwrap();
        MoveGenerator::new(Some(99))
            .random_placement(&circuit, &mut g2)
            .unwrap();
        for cell in &circuit.cells {
            assert_eq!(g1.position(cell.id), g2.position(cell.id));
        }
    }
}
