use crate::db::core::Circuit;
use crate::db::grid::Grid;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};

/// Verifies that every cell is placed and that the cell -> site and
/// site -> cell maps agree.
pub fn run_placement_check(circuit: &Circuit, grid: &Grid) -> Result<(), String> {
    log::info!("Starting Placement Verification...");
    let valid = AtomicBool::new(true);

    if grid.num_sites() < circuit.num_cells() {
        log::error!(
            "FAIL: {} cells cannot fit on {} sites.",
            circuit.num_cells(),
            grid.num_sites()
        );
        valid.store(false, Ordering::Relaxed);
    }

    circuit.cells.par_iter().for_each(|cell| match grid.position(cell.id) {
        None => {
            log::error!("FAIL: Cell '{}' is not placed.", cell.id);
            valid.store(false, Ordering::Relaxed);
        }
        Some(pos) if !grid.in_bounds(pos) => {
            log::error!("FAIL: Cell '{}' out of bounds at {}.", cell.id, pos);
            valid.store(false, Ordering::Relaxed);
        }
        Some(pos) => {
            if grid.cell_at(pos) != Some(cell.id) {
                log::error!(
                    "FAIL: Cell '{}' records {} but the site holds {:?}.",
                    cell.id,
                    pos,
                    grid.cell_at(pos)
                );
                valid.store(false, Ordering::Relaxed);
            }
        }
    });

    let sites: Vec<_> = grid.occupied().collect();
    let stale_site = sites.par_iter().any(|&(site, cell)| {
        if cell.index() >= circuit.num_cells() {
            log::error!("FAIL: Site {} holds unknown cell '{}'.", site, cell);
            return true;
        }
        if grid.position(cell) != Some(site) {
            log::error!(
                "FAIL: Site {} holds '{}' which records {:?}.",
                site,
                cell,
                grid.position(cell)
            );
            return true;
        }
        false
    });

    if stale_site {
        valid.store(false, Ordering::Relaxed);
    }

    if valid.load(Ordering::Relaxed) {
        log::info!("\x1b[32mPASS\x1b[0m: Placement is valid.");
        Ok(())
    } else {
        Err("Placement verification failed.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::core::{NetDesc, NetlistDesc};
    use crate::db::indices::CellId;
    use crate::geom::coord::GridCoord;

    fn circuit() -> Circuit {
        Circuit::new(&NetlistDesc {
            num_cells: 3,
            num_connections: 1,
            num_rows: 2,
            num_cols: 2,
            nets: vec![NetDesc {
                num_pins: 3,
                source: 0,
                sinks: vec![1, 2],
            }],
        })
        .unwrap()
    }

    #[test]
    fn passes_for_complete_placement() {
        let circuit = circuit();
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        grid.place(CellId::new(0), GridCoord::new(0, 0)).unwrap();
        grid.place(CellId::new(1), GridCoord::new(1, 0)).unwrap();
        grid.place(CellId::new(2), GridCoord::new(1, 1)).unwrap();
        assert!(run_placement_check(&circuit, &grid).is_ok());
    }

    #[test]
    fn fails_when_a_cell_is_missing() {
        let circuit = circuit();
        let mut grid = Grid::for_circuit(&circuit).unwrap();
        grid.place(CellId::new(0), GridCoord::new(0, 0)).unwrap();
        grid.place(CellId::new(2), GridCoord::new(1, 1)).unwrap();
        assert!(run_placement_check(&circuit, &grid).is_err());
    }
}
