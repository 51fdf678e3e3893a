use sa_common::db::core::{Circuit, Net};
use sa_common::db::grid::Grid;
use sa_common::db::indices::{CellId, NetId};
use sa_common::geom::rect::Rect;

/// Half-perimeter of the box around the net's placed pins.
///
/// Unplaced pins are left out. Before placement completes the value is only
/// indicative.
pub fn net_cost(net: &Net, grid: &Grid) -> u64 {
    Rect::bounding(net.pins().filter_map(|cell| grid.position(cell)))
        .map(|bbox| bbox.half_perimeter())
        .unwrap_or(0)
}

/// Sum of HPWL over all nets in declaration order.
///
/// Warns once per call when some net sources are still unplaced.
pub fn total_cost(circuit: &Circuit, grid: &Grid) -> u64 {
    let unplaced = unplaced_sources(circuit, grid);
    if let Some(first) = unplaced.first() {
        log::warn!(
            "{} of {} nets have an unplaced source (first: {} from {}); excluded from bounding boxes",
            unplaced.len(),
            circuit.num_nets(),
            first,
            circuit.nets[first.index()].source
        );
    }
    circuit.nets.iter().map(|net| net_cost(net, grid)).sum()
}

/// Nets whose source cell has no site yet.
pub fn unplaced_sources(circuit: &Circuit, grid: &Grid) -> Vec<NetId> {
    circuit
        .nets
        .iter()
        .filter(|net| grid.position(net.source).is_none())
        .map(|net| net.id)
        .collect()
}

pub fn nets_cost(circuit: &Circuit, grid: &Grid, nets: &[NetId]) -> u64 {
    nets.iter()
        .map(|id| net_cost(&circuit.nets[id.index()], grid))
        .sum()
}

/// Nets touching either cell, ascending and deduplicated.
pub fn affected_nets(circuit: &Circuit, a: CellId, b: CellId) -> Vec<NetId> {
    let nets_a = &circuit.cells[a.index()].nets;
    let nets_b = &circuit.cells[b.index()].nets;

    let mut merged = Vec::with_capacity(nets_a.len() + nets_b.len());
    let (mut i, mut j) = (0, 0);
    while i < nets_a.len() && j < nets_b.len() {
        match nets_a[i].cmp(&nets_b[j]) {
            std::cmp::Ordering::Less => {
                merged.push(nets_a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                merged.push(nets_b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                merged.push(nets_a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    merged.extend_from_slice(&nets_a[i..]);
    merged.extend_from_slice(&nets_b[j..]);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use sa_common::db::core::{NetDesc, NetlistDesc};
    use sa_common::geom::coord::GridCoord;

    fn circuit(num_cells: i64, cols: i64, rows: i64, nets: &[(i64, &[i64])]) -> Circuit {
        Circuit::new(&NetlistDesc {
            num_cells,
            num_connections: nets.len() as i64,
            num_rows: rows,
            num_cols: cols,
            nets: nets
                .iter()
                .map(|&(source, sinks)| NetDesc {
                    num_pins: sinks.len() as i64 + 1,
                    source,
                    sinks: sinks.to_vec(),
                })
                .collect(),
        })
        .unwrap()
    }

    fn place(grid: &mut Grid, cells: &[(usize, u32, u32)]) {
        for &(cell, col, row) in cells {
            grid.place(CellId::new(cell), GridCoord::new(col, row)).unwrap();
        }
    }

    #[test]
    fn two_cells_side_by_side_cost_one() {
        let c = circuit(2, 2, 1, &[(0, &[1])]);
        let mut grid = Grid::for_circuit(&c).unwrap();
        place(&mut grid, &[(0, 0, 0), (1, 1, 0)]);
        assert_eq!(total_cost(&c, &grid), 1);
    }

    #[test]
    fn bounding_box_over_source_and_sinks() {
        let c = circuit(4, 4, 4, &[(0, &[1, 2, 3]), (1, &[2])]);
        let mut grid = Grid::for_circuit(&c).unwrap();
        place(&mut grid, &[(0, 1, 1), (1, 3, 0), (2, 0, 2), (3, 2, 3)]);
        // net 0: cols 0..3, rows 0..3 -> 6; net 1: (3,0)-(0,2) -> 3 + 2
        assert_eq!(net_cost(&c.nets[0], &grid), 6);
        assert_eq!(net_cost(&c.nets[1], &grid), 5);
        assert_eq!(total_cost(&c, &grid), 11);
    }

    #[test]
    fn sink_order_does_not_change_cost() {
        let forward = circuit(4, 3, 3, &[(0, &[1, 2, 3])]);
        let reversed = circuit(4, 3, 3, &[(0, &[3, 2, 1])]);
        let layout = [(0, 1, 1), (1, 0, 2), (2, 2, 0), (3, 2, 2)];

        let mut grid_f = Grid::for_circuit(&forward).unwrap();
        place(&mut grid_f, &layout);
        let mut grid_r = Grid::for_circuit(&reversed).unwrap();
        place(&mut grid_r, &layout);

        assert_eq!(total_cost(&forward, &grid_f), total_cost(&reversed, &grid_r));
    }

    #[test]
    fn unplaced_pins_do_not_panic() {
        let c = circuit(3, 3, 3, &[(0, &[1, 2])]);
        let mut grid = Grid::for_circuit(&c).unwrap();
        assert_eq!(total_cost(&c, &grid), 0);

        place(&mut grid, &[(1, 0, 0), (2, 2, 1)]);
        assert_eq!(total_cost(&c, &grid), 3);
    }

    #[test]
    fn unplaced_sources_lists_each_net_once() {
        let c = circuit(3, 3, 3, &[(0, &[1]), (1, &[2]), (0, &[2])]);
        let mut grid = Grid::for_circuit(&c).unwrap();
        assert_eq!(
            unplaced_sources(&c, &grid),
            vec![NetId::new(0), NetId::new(1), NetId::new(2)]
        );

        place(&mut grid, &[(1, 0, 0), (2, 1, 0)]);
        assert_eq!(unplaced_sources(&c, &grid), vec![NetId::new(0), NetId::new(2)]);
        // Only net 1 is fully placed; the others see their sinks alone.
        assert_eq!(nets_cost(&c, &grid, &[NetId::new(1)]), 1);
        assert_eq!(total_cost(&c, &grid), 1);

        place(&mut grid, &[(0, 2, 2)]);
        assert!(unplaced_sources(&c, &grid).is_empty());
    }

    #[test]
    fn affected_nets_merges_without_duplicates() {
        let c = circuit(4, 2, 2, &[(0, &[1]), (2, &[3]), (1, &[2]), (0, &[3])]);
        let nets = affected_nets(&c, CellId::new(1), CellId::new(3));
        assert_eq!(
            nets,
            vec![NetId::new(0), NetId::new(1), NetId::new(2), NetId::new(3)]
        );
        let nets = affected_nets(&c, CellId::new(0), CellId::new(0));
        assert_eq!(nets, vec![NetId::new(0), NetId::new(3)]);
    }
}
