use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};

/// Grid shape (cols, rows) holding `num_cells` at roughly `utilization`.
pub fn grid_for_utilization(num_cells: usize, utilization: f64) -> (usize, usize) {
    let util = utilization.clamp(0.01, 1.0);
    let sites = ((num_cells as f64) / util).ceil().max(num_cells as f64) as usize;
    let cols = (sites as f64).sqrt().ceil().max(1.0) as usize;
    let rows = sites.div_ceil(cols).max(1);
    (cols, rows)
}

pub fn generate_random_netlist(
    filename: &str,
    num_cells: usize,
    num_nets: usize,
    max_fanout: usize,
    target_utilization: f64,
) -> std::io::Result<()> {
    if num_cells < 2 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "a netlist needs at least 2 cells",
        ));
    }

    let mut file = BufWriter::new(File::create(filename)?);
    let mut rng = rand::thread_rng();

    let (cols, rows) = grid_for_utilization(num_cells, target_utilization);
    let max_fanout = max_fanout.clamp(1, num_cells - 1);

    log::info!(
        "Generating Benchmark: {} cells, {} nets, Grid: {}x{} (Target Util: {:.1}%)",
        num_cells,
        num_nets,
        cols,
        rows,
        target_utilization * 100.0
    );

    writeln!(file, "{} {} {} {}", num_cells, num_nets, rows, cols)?;

    for _ in 0..num_nets {
        let source = rng.gen_range(0..num_cells);
        let fanout = rng.gen_range(1..=max_fanout);

        write!(file, "{} {}", fanout + 1, source)?;
        for _ in 0..fanout {
            // Draw from the other n-1 cells so a net never loops back on its source.
            let mut sink = rng.gen_range(0..num_cells - 1);
            if sink >= source {
                sink += 1;
            }
            write!(file, " {}", sink)?;
        }
        writeln!(file)?;
    }

    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::core::Circuit;
    use crate::db::parser::netlist;

    #[test]
    fn grid_always_fits_cells() {
        for &(cells, util) in &[(1, 0.5), (10, 0.9), (37, 1.0), (100, 0.01), (5, 2.0)] {
            let (cols, rows) = grid_for_utilization(cells, util);
            assert!(cols * rows >= cells, "{} cells on {}x{}", cells, cols, rows);
        }
    }

    #[test]
    fn generated_file_loads_into_a_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("random.txt");
        let path = path.to_str().unwrap();

        generate_random_netlist(path, 20, 15, 4, 0.6).unwrap();

        let desc = netlist::parse(path).unwrap();
        assert_eq!(desc.num_cells, 20);
        assert_eq!(desc.nets.len(), 15);
        let circuit = Circuit::new(&desc).unwrap();
        assert!(circuit.num_sites() >= circuit.num_cells());
        for net in &circuit.nets {
            assert!(net.sinks.len() <= 4);
            assert!(!net.sinks.contains(&net.source));
        }
    }

    #[test]
    fn refuses_single_cell() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.txt");
        assert!(generate_random_netlist(path.to_str().unwrap(), 1, 1, 1, 0.5).is_err());
    }
}
