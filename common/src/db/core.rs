use crate::db::indices::*;
use crate::error::{PlaceError, Result};

/// One net as it appears in the load data, before validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetDesc {
    pub num_pins: i64,
    pub source: i64,
    pub sinks: Vec<i64>,
}

/// Header and net list handed over by the loader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetlistDesc {
    pub num_cells: i64,
    pub num_connections: i64,
    pub num_rows: i64,
    pub num_cols: i64,
    pub nets: Vec<NetDesc>,
}

#[derive(Clone, Debug)]
pub struct LogicCell {
    pub id: CellId,
    /// Nets touching this cell, ascending and without duplicates.
    pub nets: Vec<NetId>,
}

#[derive(Clone, Debug)]
pub struct Net {
    pub id: NetId,
    pub source: CellId,
    pub sinks: Vec<CellId>,
}

impl Net {
    /// Source first, then sinks in declaration order.
    pub fn pins(&self) -> impl Iterator<Item = CellId> + '_ {
        std::iter::once(self.source).chain(self.sinks.iter().copied())
    }
}

/// Cells and nets of the design. Topology is fixed once built; positions
/// live in the [`Grid`](crate::db::grid::Grid).
#[derive(Clone, Debug)]
pub struct Circuit {
    pub cells: Vec<LogicCell>,
    pub nets: Vec<Net>,
    pub num_rows: u32,
    pub num_cols: u32,
}

impl Circuit {
    pub fn new(desc: &NetlistDesc) -> Result<Self> {
        if desc.num_cells <= 0 {
            return Err(PlaceError::MalformedInput(format!(
                "cell count must be positive, got {}",
                desc.num_cells
            )));
        }
        if desc.num_rows <= 0 || desc.num_cols <= 0 {
            return Err(PlaceError::MalformedInput(format!(
                "grid must have positive rows and columns, got {} rows x {} cols",
                desc.num_rows, desc.num_cols
            )));
        }
        let num_rows = header_u32("row count", desc.num_rows)?;
        let num_cols = header_u32("column count", desc.num_cols)?;
        // Cell ids are stored as u32.
        header_u32("cell count", desc.num_cells)?;
        if desc.num_connections < 0 || desc.num_connections as usize != desc.nets.len() {
            return Err(PlaceError::MalformedInput(format!(
                "header declares {} connections but {} nets were supplied",
                desc.num_connections,
                desc.nets.len()
            )));
        }

        let num_cells = desc.num_cells as usize;
        let cell_ref = |raw: i64, net: usize| -> Result<CellId> {
            if raw < 0 || raw as usize >= num_cells {
                return Err(PlaceError::MalformedInput(format!(
                    "net {} references cell {} but only {} cells exist",
                    net, raw, num_cells
                )));
            }
            Ok(CellId::new(raw as usize))
        };

        let mut cells: Vec<LogicCell> = (0..num_cells)
            .map(|i| LogicCell {
                id: CellId::new(i),
                nets: Vec::new(),
            })
            .collect();
        let mut nets = Vec::with_capacity(desc.nets.len());

        for (i, net_desc) in desc.nets.iter().enumerate() {
            if net_desc.num_pins < 2 {
                return Err(PlaceError::MalformedInput(format!(
                    "net {} declares {} pins, at least 2 are required",
                    i, net_desc.num_pins
                )));
            }
            if net_desc.sinks.len() as i64 != net_desc.num_pins - 1 {
                return Err(PlaceError::MalformedInput(format!(
                    "net {} declares {} pins but lists {} sinks",
                    i,
                    net_desc.num_pins,
                    net_desc.sinks.len()
                )));
            }

            let id = NetId::new(i);
            let source = cell_ref(net_desc.source, i)?;
            let sinks = net_desc
                .sinks
                .iter()
                .map(|&s| cell_ref(s, i))
                .collect::<Result<Vec<_>>>()?;

            let net = Net { id, source, sinks };
            for pin in net.pins() {
                let cell_nets = &mut cells[pin.index()].nets;
                if cell_nets.last() != Some(&id) {
                    cell_nets.push(id);
                }
            }
            nets.push(net);
        }

        Ok(Self {
            cells,
            nets,
            num_rows,
            num_cols,
        })
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }
    pub fn num_nets(&self) -> usize {
        self.nets.len()
    }

    pub fn num_sites(&self) -> usize {
        self.num_rows as usize * self.num_cols as usize
    }
}

fn header_u32(what: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        PlaceError::MalformedInput(format!("{} {} does not fit in 32 bits", what, value))
    })
}
