use crate::db::core::Circuit;
use crate::db::indices::CellId;
use crate::error::{PlaceError, Result};
use crate::geom::coord::GridCoord;

/// Site occupancy plus the reverse cell -> site map.
///
/// Both directions are only ever updated together, so a reader between
/// calls always sees `sites[positions[c]] == Some(c)` for every placed cell.
#[derive(Clone, Debug)]
pub struct Grid {
    cols: u32,
    rows: u32,
    sites: Vec<Option<CellId>>,
    positions: Vec<Option<GridCoord>>,
}

impl Grid {
    pub fn new(cols: u32, rows: u32) -> Result<Self> {
        if cols == 0 || rows == 0 {
            return Err(PlaceError::InvalidDimensions { cols, rows });
        }
        Ok(Self {
            cols,
            rows,
            sites: vec![None; cols as usize * rows as usize],
            positions: Vec::new(),
        })
    }

    /// Empty grid sized from the load data, with room for every cell.
    pub fn for_circuit(circuit: &Circuit) -> Result<Self> {
        let mut grid = Self::new(circuit.num_cols, circuit.num_rows)?;
        grid.positions = vec![None; circuit.num_cells()];
        Ok(grid)
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
    pub fn rows(&self) -> u32 {
        self.rows
    }
    pub fn num_sites(&self) -> usize {
        self.sites.len()
    }

    pub fn num_placed(&self) -> usize {
        self.positions.iter().filter(|p| p.is_some()).count()
    }

    pub fn in_bounds(&self, coord: GridCoord) -> bool {
        coord.col < self.cols && coord.row < self.rows
    }

    #[inline(always)]
    fn index(&self, coord: GridCoord) -> usize {
        (coord.row as usize) * (self.cols as usize) + (coord.col as usize)
    }

    #[inline(always)]
    fn coord_of(&self, idx: usize) -> GridCoord {
        let cols = self.cols as usize;
        GridCoord::new((idx % cols) as u32, (idx / cols) as u32)
    }

    /// Puts `cell` on `coord`, releasing the site it held before.
    pub fn place(&mut self, cell: CellId, coord: GridCoord) -> Result<()> {
        if !self.in_bounds(coord) {
            return Err(PlaceError::OutOfBounds(coord));
        }
        let idx = self.index(coord);
        match self.sites[idx] {
            Some(occupant) if occupant == cell => return Ok(()),
            Some(occupant) => {
                return Err(PlaceError::SiteOccupied {
                    site: coord,
                    occupant,
                });
            }
            None => {}
        }

        if cell.index() >= self.positions.len() {
            self.positions.resize(cell.index() + 1, None);
        }
        if let Some(prev) = self.positions[cell.index()] {
            let prev_idx = self.index(prev);
            self.sites[prev_idx] = None;
        }
        self.sites[idx] = Some(cell);
        self.positions[cell.index()] = Some(coord);
        Ok(())
    }

    /// Empties every site. Cell slots are kept so `positions` stays sized.
    pub fn clear(&mut self) {
        self.sites.fill(None);
        self.positions.fill(None);
    }

    /// Exchanges the sites of two placed cells. Nothing changes on error.
    pub fn swap(&mut self, a: CellId, b: CellId) -> Result<()> {
        let pos_a = self.position(a).ok_or(PlaceError::CellNotPlaced(a))?;
        let pos_b = self.position(b).ok_or(PlaceError::CellNotPlaced(b))?;
        if a == b {
            return Ok(());
        }

        let idx_a = self.index(pos_a);
        let idx_b = self.index(pos_b);
        self.sites.swap(idx_a, idx_b);
        self.positions[a.index()] = Some(pos_b);
        self.positions[b.index()] = Some(pos_a);
        Ok(())
    }

    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        self.cell_at(coord).is_some()
    }

    pub fn cell_at(&self, coord: GridCoord) -> Option<CellId> {
        if !self.in_bounds(coord) {
            return None;
        }
        self.sites[self.index(coord)]
    }

    pub fn position(&self, cell: CellId) -> Option<GridCoord> {
        self.positions.get(cell.index()).copied().flatten()
    }

    /// Occupied sites in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (GridCoord, CellId)> + '_ {
        self.sites
            .iter()
            .enumerate()
            .filter_map(|(idx, site)| site.map(|cell| (self.coord_of(idx), cell)))
    }
}
