use crate::db::indices::CellId;
use crate::geom::coord::GridCoord;

/// Failures raised by the placement core.
///
/// Load-time problems (`MalformedInput`) are rejected before any state is
/// built. Grid contract violations and controller misconfiguration indicate
/// a broken invariant and are not meant to be retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaceError {
    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("invalid grid dimensions {cols}x{rows}")]
    InvalidDimensions { cols: u32, rows: u32 },

    #[error("site {0} is outside the grid")]
    OutOfBounds(GridCoord),

    #[error("site {site} already holds {occupant}")]
    SiteOccupied { site: GridCoord, occupant: CellId },

    #[error("{0} is not placed")]
    CellNotPlaced(CellId),

    #[error("need at least {required} cells to pick a move, found {found}")]
    NotEnoughCells { required: usize, found: usize },

    #[error("grid has {sites} sites but {cells} cells must be placed")]
    InsufficientCapacity { cells: usize, sites: usize },

    #[error("temperature calibration needs at least one sample")]
    EmptySample,

    #[error("unknown placement state '{0}'")]
    UnknownState(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, PlaceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_site_occupied() {
        let err = PlaceError::SiteOccupied {
            site: GridCoord::new(1, 2),
            occupant: CellId::new(7),
        };
        assert_eq!(format!("{err}"), "site (1, 2) already holds c7");
    }

    #[test]
    fn display_insufficient_capacity() {
        let err = PlaceError::InsufficientCapacity { cells: 5, sites: 4 };
        assert_eq!(
            format!("{err}"),
            "grid has 4 sites but 5 cells must be placed"
        );
    }

    #[test]
    fn display_invalid_dimensions() {
        let err = PlaceError::InvalidDimensions { cols: 0, rows: 3 };
        assert_eq!(format!("{err}"), "invalid grid dimensions 0x3");
    }
}
