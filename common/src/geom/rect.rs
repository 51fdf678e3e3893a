use super::coord::GridCoord;

/// Inclusive axis-aligned box over grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub min: GridCoord,
    pub max: GridCoord,
}

impl Rect {
    pub fn from_coord(p: GridCoord) -> Self {
        Self { min: p, max: p }
    }

    /// Grows the box so it covers `p`.
    pub fn include(&mut self, p: GridCoord) {
        self.min.col = self.min.col.min(p.col);
        self.min.row = self.min.row.min(p.row);
        self.max.col = self.max.col.max(p.col);
        self.max.row = self.max.row.max(p.row);
    }

    pub fn width(&self) -> u32 {
        self.max.col - self.min.col
    }
    pub fn height(&self) -> u32 {
        self.max.row - self.min.row
    }

    pub fn half_perimeter(&self) -> u64 {
        self.width() as u64 + self.height() as u64
    }

    /// Smallest box covering every point, or `None` for an empty set.
    pub fn bounding<I: IntoIterator<Item = GridCoord>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let mut rect = Self::from_coord(points.next()?);
        for p in points {
            rect.include(p);
        }
        Some(rect)
    }
}
