mod cell;
mod layout;

pub use cell::CellType;
pub use layout::Layout;

use crate::{
    error::{Error, Result},
    space::Coord,
};

/// A fixed rectangular map of [`CellType`]s
///
/// Cells are stored row-major. The layout is immutable once built, apart from a single
/// optional placement of the teleporter pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
    teleporters: Option<(Coord, Coord)>,
}

impl Grid {
    /// Build a grid from row-major cells
    pub fn from_cells(width: usize, height: usize, cells: Vec<CellType>) -> Result<Self> {
        let expected = width * height;
        if width == 0 || height == 0 || cells.len() != expected {
            return Err(Error::Shape {
                expected,
                found: cells.len(),
            });
        }
        if let Some(row) = cells
            .iter()
            .position(|&cell| cell == CellType::OutOfBounds)
            .map(|i| i / width)
        {
            return Err(Error::Layout {
                row,
                message: String::from("out-of-bounds sentinel cannot be stored in a grid"),
            });
        }

        Ok(Self {
            width,
            height,
            cells,
            teleporters: None,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Whether `pos` lies inside the grid
    pub fn contains(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// The kind of cell at `pos`, or [`CellType::OutOfBounds`] outside the grid
    pub fn lookup(&self, pos: Coord) -> CellType {
        self.index(pos).map_or(CellType::OutOfBounds, |i| self.cells[i])
    }

    /// First cell of the given kind in row-major order
    pub fn find(&self, kind: CellType) -> Option<Coord> {
        self.cells
            .iter()
            .position(|&cell| cell == kind)
            .map(|i| self.coord_of(i))
    }

    /// Number of cells of the given kind
    pub fn count(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|&&cell| cell == kind).count()
    }

    /// Place the teleporter entry and exit markers on two empty cells
    ///
    /// Can only be done once per grid.
    pub fn place_teleporters(&mut self, entry: Coord, exit: Coord) -> Result<()> {
        let fail = |pos: Coord, reason| Error::Teleporter {
            x: pos.x,
            y: pos.y,
            reason,
        };
        if self.teleporters.is_some() {
            return Err(fail(entry, "teleporters were already placed"));
        }
        if entry == exit {
            return Err(fail(entry, "entry and exit coincide"));
        }
        for pos in [entry, exit] {
            match self.lookup(pos) {
                CellType::Empty => {}
                CellType::OutOfBounds => return Err(fail(pos, "outside the grid")),
                _ => return Err(fail(pos, "cell is not empty")),
            }
        }

        let (i, j) = (self.index(entry), self.index(exit));
        if let (Some(i), Some(j)) = (i, j) {
            self.cells[i] = CellType::Teleporter1;
            self.cells[j] = CellType::Teleporter2;
        }
        self.teleporters = Some((entry, exit));
        Ok(())
    }

    /// Teleporter entry and exit, if placed
    pub fn teleporters(&self) -> Option<(Coord, Coord)> {
        self.teleporters
    }

    /// Corner-to-corner length, used to normalize distances
    pub fn diagonal(&self) -> f64 {
        Coord::new(0, 0).distance(Coord::new(self.width as i32 - 1, self.height as i32 - 1))
    }

    /// Iterate over the rows of the grid, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellType]> {
        self.cells.chunks(self.width)
    }

    /// Iterate over every in-bounds coordinate in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(|i| self.coord_of(i))
    }

    fn coord_of(&self, i: usize) -> Coord {
        Coord::new((i % self.width) as i32, (i / self.width) as i32)
    }
}
