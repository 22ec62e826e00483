use crate::{
    error::{Error, Result},
    space::Coord,
};

use super::{CellType, Grid};

const REFERENCE: &str = "
. . . . . G
g . . . t .
. . . . . .
. . # # # #
. . # T . .
. . . . . S
";

/// A text description of a world: its cells, the start cell and an optional teleporter pair
///
/// One row per line, whitespace-separated tokens:
///
/// | token | cell |
/// |-------|------|
/// | `.` | empty |
/// | `#` | wall |
/// | `G` | goal 1 |
/// | `g` | goal 2 |
/// | `T` | teleporter entry |
/// | `t` | teleporter exit |
/// | `S` | start (empty) |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    width: usize,
    height: usize,
    cells: Vec<CellType>,
    start: Coord,
    entry: Option<Coord>,
    exit: Option<Coord>,
}

impl Layout {
    /// The 6x6 world with goal 1 in the top right corner and the start in the bottom right
    pub fn reference() -> Self {
        Self::parse(REFERENCE).expect("reference layout is valid")
    }

    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<Vec<&str>> = text
            .trim()
            .lines()
            .map(|line| line.split_whitespace().collect())
            .collect();

        let width = rows.first().map_or(0, Vec::len);
        if width == 0 {
            return Err(Error::Layout {
                row: 0,
                message: String::from("layout is empty"),
            });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        let mut start = None;
        let mut entry = None;
        let mut exit = None;

        for (y, tokens) in rows.iter().enumerate() {
            if tokens.len() != width {
                return Err(Error::Layout {
                    row: y,
                    message: format!("expected {} cells, found {}", width, tokens.len()),
                });
            }
            for (x, token) in tokens.iter().enumerate() {
                let pos = Coord::new(x as i32, y as i32);
                let cell = match *token {
                    "." => CellType::Empty,
                    "#" => CellType::Wall,
                    "G" => CellType::Goal1,
                    "g" => CellType::Goal2,
                    "S" => {
                        unique(&mut start, pos, y, "start")?;
                        CellType::Empty
                    }
                    // teleporters stay empty until the grid is built with them enabled
                    "T" => {
                        unique(&mut entry, pos, y, "teleporter entry")?;
                        CellType::Empty
                    }
                    "t" => {
                        unique(&mut exit, pos, y, "teleporter exit")?;
                        CellType::Empty
                    }
                    other => {
                        return Err(Error::Layout {
                            row: y,
                            message: format!("unknown token `{other}`"),
                        })
                    }
                };
                cells.push(cell);
            }
        }

        let start = start.ok_or_else(|| Error::Layout {
            row: rows.len(),
            message: String::from("no start cell `S`"),
        })?;

        Ok(Self {
            width,
            height: rows.len(),
            cells,
            start,
            entry,
            exit,
        })
    }

    pub fn start(&self) -> Coord {
        self.start
    }

    /// Build the grid, placing the teleporter markers only when `teleporter` is set
    pub fn build(&self, teleporter: bool) -> Result<Grid> {
        let mut grid = Grid::from_cells(self.width, self.height, self.cells.clone())?;
        if teleporter {
            let entry = self.entry.ok_or(Error::MissingCell(CellType::Teleporter1))?;
            let exit = self.exit.ok_or(Error::MissingCell(CellType::Teleporter2))?;
            grid.place_teleporters(entry, exit)?;
        }
        Ok(grid)
    }
}

fn unique(slot: &mut Option<Coord>, pos: Coord, row: usize, name: &str) -> Result<()> {
    if slot.replace(pos).is_some() {
        return Err(Error::Layout {
            row,
            message: format!("more than one {name}"),
        });
    }
    Ok(())
}
