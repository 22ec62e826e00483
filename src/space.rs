use std::fmt;

use strum::{EnumIter, FromRepr, VariantArray};

/// A cell position, `x` is the column and `y` is the row
///
/// Coordinates are signed so that a move off the edge of the grid is representable
/// and can be checked against the grid bounds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two cells
    pub fn distance(self, other: Coord) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four moves available to the agent
///
/// The discriminants fix the column order of the Q-table and of the table file.
#[derive(EnumIter, VariantArray, FromRepr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Move one cell in the direction of `action`, without any bounds check
pub fn step_dir(pos: Coord, action: Action) -> Coord {
    match action {
        Action::Up => Coord::new(pos.x, pos.y - 1),
        Action::Down => Coord::new(pos.x, pos.y + 1),
        Action::Left => Coord::new(pos.x - 1, pos.y),
        Action::Right => Coord::new(pos.x + 1, pos.y),
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn moves_follow_axes() {
        let pos = Coord::new(2, 2);
        assert_eq!(step_dir(pos, Action::Up), Coord::new(2, 1), "Up decrements y");
        assert_eq!(step_dir(pos, Action::Down), Coord::new(2, 3), "Down increments y");
        assert_eq!(step_dir(pos, Action::Left), Coord::new(1, 2), "Left decrements x");
        assert_eq!(step_dir(pos, Action::Right), Coord::new(3, 2), "Right increments x");
    }

    #[test]
    fn moves_do_not_clamp() {
        let corner = Coord::new(0, 0);
        assert_eq!(step_dir(corner, Action::Up), Coord::new(0, -1));
        assert_eq!(step_dir(corner, Action::Left), Coord::new(-1, 0));
    }

    #[test]
    fn action_order_is_stable() {
        let order: Vec<_> = Action::iter().map(Action::index).collect();
        assert_eq!(order, [0, 1, 2, 3]);
        assert_eq!(Action::from_repr(2), Some(Action::Left));
    }

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(Coord::new(0, 0).distance(Coord::new(3, 4)), 5.0);
        assert_eq!(Coord::new(1, 1).distance(Coord::new(1, 1)), 0.0);
    }
}
