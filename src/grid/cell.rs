use strum::Display;

/// The kind of a grid cell
///
/// The discriminant of each reward-bearing kind is also the reward for stepping onto it.
#[derive(Display, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(i32)]
pub enum CellType {
    #[default]
    Empty = 0,
    Wall = -10,
    Goal1 = 1000,
    Goal2 = 50,
    Teleporter1 = -1,
    Teleporter2 = -2,
    /// Anything outside the grid, never stored in a [`Grid`](super::Grid)
    OutOfBounds = -3,
}

impl CellType {
    pub const fn value(self) -> i32 {
        self as i32
    }

    /// Whether the discriminant doubles as a reward
    pub const fn is_reward_bearing(self) -> bool {
        matches!(
            self,
            CellType::Empty | CellType::Wall | CellType::Goal1 | CellType::Goal2
        )
    }

    /// Base reward for moving onto this kind of cell
    ///
    /// Teleporters and out-of-bounds cells carry no reward.
    pub fn reward(self) -> f64 {
        if self.is_reward_bearing() {
            f64::from(self.value())
        } else {
            0.0
        }
    }

    /// Goals end the episode
    pub const fn is_goal(self) -> bool {
        matches!(self, CellType::Goal1 | CellType::Goal2)
    }

    /// Cells the agent cannot stand on
    pub const fn is_blocking(self) -> bool {
        matches!(self, CellType::Wall | CellType::OutOfBounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reward_magnitudes() {
        assert_eq!(CellType::Empty.reward(), 0.0);
        assert_eq!(CellType::Wall.reward(), -10.0);
        assert_eq!(CellType::Goal1.reward(), 1000.0);
        assert_eq!(CellType::Goal2.reward(), 50.0);
        assert_eq!(CellType::Teleporter1.reward(), 0.0, "markers are not rewards");
        assert_eq!(CellType::OutOfBounds.reward(), 0.0, "sentinel is not a reward");
    }

    #[test]
    fn marker_values() {
        assert_eq!(CellType::Teleporter1.value(), -1);
        assert_eq!(CellType::Teleporter2.value(), -2);
        assert_eq!(CellType::OutOfBounds.value(), -3);
    }
}
