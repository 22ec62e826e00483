use strum::VariantArray;

use crate::space::{Action, Coord};

/// Dense table of action values, one `[f64; 4]` row per grid cell in row-major order
///
/// Columns follow the discriminant order of [`Action`]: up, down, left, right.
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    width: usize,
    height: usize,
    values: Vec<[f64; 4]>,
}

impl QTable {
    /// A zero-filled table covering a `width` x `height` grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![[0.0; 4]; width * height],
        }
    }

    /// Build a table from row-major cell values
    ///
    /// **Returns** `None` if `values` does not cover the grid exactly
    pub fn from_values(width: usize, height: usize, values: Vec<[f64; 4]>) -> Option<Self> {
        (values.len() == width * height).then_some(Self {
            width,
            height,
            values,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, pos: Coord) -> Option<usize> {
        let in_bounds = pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) < self.width
            && (pos.y as usize) < self.height;
        in_bounds.then(|| pos.y as usize * self.width + pos.x as usize)
    }

    /// All four action values at `pos`
    pub fn values(&self, pos: Coord) -> Option<&[f64; 4]> {
        self.index(pos).map(|i| &self.values[i])
    }

    pub fn get(&self, pos: Coord, action: Action) -> Option<f64> {
        self.values(pos).map(|v| v[action.index()])
    }

    /// Overwrite a single value, ignored outside the table
    pub fn set(&mut self, pos: Coord, action: Action, value: f64) {
        if let Some(i) = self.index(pos) {
            self.values[i][action.index()] = value;
        }
    }

    /// Largest action value at `pos`
    ///
    /// Not masked by bounds. Cells outside the table are worth `0.0`.
    pub fn max_value(&self, pos: Coord) -> f64 {
        self.values(pos)
            .map_or(0.0, |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Actions at `pos` whose value equals the maximum, in column order
    pub fn argmax(&self, pos: Coord) -> Vec<Action> {
        let Some(values) = self.values(pos) else {
            return Vec::new();
        };
        let max = self.max_value(pos);
        Action::VARIANTS
            .iter()
            .copied()
            .filter(|a| values[a.index()] == max)
            .collect()
    }

    /// One-step Q-learning update
    ///
    /// Q(s,a) ← (1 - α) Q(s,a) + α (r + γ max<sub>a'</sub> Q(s',a'))
    ///
    /// **Returns** the new value, or `None` if `state` is outside the table
    pub fn update(
        &mut self,
        state: Coord,
        action: Action,
        reward: f64,
        next_state: Coord,
        alpha: f64,
        gamma: f64,
    ) -> Option<f64> {
        let max_next_q = self.max_value(next_state);
        let i = self.index(state)?;
        let q_value = &mut self.values[i][action.index()];
        *q_value = (1.0 - alpha) * *q_value + alpha * (reward + gamma * max_next_q);
        Some(*q_value)
    }

    /// Iterate over cell rows in row-major order
    pub fn iter(&self) -> impl Iterator<Item = &[f64; 4]> {
        self.values.iter()
    }

    /// Replace the contents with those of `other`, only if both cover the same grid
    pub fn overwrite(&mut self, other: QTable) -> Result<(), QTable> {
        if (other.width, other.height) != (self.width, self.height) {
            return Err(other);
        }
        *self = other;
        Ok(())
    }
}
