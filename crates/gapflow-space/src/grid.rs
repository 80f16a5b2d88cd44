//! Uniform 1D grid over a truncated interval.

use crate::error::GridError;

/// Half-step ties closer than this (in units of `step`) go to the lower node.
const TIE_EPSILON: f64 = 1e-9;

/// A uniform grid over `[x_min, x_max]` with spacing `step`.
///
/// Node `i` sits at `x_min + i * step` for `0 <= i < node_count`, where
/// `node_count = round((x_max - x_min) / step) + 1`. When the width is
/// not a whole number of steps the last node is snapped to the nearest
/// multiple and may differ slightly from `x_max`.
///
/// # Examples
///
/// ```
/// use gapflow_space::GridSpec;
///
/// let grid = GridSpec::new(-2.0, 2.0, 0.01).unwrap();
/// assert_eq!(grid.node_count(), 401);
///
/// // The reset node is the node nearest 0.
/// assert_eq!(grid.reset_node(), Some(200));
/// assert!(grid.node(200).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    x_min: f64,
    x_max: f64,
    step: f64,
    node_count: usize,
}

impl GridSpec {
    /// Maximum node count. Generators are sparse, but the stationary
    /// solver works on the dense matrix and refuses grids above its own
    /// much smaller limit.
    pub const MAX_NODES: usize = 1 << 24;

    /// Create a grid from its bounds and spacing.
    ///
    /// Returns `Err(GridError::InvalidStep)` if `step <= 0` or is not
    /// finite, `Err(GridError::InvalidBounds)` if `x_max <= x_min` or a
    /// bound is not finite, and `Err(GridError::TooManyNodes)` if the
    /// grid exceeds [`MAX_NODES`](Self::MAX_NODES).
    pub fn new(x_min: f64, x_max: f64, step: f64) -> Result<Self, GridError> {
        if !step.is_finite() || step <= 0.0 {
            return Err(GridError::InvalidStep { step });
        }
        if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
            return Err(GridError::InvalidBounds { x_min, x_max });
        }
        let count = ((x_max - x_min) / step).round() + 1.0;
        if !count.is_finite() || count > Self::MAX_NODES as f64 {
            return Err(GridError::TooManyNodes {
                count,
                max: Self::MAX_NODES,
            });
        }
        Ok(Self {
            x_min,
            x_max,
            step,
            node_count: count as usize,
        })
    }

    /// Lower bound.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Upper bound as configured.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Node spacing.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// `x_max - x_min`.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Coordinate of node `i`.
    pub fn node(&self, i: usize) -> f64 {
        self.x_min + i as f64 * self.step
    }

    /// All node coordinates in ascending order.
    pub fn nodes(&self) -> Vec<f64> {
        (0..self.node_count).map(|i| self.node(i)).collect()
    }

    /// Whether `x` lies within `[x_min, x_max]`.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }

    /// Index of the node nearest `x`, or `None` if `x` is off the grid.
    ///
    /// An exact half-step tie resolves to the lower index, so the
    /// result is deterministic on grids with an even node count.
    pub fn nearest_node(&self, x: f64) -> Option<usize> {
        if !self.contains(x) {
            return None;
        }
        let pos = (x - self.x_min) / self.step;
        let lower = pos.floor();
        let frac = pos - lower;
        let idx = if frac > 0.5 + TIE_EPSILON {
            lower as usize + 1
        } else {
            lower as usize
        };
        Some(idx.min(self.node_count - 1))
    }

    /// The node the reset process jumps to: the node nearest 0.
    ///
    /// `None` if 0 lies outside the grid.
    pub fn reset_node(&self) -> Option<usize> {
        self.nearest_node(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_grid_shape() {
        let g = GridSpec::new(-2.0, 2.0, 0.01).unwrap();
        assert_eq!(g.node_count(), 401);
        let nodes = g.nodes();
        assert!((nodes[0] + 2.0).abs() < 1e-12);
        assert!((nodes[400] - 2.0).abs() < 1e-9);
        for i in 0..401 {
            assert!((nodes[i] + nodes[400 - i]).abs() < 1e-9, "not symmetric at {i}");
        }
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(matches!(
            GridSpec::new(-1.0, 1.0, 0.0),
            Err(GridError::InvalidStep { .. })
        ));
        assert!(matches!(
            GridSpec::new(-1.0, 1.0, -0.1),
            Err(GridError::InvalidStep { .. })
        ));
        assert!(matches!(
            GridSpec::new(-1.0, 1.0, f64::NAN),
            Err(GridError::InvalidStep { .. })
        ));
    }

    #[test]
    fn rejects_inverted_bounds() {
        assert!(matches!(
            GridSpec::new(1.0, 1.0, 0.1),
            Err(GridError::InvalidBounds { .. })
        ));
        assert!(matches!(
            GridSpec::new(2.0, -2.0, 0.1),
            Err(GridError::InvalidBounds { .. })
        ));
        assert!(matches!(
            GridSpec::new(f64::NEG_INFINITY, 0.0, 0.1),
            Err(GridError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn rejects_oversized_grid() {
        assert!(matches!(
            GridSpec::new(0.0, 1.0, 1e-12),
            Err(GridError::TooManyNodes { .. })
        ));
    }

    #[test]
    fn even_grid_tie_goes_to_lower_node() {
        // Nodes: -1.0, -0.6, -0.2, 0.2, 0.6, 1.0. Zero is equidistant
        // from nodes 2 and 3.
        let g = GridSpec::new(-1.0, 1.0, 0.4).unwrap();
        assert_eq!(g.node_count(), 6);
        assert_eq!(g.reset_node(), Some(2));
    }

    #[test]
    fn nearest_node_rounds() {
        let g = GridSpec::new(0.0, 1.0, 0.1).unwrap();
        assert_eq!(g.nearest_node(0.34), Some(3));
        assert_eq!(g.nearest_node(0.36), Some(4));
        assert_eq!(g.nearest_node(1.0), Some(10));
        assert_eq!(g.nearest_node(1.5), None);
    }

    #[test]
    fn no_reset_node_when_zero_off_grid() {
        let g = GridSpec::new(0.5, 2.0, 0.1).unwrap();
        assert_eq!(g.reset_node(), None);
    }

    #[test]
    fn coarse_step_gives_single_node() {
        let g = GridSpec::new(0.0, 1.0, 10.0).unwrap();
        assert_eq!(g.node_count(), 1);
        assert_eq!(g.reset_node(), Some(0));
    }

    proptest! {
        #[test]
        fn node_count_matches_formula(
            half_width in 0.1f64..10.0,
            step in 0.005f64..0.5,
        ) {
            let g = GridSpec::new(-half_width, half_width, step).unwrap();
            let expected = ((2.0 * half_width) / step).round() as usize + 1;
            prop_assert_eq!(g.node_count(), expected);

            let nodes = g.nodes();
            prop_assert!(nodes.windows(2).all(|w| w[1] > w[0]));
        }

        #[test]
        fn reset_node_is_nearest_zero(
            half_width in 0.1f64..10.0,
            step in 0.005f64..0.5,
        ) {
            let g = GridSpec::new(-half_width, half_width, step).unwrap();
            let r = g.reset_node().unwrap();
            let best = g.node(r).abs();
            for i in 0..g.node_count() {
                prop_assert!(g.node(i).abs() >= best - 1e-9);
            }
        }
    }
}
