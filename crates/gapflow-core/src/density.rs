//! Piecewise-constant probability densities over a uniform grid.

/// A density over a uniform grid with spacing `step`.
///
/// Entry `i` is the density value on the cell around node `i`, so the
/// probability mass of the cell is `values[i] * step`. A valid
/// probability distribution has non-negative values and
/// [`mass()`](Density::mass) close to 1; this type does not enforce
/// either, because intermediate and shocked densities are useful too.
///
/// # Examples
///
/// ```
/// use gapflow_core::Density;
///
/// let d = Density::uniform(5, 0.5);
/// assert!((d.mass() - 1.0).abs() < 1e-12);
/// assert_eq!(d.len(), 5);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Density {
    values: Vec<f64>,
    step: f64,
}

impl Density {
    /// Wrap raw values with the grid spacing they were computed on.
    pub fn new(values: Vec<f64>, step: f64) -> Self {
        debug_assert!(step > 0.0, "step must be positive");
        Self { values, step }
    }

    /// Uniform density with unit mass.
    pub fn uniform(node_count: usize, step: f64) -> Self {
        let v = if node_count == 0 {
            0.0
        } else {
            1.0 / (node_count as f64 * step)
        };
        Self::new(vec![v; node_count], step)
    }

    /// All mass on a single node. Returns `None` if `index` is out of range.
    pub fn point_mass(node_count: usize, index: usize, step: f64) -> Option<Self> {
        if index >= node_count {
            return None;
        }
        let mut values = vec![0.0; node_count];
        values[index] = 1.0 / step;
        Some(Self::new(values, step))
    }

    /// Density values, one per node.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Consume the density and return its values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Grid spacing.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the density has no nodes.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Total probability mass, `sum(values) * step`.
    pub fn mass(&self) -> f64 {
        self.values.iter().sum::<f64>() * self.step
    }

    /// Smallest entry, or `None` when empty.
    pub fn min_value(&self) -> Option<f64> {
        self.values.iter().copied().reduce(f64::min)
    }

    /// Rescaled copy with unit mass. `None` if the mass is not positive
    /// and finite.
    pub fn normalized(&self) -> Option<Self> {
        let mass = self.mass();
        if !mass.is_finite() || mass <= 0.0 {
            return None;
        }
        Some(Self::new(
            self.values.iter().map(|v| v / mass).collect(),
            self.step,
        ))
    }

    /// Mean coordinate, weighting `nodes` by the density.
    ///
    /// Returns NaN when the mass is zero.
    pub fn mean(&self, nodes: &[f64]) -> f64 {
        debug_assert_eq!(nodes.len(), self.values.len());
        let first: f64 = nodes.iter().zip(&self.values).map(|(x, v)| x * v).sum();
        first * self.step / self.mass()
    }

    /// Variance of the coordinate under the density.
    pub fn variance(&self, nodes: &[f64]) -> f64 {
        let mean = self.mean(nodes);
        let second: f64 = nodes
            .iter()
            .zip(&self.values)
            .map(|(x, v)| (x - mean) * (x - mean) * v)
            .sum();
        second * self.step / self.mass()
    }

    /// L1 distance between two densities on the same grid,
    /// `sum(|a - b|) * step`.
    pub fn l1_distance(&self, other: &Density) -> f64 {
        debug_assert_eq!(self.values.len(), other.values.len());
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .sum::<f64>()
            * self.step
    }

    /// Largest pointwise absolute difference.
    pub fn max_abs_diff(&self, other: &Density) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}
