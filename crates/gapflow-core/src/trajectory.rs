//! Time-indexed sequences of densities.

use crate::density::Density;

/// One propagated density and the time offset it was evaluated at.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectorySample {
    /// Time offset τ since the initial density.
    pub tau: f64,
    /// `exp(G·τ)·v0`.
    pub density: Density,
}

/// Densities at caller-chosen time offsets.
///
/// Samples keep the order in which the τ values were requested;
/// duplicates and uneven spacing are allowed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// Build from samples in caller order.
    pub fn new(samples: Vec<TrajectorySample>) -> Self {
        Self { samples }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples, in caller order.
    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    /// Sample at position `i`.
    pub fn get(&self, i: usize) -> Option<&TrajectorySample> {
        self.samples.get(i)
    }

    /// Final sample in caller order.
    pub fn last(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// The requested time offsets.
    pub fn taus(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.tau).collect()
    }

    /// Iterate over `(τ, density)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &Density)> {
        self.samples.iter().map(|s| (s.tau, &s.density))
    }

    /// Consume the trajectory and return its samples.
    pub fn into_samples(self) -> Vec<TrajectorySample> {
        self.samples
    }
}

impl FromIterator<TrajectorySample> for Trajectory {
    fn from_iter<I: IntoIterator<Item = TrajectorySample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_caller_order_and_duplicates() {
        let d = Density::uniform(3, 1.0);
        let traj: Trajectory = [2.0, 0.0, 2.0]
            .into_iter()
            .map(|tau| TrajectorySample {
                tau,
                density: d.clone(),
            })
            .collect();
        assert_eq!(traj.taus(), vec![2.0, 0.0, 2.0]);
        assert_eq!(traj.len(), 3);
        assert_eq!(traj.last().unwrap().tau, 2.0);
    }
}
