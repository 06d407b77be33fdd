/// The accumulated solution of an integration.
///
/// A trajectory holds time points and solution values as two parallel
/// sequences. It only grows: integrators push one `(t, u)` pair per accepted
/// step, in increasing time order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trajectory {
    times: Vec<f64>,
    values: Vec<Vec<f64>>,
}

impl Trajectory {
    /// Creates an empty trajectory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty trajectory with room for `capacity` points.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            times: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    /// Appends a point.
    pub fn push(&mut self, t: f64, u: Vec<f64>) {
        debug_assert!(
            self.times.last().is_none_or(|&last| t > last),
            "trajectory times must increase"
        );
        self.times.push(t);
        self.values.push(u);
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if no points have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Returns the time points.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Returns the solution values, one vector per time point.
    #[must_use]
    pub fn values(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Returns the last recorded point.
    #[must_use]
    pub fn last(&self) -> Option<(f64, &[f64])> {
        let t = *self.times.last()?;
        let u = self.values.last()?;
        Some((t, u))
    }

    /// Iterates over `(t, u)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> {
        self.times
            .iter()
            .zip(&self.values)
            .map(|(&t, u)| (t, u.as_slice()))
    }

    /// Returns the history of one solution component.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not smaller than the number of equations.
    #[must_use]
    pub fn component(&self, index: usize) -> Vec<f64> {
        self.values.iter().map(|u| u[index]).collect()
    }

    /// Returns the history of a scalar solution.
    ///
    /// For systems this is the history of the first component.
    #[must_use]
    pub fn scalar_values(&self) -> Vec<f64> {
        self.component(0)
    }

    /// Consumes the trajectory and returns the parallel `(times, values)` sequences.
    #[must_use]
    pub fn into_parts(self) -> (Vec<f64>, Vec<Vec<f64>>) {
        (self.times, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Trajectory {
        let mut trajectory = Trajectory::with_capacity(3);
        trajectory.push(0.0, vec![1.0, 10.0]);
        trajectory.push(0.5, vec![2.0, 20.0]);
        trajectory.push(1.0, vec![3.0, 30.0]);
        trajectory
    }

    #[test]
    fn starts_empty() {
        let trajectory = Trajectory::new();
        assert!(trajectory.is_empty());
        assert!(trajectory.last().is_none());
    }

    #[test]
    fn keeps_points_in_order() {
        let trajectory = sample();

        assert_eq!(trajectory.len(), 3);
        assert_eq!(trajectory.times(), &[0.0, 0.5, 1.0]);
        assert_eq!(trajectory.last(), Some((1.0, [3.0, 30.0].as_slice())));
    }

    #[test]
    fn extracts_components() {
        let trajectory = sample();
        assert_eq!(trajectory.component(1), vec![10.0, 20.0, 30.0]);
        assert_eq!(trajectory.scalar_values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn iterates_pairs() {
        let trajectory = sample();
        let ts: Vec<f64> = trajectory.iter().map(|(t, _)| t).collect();
        let firsts: Vec<f64> = trajectory.iter().map(|(_, u)| u[0]).collect();
        assert_eq!(ts, vec![0.0, 0.5, 1.0]);
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn splits_into_parallel_sequences() {
        let (times, values) = sample().into_parts();
        assert_eq!(times.len(), values.len());
        assert_eq!(values[1], vec![2.0, 20.0]);
    }
}
