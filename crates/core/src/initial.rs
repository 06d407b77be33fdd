/// The starting value of an integration.
///
/// A scalar initial condition describes a single ODE (`neq = 1`); a vector
/// describes a system with one equation per component. Conversions from `f64`,
/// `Vec<f64>`, slices, and arrays let callers pass either directly.
#[derive(Debug, Clone, PartialEq)]
pub enum InitialCondition {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl InitialCondition {
    /// Returns the number of equations this initial condition implies.
    #[must_use]
    pub fn neq(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Vector(values) => values.len(),
        }
    }

    /// Returns true for a scalar initial condition.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Returns the components as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Vector(values) => values,
        }
    }
}

impl From<f64> for InitialCondition {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for InitialCondition {
    fn from(values: Vec<f64>) -> Self {
        Self::Vector(values)
    }
}

impl From<&[f64]> for InitialCondition {
    fn from(values: &[f64]) -> Self {
        Self::Vector(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for InitialCondition {
    fn from(values: [f64; N]) -> Self {
        Self::Vector(values.to_vec())
    }
}
