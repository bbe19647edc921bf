//! Elementwise nonlinearities and their hand-derived backward rules.
use crate::error::{NetError, NetResult};
use crate::loss::EPSILON;
use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The two activation kinds the network knows how to differentiate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    ReLU,
    Sigmoid,
}

/// Pre-activation `Z` saved by the forward pass for the matching backward step.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationCache {
    pub z: Array2<f64>,
}

impl Activation {
    /// Applies the nonlinearity to a whole matrix, returning `A` and a copy of `Z`.
    pub fn forward(self, z: &Array2<f64>) -> (Array2<f64>, ActivationCache) {
        match self {
            Activation::ReLU => relu(z),
            Activation::Sigmoid => sigmoid(z),
        }
    }

    /// Turns `dA` into `dZ` using the cached pre-activation.
    pub fn backward(self, da: &Array2<f64>, cache: &ActivationCache) -> NetResult<Array2<f64>> {
        match self {
            Activation::ReLU => relu_backward(da, cache),
            Activation::Sigmoid => sigmoid_backward(da, cache),
        }
    }
}

impl FromStr for Activation {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relu" => Ok(Activation::ReLU),
            "sigmoid" => Ok(Activation::Sigmoid),
            _ => Err(NetError::UnrecognizedActivation(s.to_string())),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Activation::ReLU => write!(f, "relu"),
            Activation::Sigmoid => write!(f, "sigmoid"),
        }
    }
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid: 1 / (1 + exp(-z)), kept inside `[EPSILON, 1 - EPSILON]` so the output
/// never saturates to exactly 0 or 1.
pub fn sigmoid(z: &Array2<f64>) -> (Array2<f64>, ActivationCache) {
    let a = z.mapv(|v| logistic(v).clamp(EPSILON, 1.0 - EPSILON));
    (a, ActivationCache { z: z.clone() })
}

/// ReLU: max(z, 0)
pub fn relu(z: &Array2<f64>) -> (Array2<f64>, ActivationCache) {
    (z.mapv(|v| v.max(0.0)), ActivationCache { z: z.clone() })
}

fn check_same_shape(op: &'static str, da: &Array2<f64>, z: &Array2<f64>) -> NetResult<()> {
    if da.shape() != z.shape() {
        return Err(NetError::shape(op, z.shape(), da.shape()));
    }
    Ok(())
}

/// dZ = dA where Z > 0, and 0 where Z <= 0.
pub fn relu_backward(da: &Array2<f64>, cache: &ActivationCache) -> NetResult<Array2<f64>> {
    check_same_shape("relu_backward", da, &cache.z)?;
    let mut dz = da.clone();
    Zip::from(&mut dz).and(&cache.z).for_each(|d, &z| {
        if z <= 0.0 {
            *d = 0.0;
        }
    });
    Ok(dz)
}

/// dZ = dA * s * (1 - s) with s = sigmoid(Z).
pub fn sigmoid_backward(da: &Array2<f64>, cache: &ActivationCache) -> NetResult<Array2<f64>> {
    check_same_shape("sigmoid_backward", da, &cache.z)?;
    let s = cache.z.mapv(logistic);
    Ok(da * &(&s * &s.mapv(|v| 1.0 - v)))
}
