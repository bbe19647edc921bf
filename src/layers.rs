//! Linear layers and the linear -> activation composite, forward and backward.
use crate::activations::{Activation, ActivationCache};
use crate::error::{NetError, NetResult};
use ndarray::{Array2, Axis};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::Rng;

/// Scale applied to standard-normal draws when initializing weights.
pub const INIT_SCALE: f64 = 0.05;

/// Weights `w` of shape `(units, units_prev)` and bias `b` of shape `(units, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerParams {
    pub w: Array2<f64>,
    pub b: Array2<f64>,
}

impl LayerParams {
    /// Draws `w` from N(0, 1) * [`INIT_SCALE`] and zeroes `b`.
    pub fn random<R: Rng + ?Sized>(input_size: usize, output_size: usize, rng: &mut R) -> Self {
        let w: Array2<f64> =
            Array2::random_using((output_size, input_size), StandardNormal, rng) * INIT_SCALE;
        let b = Array2::zeros((output_size, 1));
        Self { w, b }
    }

    pub fn input_size(&self) -> usize {
        self.w.ncols()
    }

    pub fn output_size(&self) -> usize {
        self.w.nrows()
    }
}

/// Independent copies of the inputs to one linear step.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearCache {
    pub a_prev: Array2<f64>,
    pub w: Array2<f64>,
    pub b: Array2<f64>,
}

/// Everything one layer's backward step needs from its forward step.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerCache {
    pub linear: LinearCache,
    pub activation: ActivationCache,
}

/// Z = W·A + b, with `b` broadcast over the example columns.
pub fn linear_forward(
    a: &Array2<f64>,
    w: &Array2<f64>,
    b: &Array2<f64>,
) -> NetResult<(Array2<f64>, LinearCache)> {
    if w.ncols() != a.nrows() {
        return Err(NetError::shape(
            "linear_forward",
            &[w.ncols(), a.ncols()],
            a.shape(),
        ));
    }
    if b.shape() != [w.nrows(), 1] {
        return Err(NetError::shape("linear_forward", &[w.nrows(), 1], b.shape()));
    }
    let z = w.dot(a) + b;
    let cache = LinearCache {
        a_prev: a.clone(),
        w: w.clone(),
        b: b.clone(),
    };
    Ok((z, cache))
}

/// Returns `(dA_prev, dW, db)` for one linear step.
///
/// With `m` the number of examples:
/// `dA_prev = Wᵀ·dZ`, `dW = dZ·A_prevᵀ / m`, `db = rowsum(dZ) / m`.
pub fn linear_backward(
    dz: &Array2<f64>,
    cache: &LinearCache,
) -> NetResult<(Array2<f64>, Array2<f64>, Array2<f64>)> {
    let (dw, db) = linear_param_gradients(dz, cache)?;
    let da_prev = cache.w.t().dot(dz);
    Ok((da_prev, dw, db))
}

/// `(dW, db)` only, for the first layer where nothing consumes `dA_prev`.
pub fn linear_param_gradients(
    dz: &Array2<f64>,
    cache: &LinearCache,
) -> NetResult<(Array2<f64>, Array2<f64>)> {
    let LinearCache { a_prev, w, .. } = cache;
    let expected = [w.nrows(), a_prev.ncols()];
    if dz.shape() != expected {
        return Err(NetError::shape("linear_backward", &expected, dz.shape()));
    }
    if a_prev.ncols() == 0 {
        return Err(NetError::EmptyDataset);
    }
    let m = a_prev.ncols() as f64;

    let dw = dz.dot(&a_prev.t()) / m;
    let db = dz.sum_axis(Axis(1)).insert_axis(Axis(1)) / m;
    Ok((dw, db))
}

/// One full layer: linear step followed by `activation`.
pub fn linear_activation_forward(
    a_prev: &Array2<f64>,
    w: &Array2<f64>,
    b: &Array2<f64>,
    activation: Activation,
) -> NetResult<(Array2<f64>, LayerCache)> {
    let (z, linear) = linear_forward(a_prev, w, b)?;
    let (a, activation) = activation.forward(&z);
    Ok((a, LayerCache { linear, activation }))
}

/// Backward step for one layer; consumes the cache its forward step produced.
pub fn linear_activation_backward(
    da: &Array2<f64>,
    cache: LayerCache,
    activation: Activation,
) -> NetResult<(Array2<f64>, Array2<f64>, Array2<f64>)> {
    let dz = activation.backward(da, &cache.activation)?;
    linear_backward(&dz, &cache.linear)
}
