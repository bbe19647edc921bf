//! The L-layer network: parameters, forward and backward passes, gradient descent
//! updates, and persistence.
use crate::activations::Activation;
use crate::error::{NetError, NetResult};
use crate::layers::{
    linear_activation_backward, linear_activation_forward, linear_param_gradients, LayerCache,
    LayerParams,
};
use crate::loss::cost_derivative;
use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

/// Layer widths from input to output: `[d0, d1, ..., dL]` with `dL == 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerDims(Vec<usize>);

impl LayerDims {
    pub fn new(dims: Vec<usize>) -> NetResult<Self> {
        if dims.len() < 2 {
            return Err(NetError::Configuration(format!(
                "layer dims need at least an input and an output size, got {:?}",
                dims
            )));
        }
        if dims.contains(&0) {
            return Err(NetError::Configuration(format!(
                "layer sizes must be positive, got {:?}",
                dims
            )));
        }
        if dims[dims.len() - 1] != 1 {
            return Err(NetError::Configuration(format!(
                "binary classifier needs a single output unit, got {}",
                dims[dims.len() - 1]
            )));
        }
        Ok(Self(dims))
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of weight layers, `L`.
    pub fn num_layers(&self) -> usize {
        self.0.len() - 1
    }

    pub fn input_size(&self) -> usize {
        self.0[0]
    }
}

impl TryFrom<Vec<usize>> for LayerDims {
    type Error = NetError;

    fn try_from(dims: Vec<usize>) -> Result<Self, Self::Error> {
        LayerDims::new(dims)
    }
}

impl From<LayerDims> for Vec<usize> {
    fn from(dims: LayerDims) -> Self {
        dims.0
    }
}

impl FromStr for LayerDims {
    type Err = NetError;

    /// Parses `"784,20,7,5,1"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dims = s
            .split(',')
            .map(|part| {
                part.trim().parse::<usize>().map_err(|_| {
                    NetError::Configuration(format!("invalid layer size '{}' in '{}'", part, s))
                })
            })
            .collect::<NetResult<Vec<_>>>()?;
        LayerDims::new(dims)
    }
}

impl fmt::Display for LayerDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Weights and biases for every layer. Index `i` holds layer `i + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    layers: Vec<LayerParams>,
}

/// Forward-pass caches in layer order, one per layer.
pub type Caches = Vec<LayerCache>;

/// Gradients for one layer. `da` is taken with respect to the layer's output activation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub da: Array2<f64>,
    pub dw: Array2<f64>,
    pub db: Array2<f64>,
}

/// Gradients for all layers in order
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub layers: Vec<LayerGradients>,
    /// Gradient with respect to the network input `X`; only filled by
    /// [`model_backward_with_input`].
    pub da_input: Option<Array2<f64>>,
}

impl Gradients {
    /// 1-based layer lookup.
    pub fn layer(&self, l: usize) -> Option<&LayerGradients> {
        l.checked_sub(1).and_then(|i| self.layers.get(i))
    }
}

impl Parameters {
    /// Builds parameters from explicit layers, checking that shapes chain together.
    pub fn from_layers(layers: Vec<LayerParams>) -> NetResult<Self> {
        let Some(last) = layers.last() else {
            return Err(NetError::Configuration("network has no layers".to_string()));
        };
        if last.output_size() != 1 {
            return Err(NetError::shape("output layer", &[1, last.input_size()], last.w.shape()));
        }
        for (i, layer) in layers.iter().enumerate() {
            if layer.b.shape() != [layer.output_size(), 1] {
                return Err(NetError::shape("bias", &[layer.output_size(), 1], layer.b.shape()));
            }
            if i > 0 && layer.input_size() != layers[i - 1].output_size() {
                return Err(NetError::shape(
                    "weight chain",
                    &[layer.output_size(), layers[i - 1].output_size()],
                    layer.w.shape(),
                ));
            }
        }
        Ok(Self { layers })
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[LayerParams] {
        &self.layers
    }

    /// 1-based layer lookup.
    pub fn layer(&self, l: usize) -> Option<&LayerParams> {
        l.checked_sub(1).and_then(|i| self.layers.get(i))
    }

    /// ReLU for hidden layers, sigmoid for the output layer.
    pub fn activation(&self, l: usize) -> Activation {
        if l == self.layers.len() {
            Activation::Sigmoid
        } else {
            Activation::ReLU
        }
    }

    pub fn dims(&self) -> LayerDims {
        let mut dims = vec![self.layers[0].input_size()];
        dims.extend(self.layers.iter().map(LayerParams::output_size));
        LayerDims(dims)
    }

    /// Save parameters as gzipped JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let dto = ParametersDto::from_parameters(self)?;
        let json = serde_json::to_vec(&dto)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        let mut enc = GzEncoder::new(file, Compression::default());
        enc.write_all(&json)?;
        enc.finish()?;
        tracing::debug!("saved {} layers to {}", self.num_layers(), path.display());
        Ok(())
    }

    /// Load parameters written by [`Parameters::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let mut dec = GzDecoder::new(file);
        let mut buf = Vec::new();
        dec.read_to_end(&mut buf)
            .with_context(|| format!("decompressing {}", path.display()))?;
        let dto: ParametersDto = serde_json::from_slice(&buf)?;
        dto.into_parameters()
    }
}

impl fmt::Display for Parameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network: {}", self.dims())
    }
}

/// Initializes parameters with the thread-local RNG.
pub fn initialize_parameters(dims: &LayerDims) -> Parameters {
    initialize_parameters_with_rng(dims, &mut rand::thread_rng())
}

/// Weights ~ N(0, 1) * 0.05, biases zero, for each consecutive pair in `dims`.
pub fn initialize_parameters_with_rng<R: Rng + ?Sized>(
    dims: &LayerDims,
    rng: &mut R,
) -> Parameters {
    let layers: Vec<LayerParams> = dims
        .as_slice()
        .windows(2)
        .map(|pair| LayerParams::random(pair[0], pair[1], rng))
        .collect();
    tracing::debug!("initialized network {}", dims);
    Parameters { layers }
}

/// Runs `[LINEAR -> RELU] * (L-1) -> LINEAR -> SIGMOID` over the columns of `x`.
///
/// Returns the output probabilities `AL` of shape `(1, m)` and one cache per layer.
pub fn model_forward(x: &Array2<f64>, params: &Parameters) -> NetResult<(Array2<f64>, Caches)> {
    let mut caches = Vec::with_capacity(params.num_layers());
    let mut a = x.clone();
    for (i, layer) in params.layers.iter().enumerate() {
        let activation = params.activation(i + 1);
        let (next, cache) = linear_activation_forward(&a, &layer.w, &layer.b, activation)?;
        caches.push(cache);
        a = next;
    }
    Ok((a, caches))
}

/// Backpropagates the cross-entropy cost through every layer, output first.
///
/// `y` may be any array with the same number of elements as `al`; it is reshaped
/// to match. The caches are consumed. `da_input` is left empty; use
/// [`model_backward_with_input`] when the gradient with respect to `X` is needed.
pub fn model_backward(al: &Array2<f64>, y: &Array2<f64>, caches: Caches) -> NetResult<Gradients> {
    backward_pass(al, y, caches, false)
}

/// [`model_backward`] that also computes `dX = W1ᵀ·dZ1` into `da_input`.
pub fn model_backward_with_input(
    al: &Array2<f64>,
    y: &Array2<f64>,
    caches: Caches,
) -> NetResult<Gradients> {
    backward_pass(al, y, caches, true)
}

fn backward_pass(
    al: &Array2<f64>,
    y: &Array2<f64>,
    mut caches: Caches,
    with_input: bool,
) -> NetResult<Gradients> {
    let y = if y.shape() == al.shape() {
        y.clone()
    } else if y.len() == al.len() {
        y.clone()
            .into_shape(al.raw_dim())
            .map_err(|_| NetError::shape("model_backward", al.shape(), y.shape()))?
    } else {
        return Err(NetError::shape("model_backward", al.shape(), y.shape()));
    };
    if caches.is_empty() {
        return Err(NetError::Configuration("no caches to backpropagate".to_string()));
    }
    let input_cache = caches.remove(0);

    let mut grads = Vec::with_capacity(caches.len() + 1);
    let mut da = cost_derivative(al, &y)?;
    let mut activation = Activation::Sigmoid;
    while let Some(cache) = caches.pop() {
        let (da_prev, dw, db) = linear_activation_backward(&da, cache, activation)?;
        grads.push(LayerGradients { da, dw, db });
        da = da_prev;
        activation = Activation::ReLU;
    }

    let dz = activation.backward(&da, &input_cache.activation)?;
    let (dw, db) = linear_param_gradients(&dz, &input_cache.linear)?;
    let da_input = with_input.then(|| input_cache.linear.w.t().dot(&dz));
    grads.push(LayerGradients { da, dw, db });

    // reverse back to layer order
    grads.reverse();
    Ok(Gradients {
        layers: grads,
        da_input,
    })
}

/// One gradient descent step: `W -= lr * dW`, `b -= lr * db` for every layer.
pub fn update_parameters(
    params: &mut Parameters,
    grads: &Gradients,
    learning_rate: f64,
) -> NetResult<()> {
    if !(learning_rate > 0.0 && learning_rate.is_finite()) {
        return Err(NetError::Configuration(format!(
            "learning rate must be positive, got {}",
            learning_rate
        )));
    }
    if grads.layers.len() != params.layers.len() {
        return Err(NetError::shape(
            "update_parameters",
            &[params.layers.len()],
            &[grads.layers.len()],
        ));
    }
    for (layer, g) in params.layers.iter().zip(&grads.layers) {
        if g.dw.shape() != layer.w.shape() {
            return Err(NetError::shape("update_parameters", layer.w.shape(), g.dw.shape()));
        }
        if g.db.shape() != layer.b.shape() {
            return Err(NetError::shape("update_parameters", layer.b.shape(), g.db.shape()));
        }
    }
    for (layer, g) in params.layers.iter_mut().zip(&grads.layers) {
        layer.w.scaled_add(-learning_rate, &g.dw);
        layer.b.scaled_add(-learning_rate, &g.db);
    }
    Ok(())
}

// ============ Persistence DTOs ============

#[derive(Debug, Serialize, Deserialize)]
struct LayerDto {
    input_size: usize,
    output_size: usize,
    weights: Vec<Vec<f64>>, // [output_size][input_size]
    bias: Vec<f64>,         // [output_size]
    activation: Activation,
}

#[derive(Debug, Serialize, Deserialize)]
struct ParametersDto {
    dims: LayerDims,
    layers: Vec<LayerDto>,
}

impl ParametersDto {
    fn from_parameters(params: &Parameters) -> Result<Self> {
        if params
            .layers
            .iter()
            .any(|l| l.w.iter().chain(l.b.iter()).any(|v| !v.is_finite()))
        {
            return Err(anyhow!("refusing to save parameters containing non-finite values"));
        }
        let layers = params
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| LayerDto {
                input_size: layer.input_size(),
                output_size: layer.output_size(),
                weights: layer.w.outer_iter().map(|row| row.to_vec()).collect(),
                bias: layer.b.iter().copied().collect(),
                activation: params.activation(i + 1),
            })
            .collect();
        Ok(Self {
            dims: params.dims(),
            layers,
        })
    }

    fn into_parameters(self) -> Result<Parameters> {
        if self.layers.len() != self.dims.num_layers() {
            return Err(anyhow!(
                "dims {} describe {} layers but {} were stored",
                self.dims,
                self.dims.num_layers(),
                self.layers.len()
            ));
        }
        let num_layers = self.layers.len();
        let mut layers = Vec::with_capacity(num_layers);
        for (i, ld) in self.layers.into_iter().enumerate() {
            let expected = if i + 1 == num_layers {
                Activation::Sigmoid
            } else {
                Activation::ReLU
            };
            if ld.activation != expected {
                return Err(anyhow!(
                    "layer {} stored activation {}, expected {}",
                    i + 1,
                    ld.activation,
                    expected
                ));
            }
            let flat: Vec<f64> = ld.weights.into_iter().flatten().collect();
            let w = Array2::from_shape_vec((ld.output_size, ld.input_size), flat)
                .with_context(|| format!("layer {} weights", i + 1))?;
            let b = Array2::from_shape_vec((ld.output_size, 1), ld.bias)
                .with_context(|| format!("layer {} bias", i + 1))?;
            layers.push(LayerParams { w, b });
        }
        let params = Parameters::from_layers(layers)?;
        if params.dims() != self.dims {
            return Err(anyhow!(
                "stored dims {} do not match layers {}",
                self.dims,
                params.dims()
            ));
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::compute_cost;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dims(v: &[usize]) -> LayerDims {
        LayerDims::new(v.to_vec()).unwrap()
    }

    #[test]
    fn layer_dims_validation() {
        assert!(LayerDims::new(vec![3]).is_err());
        assert!(LayerDims::new(vec![]).is_err());
        assert!(LayerDims::new(vec![3, 0, 1]).is_err());
        assert!(LayerDims::new(vec![3, 2]).is_err());
        let parsed: LayerDims = "784, 20,7,5,1".parse().unwrap();
        assert_eq!(parsed.as_slice(), &[784, 20, 7, 5, 1]);
        assert_eq!(parsed.num_layers(), 4);
        assert!("784,x,1".parse::<LayerDims>().is_err());
    }

    #[test]
    fn initialization_follows_shape_law() {
        let mut rng = StdRng::seed_from_u64(1);
        let d = dims(&[784, 20, 7, 5, 1]);
        let params = initialize_parameters_with_rng(&d, &mut rng);
        assert_eq!(params.num_layers(), 4);
        for l in 1..=4 {
            let layer = params.layer(l).unwrap();
            assert_eq!(layer.w.shape(), &[d.as_slice()[l], d.as_slice()[l - 1]]);
            assert_eq!(layer.b.shape(), &[d.as_slice()[l], 1]);
        }
        assert!(params.layer(0).is_none());
        assert!(params.layer(5).is_none());
        assert_eq!(params.dims(), d);
        assert_eq!(params.to_string(), "Network: [784, 20, 7, 5, 1]");
    }

    #[test]
    fn forward_output_is_a_probability_row() {
        let mut rng = StdRng::seed_from_u64(2);
        let params = initialize_parameters_with_rng(&dims(&[6, 4, 3, 1]), &mut rng);
        let x = Array2::random_using((6, 9), Uniform::new(-1.0, 1.0), &mut rng);
        let (al, caches) = model_forward(&x, &params).unwrap();
        assert_eq!(al.shape(), &[1, 9]);
        assert!(al.iter().all(|&p| p > 0.0 && p < 1.0));
        assert_eq!(caches.len(), 3);
        assert_eq!(caches[0].linear.a_prev, x);
        assert_eq!(caches[2].activation.z.shape(), &[1, 9]);
    }

    #[test]
    fn forward_output_never_reaches_zero_or_one() {
        let params = Parameters::from_layers(vec![LayerParams {
            w: array![[1.0]],
            b: array![[0.0]],
        }])
        .unwrap();
        let (al, _) = model_forward(&array![[40.0, -800.0]], &params).unwrap();
        assert!(al.iter().all(|&p| p > 0.0 && p < 1.0), "saturated: {}", al);
    }

    #[test]
    fn forward_rejects_wrong_feature_count() {
        let params = initialize_parameters(&dims(&[5, 2, 1]));
        let x = Array2::zeros((4, 3));
        assert!(matches!(
            model_forward(&x, &params),
            Err(NetError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn backward_gradients_mirror_parameter_shapes() {
        let mut rng = StdRng::seed_from_u64(3);
        let params = initialize_parameters_with_rng(&dims(&[5, 4, 3, 1]), &mut rng);
        for m in [1, 2, 17] {
            let x = Array2::random_using((5, m), Uniform::new(-1.0, 1.0), &mut rng);
            let y = Array2::from_shape_fn((1, m), |(_, j)| (j % 2) as f64);
            let (al, caches) = model_forward(&x, &params).unwrap();
            let grads = model_backward(&al, &y, caches).unwrap();
            assert_eq!(grads.layers.len(), 3);
            for (layer, g) in params.layers().iter().zip(&grads.layers) {
                assert_eq!(g.dw.shape(), layer.w.shape());
                assert_eq!(g.db.shape(), layer.b.shape());
                assert_eq!(g.da.shape(), &[layer.output_size(), m]);
            }
            assert_eq!(grads.da_input, None);
        }
    }

    #[test]
    fn input_gradient_is_opt_in() {
        let mut rng = StdRng::seed_from_u64(6);
        let params = initialize_parameters_with_rng(&dims(&[3, 2, 1]), &mut rng);
        let x = Array2::random_using((3, 5), Uniform::new(-1.0, 1.0), &mut rng);
        let y = array![[1.0, 0.0, 1.0, 0.0, 1.0]];
        let (al, caches) = model_forward(&x, &params).unwrap();
        let plain = model_backward(&al, &y, caches.clone()).unwrap();
        let full = model_backward_with_input(&al, &y, caches).unwrap();

        assert_eq!(plain.layers, full.layers);
        assert_eq!(full.da_input.unwrap().shape(), x.shape());
    }

    #[test]
    fn single_layer_backward_uses_sigmoid() {
        let params = Parameters::from_layers(vec![LayerParams {
            w: array![[1.0, -1.0]],
            b: array![[0.0]],
        }])
        .unwrap();
        let x = array![[1.0, 0.0], [0.0, 1.0]];
        let y = array![[1.0, 0.0]];
        let (al, caches) = model_forward(&x, &params).unwrap();
        let grads = model_backward_with_input(&al, &y, caches).unwrap();
        // dZ = AL - Y for a sigmoid output under cross-entropy.
        let dz = &al - &y;
        let expected_dw = dz.dot(&x.t()) / 2.0;
        assert_abs_diff_eq!(grads.layers[0].dw, expected_dw, epsilon = 1e-9);
        let expected_dx = params.layer(1).unwrap().w.t().dot(&dz);
        assert_abs_diff_eq!(grads.da_input.unwrap(), expected_dx, epsilon = 1e-9);
    }

    #[test]
    fn backward_accepts_flat_labels() {
        let mut rng = StdRng::seed_from_u64(4);
        let params = initialize_parameters_with_rng(&dims(&[3, 2, 1]), &mut rng);
        let x = Array2::random_using((3, 4), Uniform::new(-1.0, 1.0), &mut rng);
        let (al, caches) = model_forward(&x, &params).unwrap();
        let y_col = array![[1.0], [0.0], [1.0], [0.0]];
        let from_col = model_backward(&al, &y_col, caches.clone()).unwrap();
        let from_row = model_backward(&al, &array![[1.0, 0.0, 1.0, 0.0]], caches).unwrap();
        assert_eq!(from_col, from_row);

        let (al, caches) = model_forward(&x, &params).unwrap();
        assert!(model_backward(&al, &array![[1.0, 0.0]], caches).is_err());
    }

    fn cost_of(params: &Parameters, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        let (al, _) = model_forward(x, params).unwrap();
        compute_cost(&al, y).unwrap()
    }

    #[test]
    fn analytic_gradients_match_finite_differences() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut params = initialize_parameters_with_rng(&dims(&[4, 3, 2, 1]), &mut rng);
        // Larger weights so the ReLUs are not all near zero.
        for layer in params.layers.iter_mut() {
            layer.w.mapv_inplace(|w| w * 20.0);
            layer.b.fill(0.1);
        }
        let x = Array2::random_using((4, 6), Uniform::new(-1.0, 1.0), &mut rng);
        let y = array![[1.0, 0.0, 1.0, 1.0, 0.0, 0.0]];

        let (al, caches) = model_forward(&x, &params).unwrap();
        let grads = model_backward(&al, &y, caches).unwrap();

        let h = 1e-6;
        for l in 0..params.num_layers() {
            for idx in [[0usize, 0], [0, 1]] {
                let mut plus = params.clone();
                plus.layers[l].w[idx] += h;
                let mut minus = params.clone();
                minus.layers[l].w[idx] -= h;
                let numeric = (cost_of(&plus, &x, &y) - cost_of(&minus, &x, &y)) / (2.0 * h);
                assert_abs_diff_eq!(grads.layers[l].dw[idx], numeric, epsilon = 1e-6);
            }
            let mut plus = params.clone();
            plus.layers[l].b[[0, 0]] += h;
            let mut minus = params.clone();
            minus.layers[l].b[[0, 0]] -= h;
            let numeric = (cost_of(&plus, &x, &y) - cost_of(&minus, &x, &y)) / (2.0 * h);
            assert_abs_diff_eq!(grads.layers[l].db[[0, 0]], numeric, epsilon = 1e-6);
        }
    }

    #[test]
    fn update_steps_against_the_gradient() {
        let layer = LayerParams {
            w: array![[1.0, 2.0]],
            b: array![[0.5]],
        };
        let mut params = Parameters::from_layers(vec![layer]).unwrap();
        let grads = Gradients {
            layers: vec![LayerGradients {
                da: array![[0.0]],
                dw: array![[1.0, -1.0]],
                db: array![[2.0]],
            }],
            da_input: None,
        };
        update_parameters(&mut params, &grads, 0.1).unwrap();
        let layer = params.layer(1).unwrap();
        assert_abs_diff_eq!(layer.w, array![[0.9, 2.1]], epsilon = 1e-12);
        assert_abs_diff_eq!(layer.b, array![[0.3]], epsilon = 1e-12);

        assert!(matches!(
            update_parameters(&mut params, &grads, 0.0),
            Err(NetError::Configuration(_))
        ));
        assert!(update_parameters(&mut params, &grads, f64::NAN).is_err());
    }

    #[test]
    fn from_layers_rejects_broken_chains() {
        let a = LayerParams {
            w: Array2::zeros((3, 2)),
            b: Array2::zeros((3, 1)),
        };
        let bad = LayerParams {
            w: Array2::zeros((1, 4)),
            b: Array2::zeros((1, 1)),
        };
        assert!(Parameters::from_layers(vec![a.clone(), bad]).is_err());
        assert!(Parameters::from_layers(vec![a]).is_err());
        assert!(Parameters::from_layers(Vec::new()).is_err());
    }

    #[test]
    fn save_and_load_preserve_parameters() {
        let mut rng = StdRng::seed_from_u64(6);
        let params = initialize_parameters_with_rng(&dims(&[4, 3, 1]), &mut rng);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("model.json.gz");
        params.save(&path).unwrap();
        let loaded = Parameters::load(&path).unwrap();
        assert_eq!(loaded, params);
    }

    #[test]
    fn save_refuses_non_finite_values() {
        let mut params = initialize_parameters(&dims(&[2, 1]));
        params.layers[0].w[[0, 0]] = f64::NAN;
        let dir = tempfile::tempdir().unwrap();
        assert!(params.save(dir.path().join("model.json.gz")).is_err());
    }
}
