//! Full-batch gradient descent training loop.
use crate::datasets::Dataset;
use crate::error::{NetError, NetResult};
use crate::loss::compute_cost;
use crate::network::{
    initialize_parameters, initialize_parameters_with_rng, model_backward, model_forward,
    update_parameters, LayerDims, Parameters,
};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Iterations between recorded costs.
pub const COST_INTERVAL: usize = 100;

/// Hyperparameters for [`train`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub num_iterations: usize,
    /// A cost is recorded after every `cost_interval`-th iteration.
    pub cost_interval: usize,
    /// Seed for weight initialization; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.009,
            num_iterations: 3000,
            cost_interval: COST_INTERVAL,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn new(learning_rate: f64, num_iterations: usize) -> Self {
        Self {
            learning_rate,
            num_iterations,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> NetResult<()> {
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(NetError::Configuration(format!(
                "learning rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.num_iterations == 0 {
            return Err(NetError::Configuration(
                "number of iterations must be positive".to_string(),
            ));
        }
        if self.cost_interval == 0 {
            return Err(NetError::Configuration(
                "cost interval must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trained parameters plus the costs recorded along the way.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub parameters: Parameters,
    pub costs: Vec<f64>,
}

/// Trains an `L`-layer network on `x` of shape `(features, m)` and labels `y` of shape `(1, m)`.
///
/// Each iteration runs forward, cost, backward and update, in that order. The
/// returned `costs` holds `num_iterations / cost_interval` entries.
pub fn train(
    x: &Array2<f64>,
    y: &Array2<f64>,
    dims: &LayerDims,
    config: &TrainConfig,
) -> NetResult<TrainOutcome> {
    config.validate()?;
    if x.nrows() != dims.input_size() {
        return Err(NetError::shape("train", &[dims.input_size(), x.ncols()], x.shape()));
    }
    if y.shape() != [1, x.ncols()] {
        return Err(NetError::shape("train", &[1, x.ncols()], y.shape()));
    }
    if x.ncols() == 0 {
        return Err(NetError::EmptyDataset);
    }

    let mut params = match config.seed {
        Some(seed) => initialize_parameters_with_rng(dims, &mut StdRng::seed_from_u64(seed)),
        None => initialize_parameters(dims),
    };
    tracing::info!(
        "training {} on {} examples: lr={}, iterations={}",
        params,
        x.ncols(),
        config.learning_rate,
        config.num_iterations
    );

    let mut costs = Vec::with_capacity(config.num_iterations / config.cost_interval);
    for iteration in 1..=config.num_iterations {
        let (al, caches) = model_forward(x, &params)?;
        let cost = compute_cost(&al, y)?;
        let grads = model_backward(&al, y, caches)?;
        update_parameters(&mut params, &grads, config.learning_rate)?;

        if iteration % config.cost_interval == 0 {
            if let Some(&prev) = costs.last() {
                if cost > prev {
                    tracing::warn!("cost rose from {:.6} to {:.6}", prev, cost);
                }
            }
            tracing::info!("Cost after iteration {}: {:.6}", iteration, cost);
            costs.push(cost);
        }
    }
    Ok(TrainOutcome {
        parameters: params,
        costs,
    })
}

/// [`train`] over a [`Dataset`].
pub fn train_dataset(
    dataset: &Dataset,
    dims: &LayerDims,
    config: &TrainConfig,
) -> NetResult<TrainOutcome> {
    train(dataset.x(), dataset.y(), dims, config)
}

/// Plain entry point: validates `layer_dims`, trains, and returns `(parameters, costs)`.
pub fn train_model(
    x: &Array2<f64>,
    y: &Array2<f64>,
    layer_dims: &[usize],
    learning_rate: f64,
    num_iterations: usize,
) -> NetResult<(Parameters, Vec<f64>)> {
    let dims = LayerDims::new(layer_dims.to_vec())?;
    let outcome = train(x, y, &dims, &TrainConfig::new(learning_rate, num_iterations))?;
    Ok((outcome.parameters, outcome.costs))
}
