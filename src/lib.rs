//! A dense deep neural network for binary classification, built from first
//! principles: initialization, forward propagation, cross-entropy cost,
//! hand-derived backward propagation and gradient descent.
//!
//! - `[LINEAR -> RELU] * (L-1) -> LINEAR -> SIGMOID` over column-major batches
//! - Explicit per-layer caches consumed by the backward pass
//! - Confusion-matrix accuracy with a pinned 0.5 rounding rule
//! - MNIST (IDX) loader that keeps a pair of digits, and gzipped JSON persistence

pub mod activations;
pub mod datasets;
pub mod error;
pub mod layers;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod training;
pub mod utils;

pub use activations::{relu, relu_backward, sigmoid, sigmoid_backward, Activation, ActivationCache};
pub use datasets::{load_mnist_pair, Dataset};
pub use error::{NetError, NetResult};
pub use layers::{
    linear_activation_backward, linear_activation_forward, linear_backward, linear_forward,
    linear_param_gradients, LayerCache, LayerParams, LinearCache,
};
pub use loss::{compute_cost, cost_derivative};
pub use metrics::{confusion_matrix, evaluate, predict, predict_labels, ConfusionMatrix};
pub use network::{
    initialize_parameters, initialize_parameters_with_rng, model_backward,
    model_backward_with_input, model_forward, update_parameters, Caches, Gradients, LayerDims,
    LayerGradients, Parameters,
};
pub use training::{train, train_dataset, train_model, TrainConfig, TrainOutcome};
pub use utils::{
    generate_separable_data, generate_synthetic_data, print_cost_table, print_model_summary,
};
