//! Synthetic data generators and console summaries.
use crate::datasets::Dataset;
use crate::network::Parameters;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::{StandardNormal, Uniform};
use ndarray_rand::RandomExt;
use rand::Rng;

/// Random inputs in `[0, 1)` with labels drawn independently of them.
pub fn generate_synthetic_data<R: Rng + ?Sized>(
    features: usize,
    examples: usize,
    rng: &mut R,
) -> Dataset {
    let x = Array2::random_using((features, examples), Uniform::new(0.0, 1.0), rng);
    let y = Array2::from_shape_fn((1, examples), |_| if rng.gen_bool(0.5) { 1.0 } else { 0.0 });
    Dataset::from_parts(x, y)
}

/// Inputs in `[-1, 1)` labelled by which side of a random hyperplane through the origin they fall.
pub fn generate_separable_data<R: Rng + ?Sized>(
    features: usize,
    examples: usize,
    rng: &mut R,
) -> Dataset {
    let normal: Array1<f64> = Array1::random_using(features, StandardNormal, rng);
    let x = Array2::random_using((features, examples), Uniform::new(-1.0, 1.0), rng);
    let y = normal
        .dot(&x)
        .mapv(|s| if s > 0.0 { 1.0 } else { 0.0 })
        .insert_axis(Axis(0));
    Dataset::from_parts(x, y)
}

/// Print model summary
pub fn print_model_summary(params: &Parameters) {
    println!("Model Summary:\n{}", params);
    for (i, layer) in params.layers().iter().enumerate() {
        println!(
            "  layer {}: W {:?}, b {:?}, {}",
            i + 1,
            layer.w.shape(),
            layer.b.shape(),
            params.activation(i + 1)
        );
    }
}

/// Print the recorded costs, one row per checkpoint.
pub fn print_cost_table(costs: &[f64], interval: usize) {
    println!("\nTraining Cost:");
    println!("+------------+------------+");
    println!("| Iteration  | Cost       |");
    println!("+------------+------------+");
    for (i, cost) in costs.iter().enumerate() {
        println!("| {:>10} | {:>10.6} |", (i + 1) * interval, cost);
    }
    println!("+------------+------------+");
}
