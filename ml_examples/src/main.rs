// ml_examples/src/main.rs
use anyhow::Result;
use binary_dnn::{
    confusion_matrix, evaluate, generate_synthetic_data, initialize_parameters,
    initialize_parameters_with_rng, load_mnist_pair, print_cost_table, print_model_summary,
    train_dataset, LayerDims, Parameters, TrainConfig,
};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ml_examples")]
#[command(about = "Train a dense binary classifier on a pair of MNIST digits")]
struct Args {
    /// Directory holding the MNIST IDX files (optionally gzipped)
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// The two digits to separate; the first becomes class 0
    #[arg(long, num_args = 2, default_values_t = [3, 8])]
    digits: Vec<u8>,

    /// Comma-separated layer sizes, input first, ending in 1
    #[arg(long, default_value = "784,20,7,5,1")]
    layers: LayerDims,

    #[arg(long, default_value_t = 0.009)]
    learning_rate: f64,

    #[arg(long, default_value_t = 3000)]
    iterations: usize,

    /// Seed for weight initialization and synthetic data
    #[arg(long)]
    seed: Option<u64>,

    /// Write the trained parameters here (gzipped JSON)
    #[arg(long)]
    save: Option<PathBuf>,

    /// Use random data instead of MNIST
    #[arg(long)]
    synthetic: bool,

    /// Log every cost checkpoint and debug detail
    #[arg(short, long)]
    verbose: bool,
}

/// The untrained network training starts from, so the baseline is reproducible
/// whenever `--seed` is given.
fn baseline_parameters(dims: &LayerDims, seed: Option<u64>) -> Parameters {
    match seed {
        Some(seed) => initialize_parameters_with_rng(dims, &mut StdRng::seed_from_u64(seed)),
        None => initialize_parameters(dims),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let input_size = args.layers.input_size();
    let (train_set, test_set) = if args.synthetic {
        println!("=== Synthetic random data ===");
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        (
            generate_synthetic_data(input_size, 1000, &mut rng),
            generate_synthetic_data(input_size, 1000, &mut rng),
        )
    } else {
        let digits = (args.digits[0], args.digits[1]);
        println!("=== MNIST digits {} vs {} ===", digits.0, digits.1);
        (
            load_mnist_pair(&args.data_dir, digits, true)?,
            load_mnist_pair(&args.data_dir, digits, false)?,
        )
    };

    let baseline = baseline_parameters(&args.layers, args.seed);
    let baseline_acc = evaluate(&test_set, &baseline)?;

    let config = TrainConfig {
        learning_rate: args.learning_rate,
        num_iterations: args.iterations,
        seed: args.seed,
        ..TrainConfig::default()
    };
    let outcome = train_dataset(&train_set, &args.layers, &config)?;
    print_model_summary(&outcome.parameters);
    print_cost_table(&outcome.costs, config.cost_interval);

    let train_acc = evaluate(&train_set, &outcome.parameters)?;
    let test_acc = evaluate(&test_set, &outcome.parameters)?;
    let cm = confusion_matrix(&test_set, &outcome.parameters)?;
    println!("Untrained test accuracy: {:.2}%", baseline_acc * 100.0);
    println!("Train accuracy: {:.2}%", train_acc * 100.0);
    println!("Test accuracy: {:.2}%", test_acc * 100.0);
    println!(
        "Test confusion: TP={} TN={} FP={} FN={}",
        cm.tp, cm.tn, cm.fp, cm.fn_
    );

    if let Some(path) = &args.save {
        outcome.parameters.save(path)?;
        println!("Saved parameters to {}", path.display());
    }

    Ok(())
}
