//! Thresholded predictions and confusion-matrix based accuracy.
use crate::datasets::Dataset;
use crate::error::{NetError, NetResult};
use crate::network::{model_forward, Parameters};
use ndarray::Array2;

/// Runs the forward pass and rounds each probability to 0 or 1.
///
/// Rounding is half-to-even, so a probability of exactly `0.5` predicts class 0.
pub fn predict_labels(x: &Array2<f64>, params: &Parameters) -> NetResult<Array2<f64>> {
    let (al, _) = model_forward(x, params)?;
    Ok(al.mapv(f64::round_ties_even))
}

/// Binary confusion matrix, class 1 being the positive class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    /// Counts outcomes for 0/1 `predictions` against 0/1 `labels`.
    ///
    /// Each side must be a row `(1, m)` or a column `(m, 1)` of the same length;
    /// any other value than 0 or 1 is rejected.
    pub fn from_predictions(predictions: &Array2<f64>, labels: &Array2<f64>) -> NetResult<Self> {
        let is_vector = |a: &Array2<f64>| a.nrows() == 1 || a.ncols() == 1;
        if !is_vector(predictions) || !is_vector(labels) || predictions.len() != labels.len() {
            return Err(NetError::shape(
                "confusion_matrix",
                predictions.shape(),
                labels.shape(),
            ));
        }
        check_binary("predictions", predictions)?;
        check_binary("labels", labels)?;
        let mut cm = ConfusionMatrix::default();
        for (&p, &t) in predictions.iter().zip(labels.iter()) {
            match (p == 1.0, t == 1.0) {
                (true, true) => cm.tp += 1,
                (false, false) => cm.tn += 1,
                (true, false) => cm.fp += 1,
                (false, true) => cm.fn_ += 1,
            }
        }
        Ok(cm)
    }

    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// (TP + TN) / (TP + TN + FP + FN)
    pub fn accuracy(&self) -> NetResult<f64> {
        match self.total() {
            0 => Err(NetError::EmptyDataset),
            total => Ok((self.tp + self.tn) as f64 / total as f64),
        }
    }

    pub fn precision(&self) -> Option<f64> {
        let denom = self.tp + self.fp;
        (denom > 0).then(|| self.tp as f64 / denom as f64)
    }

    pub fn recall(&self) -> Option<f64> {
        let denom = self.tp + self.fn_;
        (denom > 0).then(|| self.tp as f64 / denom as f64)
    }
}

fn check_binary(what: &str, values: &Array2<f64>) -> NetResult<()> {
    match values.iter().find(|&&v| v != 0.0 && v != 1.0) {
        Some(bad) => Err(NetError::Configuration(format!(
            "{} must be 0 or 1, found {}",
            what, bad
        ))),
        None => Ok(()),
    }
}

/// Accuracy of `params` on `(x, y)`.
pub fn predict(x: &Array2<f64>, y: &Array2<f64>, params: &Parameters) -> NetResult<f64> {
    if x.ncols() == 0 {
        return Err(NetError::EmptyDataset);
    }
    let predictions = predict_labels(x, params)?;
    ConfusionMatrix::from_predictions(&predictions, y)?.accuracy()
}

/// Accuracy on a [`Dataset`].
pub fn evaluate(dataset: &Dataset, params: &Parameters) -> NetResult<f64> {
    predict(dataset.x(), dataset.y(), params)
}

/// Confusion matrix on a [`Dataset`].
pub fn confusion_matrix(dataset: &Dataset, params: &Parameters) -> NetResult<ConfusionMatrix> {
    let predictions = predict_labels(dataset.x(), params)?;
    ConfusionMatrix::from_predictions(&predictions, dataset.y())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::LayerParams;
    use crate::network::{initialize_parameters_with_rng, LayerDims};
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use ndarray_rand::rand_distr::Uniform;
    use ndarray_rand::RandomExt;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn zero_network(inputs: usize) -> Parameters {
        Parameters::from_layers(vec![LayerParams {
            w: Array2::zeros((1, inputs)),
            b: Array2::zeros((1, 1)),
        }])
        .unwrap()
    }

    #[test]
    fn confusion_counts() {
        let pred = array![[1.0, 1.0, 0.0, 0.0, 1.0]];
        let y = array![[1.0, 0.0, 0.0, 1.0, 1.0]];
        let cm = ConfusionMatrix::from_predictions(&pred, &y).unwrap();
        assert_eq!(
            cm,
            ConfusionMatrix {
                tp: 2,
                tn: 1,
                fp: 1,
                fn_: 1
            }
        );
        assert_abs_diff_eq!(cm.accuracy().unwrap(), 0.6);
        assert_abs_diff_eq!(cm.precision().unwrap(), 2.0 / 3.0);
        assert_abs_diff_eq!(cm.recall().unwrap(), 2.0 / 3.0);
    }

    #[test]
    fn column_labels_line_up_with_row_predictions() {
        let pred = array![[1.0, 0.0, 1.0]];
        let y = array![[1.0], [1.0], [1.0]];
        let cm = ConfusionMatrix::from_predictions(&pred, &y).unwrap();
        assert_eq!((cm.tp, cm.fn_), (2, 1));
    }

    #[test]
    fn rejects_reshaped_or_non_binary_labels() {
        let pred = array![[1.0, 0.0, 1.0, 0.0]];
        let square = array![[1.0, 0.0], [0.0, 1.0]];
        assert!(matches!(
            ConfusionMatrix::from_predictions(&pred, &square),
            Err(NetError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            ConfusionMatrix::from_predictions(&pred, &array![[1.0, 0.7, 0.0, 0.0]]),
            Err(NetError::Configuration(_))
        ));
        assert!(ConfusionMatrix::from_predictions(&array![[0.5, 0.0, 1.0, 0.0]], &pred).is_err());
    }

    #[test]
    fn empty_matrix_has_no_accuracy() {
        let cm = ConfusionMatrix::default();
        assert_eq!(cm.accuracy(), Err(NetError::EmptyDataset));
        assert_eq!(cm.precision(), None);
    }

    #[test]
    fn exact_half_rounds_to_zero() {
        // Zero weights and bias give sigmoid(0) == 0.5 for every example.
        let params = zero_network(3);
        let x = array![[1.0, -2.0], [0.5, 3.0], [0.0, 1.0]];
        let labels = predict_labels(&x, &params).unwrap();
        assert_eq!(labels, array![[0.0, 0.0]]);
        assert_abs_diff_eq!(predict(&x, &array![[0.0, 0.0]], &params).unwrap(), 1.0);
        assert_abs_diff_eq!(predict(&x, &array![[1.0, 1.0]], &params).unwrap(), 0.0);
    }

    #[test]
    fn predict_on_empty_input_fails() {
        let params = zero_network(3);
        let x = Array2::zeros((3, 0));
        let y = Array2::zeros((1, 0));
        assert_eq!(predict(&x, &y, &params), Err(NetError::EmptyDataset));
    }

    #[test]
    fn untrained_network_is_near_chance() {
        let dims = LayerDims::new(vec![10, 6, 1]).unwrap();
        let mut total = 0.0;
        let runs = 20;
        for seed in 0..runs {
            let mut rng = StdRng::seed_from_u64(seed);
            let params = initialize_parameters_with_rng(&dims, &mut rng);
            let x = Array2::random_using((10, 200), Uniform::new(0.0, 1.0), &mut rng);
            let y = Array2::from_shape_fn((1, 200), |_| f64::from(rng.gen_bool(0.5) as u8));
            let acc = predict(&x, &y, &params).unwrap();
            assert!((0.3..=0.7).contains(&acc), "accuracy {} out of range", acc);
            total += acc;
        }
        assert_abs_diff_eq!(total / runs as f64, 0.5, epsilon = 0.1);
    }
}
